//! JSON:API document shapes.
//!
//! Outgoing documents serialize through serde. Incoming documents are parsed
//! from `serde_json::Value` by hand so every rejection carries the JSON
//! pointer of the offending member.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use super::links::{relationship_links, resource_links};
use crate::error::AppError;
use crate::schema::{relations, ResourceType};

/// Where an error originated: a pointer into the request document or a
/// query parameter name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSource {
    Pointer(String),
    Parameter(String),
}

/// `{ "type": ..., "id": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub ty: String,
    pub id: String,
}

impl ResourceIdentifier {
    pub fn new(ty: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            id: id.into(),
        }
    }

    fn parse(value: &Value, pointer: &str) -> Result<Self, AppError> {
        let obj = value.as_object().ok_or_else(|| {
            AppError::invalid_document("A resource identifier must be an object.", pointer)
        })?;
        let ty = string_member(obj, "type", pointer)?;
        let id = string_member(obj, "id", pointer)?;
        Ok(Self { ty, id })
    }
}

fn string_member(obj: &Map<String, Value>, member: &str, pointer: &str) -> Result<String, AppError> {
    let at = format!("{pointer}/{member}");
    match obj.get(member) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(AppError::invalid_document(
            format!("The member {member} cannot be empty."),
            at,
        )),
        Some(_) => Err(AppError::invalid_document(
            format!("The member {member} must be a string."),
            at,
        )),
        None => Err(AppError::invalid_document(
            format!("The member {member} is required."),
            pointer,
        )),
    }
}

/// Linkage of a relationship: `null`, one identifier, or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RelationshipData {
    ToOne(Option<ResourceIdentifier>),
    ToMany(Vec<ResourceIdentifier>),
}

impl RelationshipData {
    /// Parse the value of a `data` member found at `pointer`.
    pub fn parse(value: &Value, pointer: &str) -> Result<Self, AppError> {
        match value {
            Value::Null => Ok(Self::ToOne(None)),
            Value::Object(_) => Ok(Self::ToOne(Some(ResourceIdentifier::parse(value, pointer)?))),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| ResourceIdentifier::parse(item, &format!("{pointer}/{i}")))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::ToMany),
            _ => Err(AppError::invalid_document(
                "The data member must be null, an object or an array.",
                pointer,
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Links {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
}

/// Body of `GET|PATCH|POST|DELETE .../relationships/{name}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipDocument {
    pub data: RelationshipData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl RelationshipDocument {
    pub fn new(data: RelationshipData) -> Self {
        Self {
            data,
            links: None,
            meta: None,
        }
    }

    /// Parse a request body; the top-level `data` member is required.
    pub fn from_request(body: &Value) -> Result<Self, AppError> {
        let obj = body
            .as_object()
            .ok_or_else(|| AppError::invalid_document("The request body must be an object.", ""))?;
        let data = obj
            .get("data")
            .ok_or_else(|| AppError::invalid_document("The member data is required.", ""))?;
        Ok(Self::new(RelationshipData::parse(data, "/data")?))
    }
}

/// Relationship entry on a resource object; links only, linkage is read
/// through the relationship endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipObject {
    pub links: Links,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub ty: String,
    pub id: String,
    pub attributes: Map<String, Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, RelationshipObject>,
    pub links: Links,
}

impl ResourceObject {
    /// Resource object with `self` links and one links-only entry per relation.
    pub fn new(ty: ResourceType, id: String, attributes: Map<String, Value>) -> Self {
        let relationships = relations(ty)
            .iter()
            .map(|rel| {
                (
                    rel.name.to_string(),
                    RelationshipObject {
                        links: relationship_links(ty, &id, rel.name),
                    },
                )
            })
            .collect();
        Self {
            ty: ty.as_str().to_string(),
            links: resource_links(ty, &id),
            id,
            attributes,
            relationships,
        }
    }

    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(self.ty.clone(), self.id.clone())
    }
}

/// Primary data of a related or resource document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PrimaryData {
    One(Option<Box<ResourceObject>>),
    Many(Vec<ResourceObject>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub data: PrimaryData,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<ResourceObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl Document {
    pub fn one(resource: Option<ResourceObject>) -> Self {
        Self {
            data: PrimaryData::One(resource.map(Box::new)),
            included: Vec::new(),
            links: None,
            meta: None,
        }
    }

    pub fn many(resources: Vec<ResourceObject>) -> Self {
        Self {
            data: PrimaryData::Many(resources),
            included: Vec::new(),
            links: None,
            meta: None,
        }
    }
}

/// Resource object of a create/update request.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingResource {
    pub ty: String,
    pub id: Option<String>,
    pub attributes: Map<String, Value>,
    /// In key order of the `relationships` member.
    pub relationships: Vec<(String, RelationshipData)>,
}

impl IncomingResource {
    pub fn from_request(body: &Value) -> Result<Self, AppError> {
        let root = body
            .as_object()
            .ok_or_else(|| AppError::invalid_document("The request body must be an object.", ""))?;
        let data = root
            .get("data")
            .and_then(Value::as_object)
            .ok_or_else(|| AppError::invalid_document("The member data must be an object.", "/data"))?;

        let ty = string_member(data, "type", "/data")?;
        let id = match data.get("id") {
            None => None,
            Some(_) => Some(string_member(data, "id", "/data")?),
        };

        let attributes = match data.get("attributes") {
            None => Map::new(),
            Some(Value::Object(attrs)) => attrs.clone(),
            Some(_) => {
                return Err(AppError::invalid_document(
                    "The member attributes must be an object.",
                    "/data/attributes",
                ))
            }
        };

        let relationships = match data.get("relationships") {
            None => Vec::new(),
            Some(Value::Object(rels)) => rels
                .iter()
                .map(|(name, rel)| {
                    let pointer = format!("/data/relationships/{name}");
                    let data = rel.as_object().and_then(|o| o.get("data")).ok_or_else(|| {
                        AppError::invalid_document(
                            "A relationship object must contain a data member.",
                            pointer.clone(),
                        )
                    })?;
                    Ok((name.clone(), RelationshipData::parse(data, &format!("{pointer}/data"))?))
                })
                .collect::<Result<Vec<_>, AppError>>()?,
            Some(_) => {
                return Err(AppError::invalid_document(
                    "The member relationships must be an object.",
                    "/data/relationships",
                ))
            }
        };

        Ok(Self {
            ty,
            id,
            attributes,
            relationships,
        })
    }
}
