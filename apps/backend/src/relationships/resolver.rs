//! Relationship resolution: a relationship document plus a relation
//! descriptor becomes a `ResolvedMutation`, or the first error found.
//!
//! Resolution only reads. Nothing is written until the synchronizer applies
//! the mutation.

use std::collections::HashSet;

use async_trait::async_trait;
use sea_orm::ConnectionTrait;

use super::error::RelationshipError;
use crate::errors::domain::DomainError;
use crate::jsonapi::document::{RelationshipData, ResourceIdentifier};
use crate::repos::resources;
use crate::schema::{RelationDescriptor, ResourceRef, ResourceType};

/// What the request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `PATCH`, or relationships inside a resource create/update.
    Replace,
    /// `POST` to a to-many relationship endpoint.
    Add,
    /// `DELETE` on a to-many relationship endpoint.
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedMutation {
    SetNull,
    SetOne(ResourceRef),
    Replace(Vec<ResourceRef>),
    Add(Vec<ResourceRef>),
    Remove(Vec<ResourceRef>),
}

/// Looks up the storage key behind a wire identifier.
#[async_trait]
pub trait ResourceLookup: Send + Sync {
    async fn find_key(&self, ty: ResourceType, route_id: &str) -> Result<Option<i64>, DomainError>;
}

/// `ResourceLookup` over a live connection or transaction.
pub struct StoredResources<'a, C>(pub &'a C);

#[async_trait]
impl<'a, C> ResourceLookup for StoredResources<'a, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_key(&self, ty: ResourceType, route_id: &str) -> Result<Option<i64>, DomainError> {
        resources::find_key(self.0, ty, route_id).await
    }
}

fn shape(rel: &RelationDescriptor) -> &'static str {
    if rel.is_to_one() {
        "to-one"
    } else {
        "to-many"
    }
}

async fn resolve_identifier<L: ResourceLookup + ?Sized>(
    lookup: &L,
    rel: &RelationDescriptor,
    identifier: &ResourceIdentifier,
    pointer: &str,
) -> Result<ResourceRef, RelationshipError> {
    let ty = identifier
        .ty
        .parse::<ResourceType>()
        .ok()
        .filter(|ty| rel.accepts(*ty))
        .ok_or_else(|| {
            RelationshipError::invalid_reference(
                format!(
                    "The {} field must be a {} relationship containing {} resources.",
                    rel.name,
                    shape(rel),
                    rel.type_list()
                ),
                format!("{pointer}/type"),
            )
        })?;

    match lookup.find_key(ty, &identifier.id).await? {
        Some(key) => Ok(ResourceRef::new(ty, key)),
        None => Err(RelationshipError::not_found(
            "The related resource does not exist.",
            format!("{pointer}/id"),
        )),
    }
}

/// Resolve `data` for `operation` on `rel` of `owner`.
///
/// `pointer` locates `data` in the request document (`/data` on relationship
/// endpoints, `/data/relationships/{name}/data` inside resource documents).
/// To-many entries are checked in order and the first failure is returned;
/// duplicates collapse onto their first occurrence.
pub async fn resolve<L: ResourceLookup + ?Sized>(
    lookup: &L,
    owner: ResourceType,
    rel: &RelationDescriptor,
    operation: Operation,
    data: &RelationshipData,
    pointer: &str,
) -> Result<ResolvedMutation, RelationshipError> {
    if rel.is_read_only() {
        return Err(RelationshipError::not_modifiable(format!(
            "The {} relationship of {owner} is read-only.",
            rel.name
        )));
    }

    if rel.is_to_one() {
        if operation != Operation::Replace {
            return Err(RelationshipError::not_modifiable(format!(
                "The {} relationship is to-one; only replacement is supported.",
                rel.name
            )));
        }
        return match data {
            RelationshipData::ToOne(None) => Ok(ResolvedMutation::SetNull),
            RelationshipData::ToOne(Some(identifier)) => {
                resolve_identifier(lookup, rel, identifier, pointer)
                    .await
                    .map(ResolvedMutation::SetOne)
            }
            RelationshipData::ToMany(_) => Err(RelationshipError::invalid_document(
                format!(
                    "The {} relationship expects a resource identifier or null.",
                    rel.name
                ),
                pointer,
            )),
        };
    }

    let RelationshipData::ToMany(identifiers) = data else {
        return Err(RelationshipError::invalid_document(
            format!(
                "The {} relationship expects an array of resource identifiers.",
                rel.name
            ),
            pointer,
        ));
    };

    let mut seen = HashSet::new();
    let mut members = Vec::with_capacity(identifiers.len());
    for (index, identifier) in identifiers.iter().enumerate() {
        let member = resolve_identifier(lookup, rel, identifier, &format!("{pointer}/{index}")).await?;
        if seen.insert(member) {
            members.push(member);
        }
    }

    Ok(match operation {
        Operation::Replace => ResolvedMutation::Replace(members),
        Operation::Add => ResolvedMutation::Add(members),
        Operation::Remove => ResolvedMutation::Remove(members),
    })
}
