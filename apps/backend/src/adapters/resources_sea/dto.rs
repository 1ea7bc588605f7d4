//! Attribute payloads per writable resource type.
//!
//! Every field is optional: creates check required fields, updates only
//! touch what is present. Unknown attributes are rejected.

use serde::Deserialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::schema::ResourceType;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CountryAttributes {
    pub name: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserAttributes {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub author: Option<bool>,
    pub admin: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PostAttributes {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TagAttributes {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VideoAttributes {
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImageAttributes {
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceAttributes {
    Countries(CountryAttributes),
    Users(UserAttributes),
    Posts(PostAttributes),
    Tags(TagAttributes),
    Videos(VideoAttributes),
    Images(ImageAttributes),
}

impl ResourceAttributes {
    /// `None` when `ty` cannot be created or updated through the API.
    pub fn parse(ty: ResourceType, attributes: Map<String, Value>) -> Option<Result<Self, serde_json::Error>> {
        let value = Value::Object(attributes);
        let parsed = match ty {
            ResourceType::Countries => serde_json::from_value(value).map(Self::Countries),
            ResourceType::Users => serde_json::from_value(value).map(Self::Users),
            ResourceType::Posts => serde_json::from_value(value).map(Self::Posts),
            ResourceType::Tags => serde_json::from_value(value).map(Self::Tags),
            ResourceType::Videos => serde_json::from_value(value).map(Self::Videos),
            ResourceType::Images => serde_json::from_value(value).map(Self::Images),
            ResourceType::Phones | ResourceType::Comments => return None,
        };
        Some(parsed)
    }

    /// First attribute a create needs but did not get.
    pub fn missing_for_create(&self) -> Option<&'static str> {
        fn first(fields: &[(&'static str, bool)]) -> Option<&'static str> {
            fields.iter().find(|(_, present)| !present).map(|(name, _)| *name)
        }
        match self {
            Self::Countries(a) => first(&[("name", a.name.is_some()), ("code", a.code.is_some())]),
            Self::Users(a) => first(&[
                ("name", a.name.is_some()),
                ("email", a.email.is_some()),
                ("password", a.password.is_some()),
            ]),
            Self::Posts(a) => first(&[
                ("title", a.title.is_some()),
                ("slug", a.slug.is_some()),
                ("content", a.content.is_some()),
            ]),
            Self::Tags(a) => first(&[("name", a.name.is_some())]),
            Self::Videos(a) => first(&[
                ("url", a.url.is_some()),
                ("title", a.title.is_some()),
                ("description", a.description.is_some()),
            ]),
            Self::Images(a) => first(&[("url", a.url.is_some())]),
        }
    }
}
