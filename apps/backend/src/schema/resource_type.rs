use std::fmt;
use std::str::FromStr;

/// Every resource type the API serves.
///
/// The wire name doubles as the morph discriminator stored in
/// `*_type` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceType {
    Countries,
    Users,
    Phones,
    Posts,
    Images,
    Comments,
    Tags,
    Videos,
}

impl ResourceType {
    pub const ALL: [ResourceType; 8] = [
        ResourceType::Countries,
        ResourceType::Users,
        ResourceType::Phones,
        ResourceType::Posts,
        ResourceType::Images,
        ResourceType::Comments,
        ResourceType::Tags,
        ResourceType::Videos,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ResourceType::Countries => "countries",
            ResourceType::Users => "users",
            ResourceType::Phones => "phones",
            ResourceType::Posts => "posts",
            ResourceType::Images => "images",
            ResourceType::Comments => "comments",
            ResourceType::Tags => "tags",
            ResourceType::Videos => "videos",
        }
    }

    /// Backing table.
    pub const fn table(self) -> &'static str {
        self.as_str()
    }

    /// Column exposed as the JSON:API `id`.
    pub const fn route_key(self) -> &'static str {
        match self {
            ResourceType::Tags => "uuid",
            _ => "id",
        }
    }

    /// Whether the route key is the integer storage key.
    pub const fn route_key_is_storage_key(self) -> bool {
        !matches!(self, ResourceType::Tags)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownResourceType(pub String);

impl fmt::Display for UnknownResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown resource type '{}'", self.0)
    }
}

impl std::error::Error for UnknownResourceType {}

impl FromStr for ResourceType {
    type Err = UnknownResourceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownResourceType(s.to_string()))
    }
}
