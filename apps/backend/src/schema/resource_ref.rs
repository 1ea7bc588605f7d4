use std::fmt;

use super::resource_type::ResourceType;

/// A stored resource: its type and integer storage key.
///
/// Equality is by `(type, key)`, which is what set arithmetic on to-many
/// relations compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceRef {
    pub ty: ResourceType,
    pub key: i64,
}

impl ResourceRef {
    pub const fn new(ty: ResourceType, key: i64) -> Self {
        Self { ty, key }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.ty, self.key)
    }
}
