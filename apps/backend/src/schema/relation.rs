//! Relation descriptors.
//!
//! A descriptor says what a relation holds (`Cardinality`), which resource
//! types it accepts, and where the association is stored (`Accessor`).
//! Dispatch everywhere is a `match` on the accessor.

use super::resource_type::ResourceType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ToOne,
    ToMany,
}

/// Junction table columns for a many-to-many morph relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pivot {
    pub table: &'static str,
    /// Non-polymorphic side (e.g. `tag_id`).
    pub key_column: &'static str,
    /// Discriminator of the polymorphic side (e.g. `taggable_type`).
    pub morph_type_column: &'static str,
    /// Key of the polymorphic side (e.g. `taggable_id`).
    pub morph_id_column: &'static str,
}

/// Read-only relations backed by a query instead of stored links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Computed {
    /// Other posts sharing a tag or an author with the owner.
    RelatedPosts,
    /// First video sharing a tag with the post or uploaded by its author.
    RelatedVideo,
}

/// Where an association lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    /// Owner row holds `foreign_key` pointing at the related row.
    BelongsTo { foreign_key: &'static str },
    /// Owner row holds a `(type, id)` pair.
    MorphTo {
        type_column: &'static str,
        id_column: &'static str,
    },
    /// Related row holds `foreign_key` pointing at the owner; at most one.
    HasOne { foreign_key: &'static str },
    /// Related row holds a `(type, id)` pair pointing at the owner; at most one.
    MorphOne {
        type_column: &'static str,
        id_column: &'static str,
    },
    /// Related rows hold `foreign_key` pointing at the owner.
    HasMany { foreign_key: &'static str },
    /// Related rows hold a `(type, id)` pair pointing at the owner.
    MorphMany {
        type_column: &'static str,
        id_column: &'static str,
    },
    /// Owner is the key side of the pivot; related rows are polymorphic.
    MorphToMany(Pivot),
    /// Owner is the polymorphic side of the pivot; related rows sit on the key side.
    MorphedByMany(Pivot),
    Computed(Computed),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationDescriptor {
    pub name: &'static str,
    pub cardinality: Cardinality,
    pub types: &'static [ResourceType],
    pub accessor: Accessor,
}

impl RelationDescriptor {
    pub fn is_to_one(&self) -> bool {
        self.cardinality == Cardinality::ToOne
    }

    pub fn is_to_many(&self) -> bool {
        self.cardinality == Cardinality::ToMany
    }

    pub fn is_polymorphic(&self) -> bool {
        self.types.len() > 1
    }

    pub fn accepts(&self, ty: ResourceType) -> bool {
        self.types.contains(&ty)
    }

    /// Computed relations cannot be written.
    pub fn is_read_only(&self) -> bool {
        matches!(self.accessor, Accessor::Computed(_))
    }

    /// The single related type of a non-polymorphic relation.
    pub fn single_type(&self) -> Option<ResourceType> {
        match self.types {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Human list of accepted types, for error details.
    pub fn type_list(&self) -> String {
        self.types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
