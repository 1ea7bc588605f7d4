//! Relation and query tables per resource type.

use super::relation::{Accessor, Cardinality, Computed, Pivot, RelationDescriptor};
use super::resource_type::ResourceType;

const TAGGABLES: Pivot = Pivot {
    table: "taggables",
    key_column: "tag_id",
    morph_type_column: "taggable_type",
    morph_id_column: "taggable_id",
};

const COMMENTABLE: (&str, &str) = ("commentable_type", "commentable_id");
const IMAGEABLE: (&str, &str) = ("imageable_type", "imageable_id");

static COUNTRIES: &[RelationDescriptor] = &[RelationDescriptor {
    name: "users",
    cardinality: Cardinality::ToMany,
    types: &[ResourceType::Users],
    accessor: Accessor::HasMany {
        foreign_key: "country_id",
    },
}];

static USERS: &[RelationDescriptor] = &[
    RelationDescriptor {
        name: "country",
        cardinality: Cardinality::ToOne,
        types: &[ResourceType::Countries],
        accessor: Accessor::BelongsTo {
            foreign_key: "country_id",
        },
    },
    RelationDescriptor {
        name: "phone",
        cardinality: Cardinality::ToOne,
        types: &[ResourceType::Phones],
        accessor: Accessor::HasOne {
            foreign_key: "user_id",
        },
    },
];

static PHONES: &[RelationDescriptor] = &[RelationDescriptor {
    name: "user",
    cardinality: Cardinality::ToOne,
    types: &[ResourceType::Users],
    accessor: Accessor::BelongsTo {
        foreign_key: "user_id",
    },
}];

static POSTS: &[RelationDescriptor] = &[
    RelationDescriptor {
        name: "author",
        cardinality: Cardinality::ToOne,
        types: &[ResourceType::Users],
        accessor: Accessor::BelongsTo {
            foreign_key: "author_id",
        },
    },
    RelationDescriptor {
        name: "comments",
        cardinality: Cardinality::ToMany,
        types: &[ResourceType::Comments],
        accessor: Accessor::MorphMany {
            type_column: COMMENTABLE.0,
            id_column: COMMENTABLE.1,
        },
    },
    RelationDescriptor {
        name: "image",
        cardinality: Cardinality::ToOne,
        types: &[ResourceType::Images],
        accessor: Accessor::MorphOne {
            type_column: IMAGEABLE.0,
            id_column: IMAGEABLE.1,
        },
    },
    RelationDescriptor {
        name: "tags",
        cardinality: Cardinality::ToMany,
        types: &[ResourceType::Tags],
        accessor: Accessor::MorphedByMany(TAGGABLES),
    },
    RelationDescriptor {
        name: "related",
        cardinality: Cardinality::ToMany,
        types: &[ResourceType::Posts],
        accessor: Accessor::Computed(Computed::RelatedPosts),
    },
    RelationDescriptor {
        name: "relatedVideo",
        cardinality: Cardinality::ToOne,
        types: &[ResourceType::Videos],
        accessor: Accessor::Computed(Computed::RelatedVideo),
    },
];

static IMAGES: &[RelationDescriptor] = &[RelationDescriptor {
    name: "imageable",
    cardinality: Cardinality::ToOne,
    types: &[ResourceType::Posts, ResourceType::Videos],
    accessor: Accessor::MorphTo {
        type_column: IMAGEABLE.0,
        id_column: IMAGEABLE.1,
    },
}];

static COMMENTS: &[RelationDescriptor] = &[
    RelationDescriptor {
        name: "commentable",
        cardinality: Cardinality::ToOne,
        types: &[ResourceType::Posts, ResourceType::Videos],
        accessor: Accessor::MorphTo {
            type_column: COMMENTABLE.0,
            id_column: COMMENTABLE.1,
        },
    },
    RelationDescriptor {
        name: "createdBy",
        cardinality: Cardinality::ToOne,
        types: &[ResourceType::Users],
        accessor: Accessor::BelongsTo {
            foreign_key: "user_id",
        },
    },
];

static TAGS: &[RelationDescriptor] = &[RelationDescriptor {
    name: "taggables",
    cardinality: Cardinality::ToMany,
    types: &[ResourceType::Posts, ResourceType::Videos],
    accessor: Accessor::MorphToMany(TAGGABLES),
}];

static VIDEOS: &[RelationDescriptor] = &[
    RelationDescriptor {
        name: "tags",
        cardinality: Cardinality::ToMany,
        types: &[ResourceType::Tags],
        accessor: Accessor::MorphedByMany(TAGGABLES),
    },
    RelationDescriptor {
        name: "comments",
        cardinality: Cardinality::ToMany,
        types: &[ResourceType::Comments],
        accessor: Accessor::MorphMany {
            type_column: COMMENTABLE.0,
            id_column: COMMENTABLE.1,
        },
    },
    RelationDescriptor {
        name: "uploadedBy",
        cardinality: Cardinality::ToOne,
        types: &[ResourceType::Users],
        accessor: Accessor::BelongsTo {
            foreign_key: "user_id",
        },
    },
];

/// All relations declared on `ty`, in declaration order.
pub fn relations(ty: ResourceType) -> &'static [RelationDescriptor] {
    match ty {
        ResourceType::Countries => COUNTRIES,
        ResourceType::Users => USERS,
        ResourceType::Phones => PHONES,
        ResourceType::Posts => POSTS,
        ResourceType::Images => IMAGES,
        ResourceType::Comments => COMMENTS,
        ResourceType::Tags => TAGS,
        ResourceType::Videos => VIDEOS,
    }
}

pub fn relation(ty: ResourceType, name: &str) -> Option<&'static RelationDescriptor> {
    relations(ty).iter().find(|r| r.name == name)
}

/// Whether `related` reads the storage behind `rel` (declared on `owner`)
/// through a has-one or morph-one relation back to `owner`.
///
/// When it does, only one `owner` row may point at a given `related` row.
pub fn has_exclusive_inverse(
    owner: ResourceType,
    rel: &RelationDescriptor,
    related: ResourceType,
) -> bool {
    relations(related).iter().any(|inverse| {
        inverse.accepts(owner)
            && match (inverse.accessor, rel.accessor) {
                (Accessor::HasOne { foreign_key: a }, Accessor::BelongsTo { foreign_key: b }) => {
                    a == b
                }
                (
                    Accessor::MorphOne {
                        type_column: a_type,
                        id_column: a_id,
                    },
                    Accessor::MorphTo {
                        type_column: b_type,
                        id_column: b_id,
                    },
                ) => a_type == b_type && a_id == b_id,
                _ => false,
            }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// `column LIKE %value%`
    Contains,
    /// `column LIKE value%`
    Prefix,
    Equals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub name: &'static str,
    pub column: &'static str,
    pub mode: FilterMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub name: &'static str,
    pub column: &'static str,
}

/// Filters and sort fields a related collection of this type accepts.
#[derive(Debug, Clone, Copy)]
pub struct QuerySchema {
    pub filters: &'static [FilterSpec],
    pub sorts: &'static [SortSpec],
}

impl QuerySchema {
    pub fn filter(&self, name: &str) -> Option<&'static FilterSpec> {
        self.filters.iter().find(|f| f.name == name)
    }

    pub fn sort(&self, name: &str) -> Option<&'static SortSpec> {
        self.sorts.iter().find(|s| s.name == name)
    }
}

const fn filter(name: &'static str, column: &'static str, mode: FilterMode) -> FilterSpec {
    FilterSpec { name, column, mode }
}

const fn sort(name: &'static str, column: &'static str) -> SortSpec {
    SortSpec { name, column }
}

pub fn query_schema(ty: ResourceType) -> QuerySchema {
    use FilterMode::{Contains, Equals, Prefix};

    match ty {
        ResourceType::Countries => QuerySchema {
            filters: &const { [filter("name", "name", Contains), filter("code", "code", Equals)] },
            sorts: &const { [sort("name", "name"), sort("code", "code")] },
        },
        ResourceType::Users => QuerySchema {
            filters: &const { [filter("name", "name", Contains), filter("email", "email", Equals)] },
            sorts: &const { [sort("name", "name"), sort("email", "email")] },
        },
        ResourceType::Phones => QuerySchema {
            filters: &const { [filter("number", "number", Equals)] },
            sorts: &const { [sort("number", "number")] },
        },
        ResourceType::Posts => QuerySchema {
            filters: &const { [filter("title", "title", Prefix), filter("slug", "slug", Equals)] },
            sorts: &const { [sort("title", "title"), sort("slug", "slug")] },
        },
        ResourceType::Images => QuerySchema {
            filters: &[],
            sorts: &const { [sort("url", "url")] },
        },
        ResourceType::Comments => QuerySchema {
            filters: &[],
            sorts: &const { [sort("content", "content")] },
        },
        ResourceType::Tags => QuerySchema {
            filters: &const { [filter("name", "name", Equals)] },
            sorts: &const { [sort("name", "name")] },
        },
        ResourceType::Videos => QuerySchema {
            filters: &const { [filter("title", "title", Contains)] },
            sorts: &const { [sort("title", "title")] },
        },
    }
}

/// Whether `path` (dot separated relation names) can be included starting
/// from `ty`. Polymorphic hops accept a segment valid for any target type.
pub fn include_path_allowed(ty: ResourceType, path: &str) -> bool {
    fn walk(ty: ResourceType, segments: &[&str]) -> bool {
        let Some((first, rest)) = segments.split_first() else {
            return true;
        };
        match relation(ty, first) {
            Some(rel) if !rel.is_read_only() => {
                rest.is_empty() || rel.types.iter().any(|t| walk(*t, rest))
            }
            _ => false,
        }
    }

    let segments: Vec<&str> = path.split('.').collect();
    !segments.iter().any(|s| s.is_empty()) && walk(ty, &segments)
}
