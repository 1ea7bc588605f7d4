//! Static description of the resource graph: types, relations and the
//! query parameters each type accepts.

pub mod registry;
pub mod relation;
pub mod resource_ref;
pub mod resource_type;

pub use registry::{
    has_exclusive_inverse, include_path_allowed, query_schema, relation, relations, FilterMode, FilterSpec, QuerySchema,
    SortSpec,
};
pub use relation::{Accessor, Cardinality, Computed, Pivot, RelationDescriptor};
pub use resource_ref::ResourceRef;
pub use resource_type::ResourceType;
