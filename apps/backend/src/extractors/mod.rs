pub mod jsonapi_body;
pub mod jsonapi_query;

pub use jsonapi_body::JsonApiBody;
pub use jsonapi_query::JsonApiQuery;
