//! JSON:API wire format: documents, media type, query parameters.

pub mod document;
pub mod links;
pub mod media;
pub mod pagination;
pub mod query;

/// Prefix of every route and link.
pub const API_PREFIX: &str = "/api/v1";
