//! Relationship resolution and synchronization.
//!
//! `resolver` turns a relationship document into a `ResolvedMutation`,
//! `sync` applies it, `reader` projects stored state back to documents.
//! `diff` holds the set arithmetic both sides share.

pub mod diff;
pub mod error;
pub mod reader;
pub mod resolver;
pub mod sync;

pub use error::RelationshipError;
pub use reader::Owner;
pub use resolver::{Operation, ResolvedMutation, ResourceLookup, StoredResources};
