//! Repository functions for the domain layer.

pub mod relations;
pub mod resources;
