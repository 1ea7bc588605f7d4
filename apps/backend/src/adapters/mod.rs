//! Adapters for external dependencies.

pub mod relations_sea;
pub mod resources_sea;
