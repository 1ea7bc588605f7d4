pub mod relationships;
pub mod resources;
