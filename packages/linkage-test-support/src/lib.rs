//! Test support for the linkage backend.
//!
//! Logging bootstrap, JSON:API error document assertions and random fixture
//! data helpers. Nothing here depends on backend types.

pub mod jsonapi_errors;
pub mod logging;
pub mod unique_helpers;
