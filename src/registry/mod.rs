//! Registry declaration layer
//!
//! - [`types`]: modules, version entries and their compatibility semantics
//! - [`loader`]: `registry.yml` parsing and validation

pub mod loader;
pub mod types;
