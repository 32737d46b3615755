pub mod build;
pub mod config;
pub mod metadata;
pub mod registry;
