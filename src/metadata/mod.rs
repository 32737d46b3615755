//! Metadata layer: fetching, caching and fusing module metadata
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Resolver   │────▶│   Fetcher   │────▶│    Cache    │
//! │   (fuse)    │     │   (trait)   │     │ (.request-  │
//! └─────────────┘     └─────────────┘     │   cache)    │
//!        │                   │            └─────────────┘
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │ readme /    │     │   Sources   │
//! │ repository  │     │(npm,github, │
//! │ (derive)    │     │   readme)   │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: persisted request cache keyed by URL
//! - [`error`]: error types for cache, fetch, resolve and configuration
//! - [`fetcher`]: `MetadataFetcher` trait over the three sources
//! - [`readme`]: preview image extraction from README bodies
//! - [`repository`]: GitHub slug inference from `package.json`
//! - [`resolver`]: fuses sources into a `ResolvedMetadata` record
//! - [`sources`]: HTTP implementations (CDN `package.json`, GitHub, README)
//! - [`types`]: external field shapes and the resolved record

pub mod cache;
pub mod error;
pub mod fetcher;
pub mod readme;
pub mod repository;
pub mod resolver;
pub mod sources;
pub mod types;
