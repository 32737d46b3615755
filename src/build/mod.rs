//! Registry build: version fallback resolution, orchestration and output
//!
//! - [`engine`]: per-module resolution across platform versions
//! - [`orchestrator`]: runs every module concurrently and assembles the output
//! - [`writer`]: writes `<platform version>.json` files

pub mod engine;
pub mod orchestrator;
pub mod writer;

pub use orchestrator::{BuildPaths, BuildReport, OutputRegistry, build, run};
