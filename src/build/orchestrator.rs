//! Registry build orchestration
//!
//! Drives the resolution engine over every module of both kinds concurrently
//! and assembles the per-platform-version output.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::join_all;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, warn};

use crate::build::engine::{VersionOutcome, resolve_module};
use crate::build::writer::write_output;
use crate::config::BuildConfig;
use crate::metadata::cache::{FileCache, RequestCache};
use crate::metadata::error::ResolveError;
use crate::metadata::resolver::MetadataResolver;
use crate::metadata::sources::HttpFetcher;
use crate::metadata::types::ResolvedMetadata;
use crate::registry::loader::load_registry;
use crate::registry::types::{ModuleKind, Registry};

/// Resolved modules for one platform version
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlatformRegistry {
    pub components: IndexMap<String, ResolvedMetadata>,
    pub shaders: IndexMap<String, ResolvedMetadata>,
}

impl PlatformRegistry {
    pub fn modules(&self, kind: ModuleKind) -> &IndexMap<String, ResolvedMetadata> {
        match kind {
            ModuleKind::Component => &self.components,
            ModuleKind::Shader => &self.shaders,
        }
    }

    fn modules_mut(&mut self, kind: ModuleKind) -> &mut IndexMap<String, ResolvedMetadata> {
        match kind {
            ModuleKind::Component => &mut self.components,
            ModuleKind::Shader => &mut self.shaders,
        }
    }
}

/// Platform version -> resolved modules. Every declared platform version has
/// an entry, even when nothing resolves for it.
pub type OutputRegistry = IndexMap<String, PlatformRegistry>;

/// A (module, platform version) pair whose fetch failed
#[derive(Debug, Clone)]
pub struct ResolutionFailure {
    pub kind: ModuleKind,
    pub npm_name: String,
    pub platform_version: String,
    pub error: Arc<ResolveError>,
}

impl std::fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} for {}: {}",
            self.kind, self.npm_name, self.platform_version, self.error
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub output: OutputRegistry,
    pub failures: Vec<ResolutionFailure>,
}

/// Resolve every module of `registry` for every platform version.
///
/// Never fails: pairs whose fetch failed are left out of `output` and
/// recorded in `failures`.
pub async fn build(
    registry: &Registry,
    resolver: &MetadataResolver,
    platform_versions: &[String],
) -> BuildReport {
    let mut output: OutputRegistry = platform_versions
        .iter()
        .map(|v| (v.clone(), PlatformRegistry::default()))
        .collect();

    let jobs = ModuleKind::ALL.into_iter().flat_map(move |kind| {
        registry
            .modules(kind)
            .iter()
            .map(move |(npm_name, module)| async move {
                let outcomes = resolve_module(resolver, npm_name, module, platform_versions).await;
                (kind, npm_name, outcomes)
            })
    });

    let mut failures = Vec::new();
    for (kind, npm_name, outcomes) in join_all(jobs).await {
        for (platform_version, outcome) in platform_versions.iter().zip(outcomes) {
            match outcome {
                VersionOutcome::Resolved(record) => {
                    if let Some(platform) = output.get_mut(platform_version) {
                        platform.modules_mut(kind).insert(npm_name.clone(), record);
                    }
                }
                VersionOutcome::Failed(error) => failures.push(ResolutionFailure {
                    kind,
                    npm_name: npm_name.clone(),
                    platform_version: platform_version.clone(),
                    error,
                }),
                VersionOutcome::Incompatible | VersionOutcome::Unavailable => {}
            }
        }
    }

    BuildReport { output, failures }
}

/// File locations for one build run
#[derive(Debug, Clone)]
pub struct BuildPaths {
    pub registry: PathBuf,
    pub out_dir: PathBuf,
    pub cache: PathBuf,
}

/// Full pipeline: load the registry and cache, resolve, write the output
/// files and persist the cache.
pub async fn run(config: &BuildConfig, paths: &BuildPaths) -> Result<BuildReport> {
    config.validate()?;
    let registry = load_registry(&paths.registry)?;

    let cache = Arc::new(
        FileCache::open(&paths.cache)
            .with_context(|| format!("Failed to open request cache {:?}", paths.cache))?,
    );
    info!("Loaded {} cached responses", cache.len());

    let fetcher = HttpFetcher::new(config, cache.clone())?;
    let resolver = MetadataResolver::new(Arc::new(fetcher), config);

    let report = build(&registry, &resolver, &config.platform_versions).await;

    for failure in &report.failures {
        warn!("Skipped {}", failure);
    }

    write_output(&report.output, &paths.out_dir)?;
    cache
        .persist()
        .with_context(|| format!("Failed to persist request cache {:?}", paths.cache))?;

    info!(
        "Built {} platform versions ({} failed resolutions)",
        report.output.len(),
        report.failures.len()
    );
    Ok(report)
}
