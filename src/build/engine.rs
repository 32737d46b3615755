//! Version resolution engine
//!
//! For one module, every platform version gets a shared resolution handle.
//! Handles are created in ascending order; a version without an explicit
//! entry awaits the handle of the version immediately before it and inherits
//! its record, so fallbacks chain one hop at a time.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared, join_all};
use tracing::{error, info};

use crate::metadata::error::ResolveError;
use crate::metadata::resolver::MetadataResolver;
use crate::metadata::types::ResolvedMetadata;
use crate::registry::types::{ModuleDeclaration, VersionSpec};

/// Result of resolving one module at one platform version
#[derive(Debug, Clone)]
pub enum VersionOutcome {
    /// Fresh record, or an inherited one when `fallback_version` is set
    Resolved(ResolvedMetadata),
    /// Explicitly marked incompatible
    Incompatible,
    /// No entry and nothing to inherit
    Unavailable,
    /// Fetching failed; logged and treated as no record
    Failed(Arc<ResolveError>),
}

impl VersionOutcome {
    pub fn record(&self) -> Option<&ResolvedMetadata> {
        match self {
            VersionOutcome::Resolved(record) => Some(record),
            _ => None,
        }
    }
}

type Handle<'a> = Shared<BoxFuture<'a, VersionOutcome>>;

/// Resolve `module` for every platform version.
///
/// The returned outcomes are aligned with `platform_versions`.
pub async fn resolve_module<'a>(
    resolver: &'a MetadataResolver,
    npm_name: &'a str,
    module: &'a ModuleDeclaration,
    platform_versions: &'a [String],
) -> Vec<VersionOutcome> {
    let mut handles: Vec<Handle<'a>> = Vec::with_capacity(platform_versions.len());

    for (index, platform_version) in platform_versions.iter().enumerate() {
        let previous = index
            .checked_sub(1)
            .map(|prev| (platform_versions[prev].as_str(), handles[prev].clone()));

        let handle = resolve_version(resolver, npm_name, module, platform_version, previous)
            .boxed()
            .shared();
        handles.push(handle);
    }

    join_all(handles).await
}

async fn resolve_version<'a>(
    resolver: &'a MetadataResolver,
    npm_name: &'a str,
    module: &'a ModuleDeclaration,
    platform_version: &'a str,
    previous: Option<(&'a str, Handle<'a>)>,
) -> VersionOutcome {
    match module.version_spec(platform_version) {
        VersionSpec::Incompatible => {
            info!("{} marked not compatible with {}", npm_name, platform_version);
            VersionOutcome::Incompatible
        }
        VersionSpec::Pinned(entry) => {
            match resolver
                .get_metadata(npm_name, module, entry, platform_version)
                .await
            {
                Ok(record) => VersionOutcome::Resolved(record),
                Err(e) => {
                    error!(
                        "Failed to resolve {}@{} for {}: {}",
                        npm_name, entry.version, platform_version, e
                    );
                    VersionOutcome::Failed(Arc::new(e))
                }
            }
        }
        VersionSpec::Unspecified => {
            let Some((previous_version, previous)) = previous else {
                return VersionOutcome::Unavailable;
            };

            match previous.await {
                VersionOutcome::Resolved(record) => {
                    info!(
                        "{} marked to fall back to {} entry for {}",
                        npm_name, previous_version, platform_version
                    );
                    VersionOutcome::Resolved(record.inherited_from(previous_version))
                }
                _ => VersionOutcome::Unavailable,
            }
        }
    }
}
