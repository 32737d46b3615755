//! `registry.yml` loading and validation

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::registry::types::{ModuleKind, Registry};

/// Read and validate the registry declaration at `path`
pub fn load_registry(path: &Path) -> Result<Registry> {
    info!("Processing {} ...", path.display());
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    parse_registry(&content).with_context(|| format!("Failed to parse {:?}", path))
}

/// Parse and validate a registry declaration
pub fn parse_registry(content: &str) -> Result<Registry> {
    let registry = if content.trim().is_empty() {
        Registry::default()
    } else {
        serde_yaml::from_str::<Option<Registry>>(content)?.unwrap_or_default()
    };
    validate(&registry)?;

    info!(
        "Registry declares {} components and {} shaders",
        registry.components.len(),
        registry.shaders.len()
    );
    Ok(registry)
}

fn validate(registry: &Registry) -> Result<()> {
    for kind in ModuleKind::ALL {
        for (npm_name, module) in registry.modules(kind) {
            if npm_name.trim().is_empty() {
                bail!("{} contains an entry with an empty package name", kind);
            }
            if module.names.is_empty() {
                bail!("{}.{} must declare at least one name", kind, npm_name);
            }
            for (platform_version, entry) in &module.versions {
                if let Some(entry) = entry
                    && entry.version.trim().is_empty()
                {
                    bail!(
                        "{}.{} has an empty package version for {}",
                        kind,
                        npm_name,
                        platform_version
                    );
                }
            }
        }
    }
    Ok(())
}
