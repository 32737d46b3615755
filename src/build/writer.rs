//! Output writer: one `<platform version>.json` per platform version

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::build::orchestrator::OutputRegistry;

/// Write every platform registry to `<out_dir>/<platform version>.json`,
/// creating `out_dir` if needed. Returns the written paths in order.
pub fn write_output(output: &OutputRegistry, out_dir: &Path) -> Result<Vec<PathBuf>> {
    info!("Registry processed, writing files...");
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {:?}", out_dir))?;

    let mut written = Vec::with_capacity(output.len());
    for (platform_version, platform) in output {
        let path = out_dir.join(format!("{}.json", platform_version));
        info!("Writing {} ...", path.display());

        let json = serde_json::to_string(platform)
            .with_context(|| format!("Failed to serialize registry for {}", platform_version))?;
        std::fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))?;
        written.push(path);
    }

    info!("Processing complete!");
    Ok(written)
}
