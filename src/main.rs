use std::path::{Path, PathBuf};

use aframe_registry::build::{self, BuildPaths};
use aframe_registry::config::{
    BuildConfig, DEFAULT_CACHE_PATH, DEFAULT_CONFIG_PATH, DEFAULT_OUT_DIR, DEFAULT_REGISTRY_PATH,
};
use anyhow::Context;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "aframe-registry")]
#[command(version, about = "Build the A-Frame component registry JSON files")]
struct Cli {
    /// Registry declaration
    #[arg(long, default_value = DEFAULT_REGISTRY_PATH)]
    registry: PathBuf,

    /// JSON configuration file (optional)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory receiving `<platform version>.json`
    #[arg(long, default_value = DEFAULT_OUT_DIR)]
    out_dir: PathBuf,

    /// Persisted request cache
    #[arg(long, default_value = DEFAULT_CACHE_PATH)]
    cache: PathBuf,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "aframe_registry=info".into())
    };
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter());

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let directory = path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path {:?}", path))?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(guard)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.log_file.as_deref())?;

    // Credentials are checked before any fetch
    let config = BuildConfig::load(&cli.config)?;
    let paths = BuildPaths {
        registry: cli.registry,
        out_dir: cli.out_dir,
        cache: cli.cache,
    };

    let report = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(build::run(&config, &paths))?;

    if !report.failures.is_empty() {
        tracing::warn!(
            "{} module/version pairs could not be resolved",
            report.failures.len()
        );
    }
    Ok(())
}
