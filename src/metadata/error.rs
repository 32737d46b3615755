use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error(
        "Rate limited by {url}{}",
        .retry_after_secs.map(|secs| format!(": retry after {} seconds", secs)).unwrap_or_default()
    )]
    RateLimited {
        url: String,
        retry_after_secs: Option<u64>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    #[error("No README found under {0}")]
    NoReadme(String),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("No path declared for {npm_name}")]
    MissingPath { npm_name: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("githubAccessToken is not configured (set it in the config file or GITHUB_ACCESS_TOKEN)")]
    MissingCredential,

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid platform versions: {0}")]
    InvalidPlatformVersions(String),
}
