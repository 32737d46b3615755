use std::path::Path;

use semver::Version;
use serde::Deserialize;

use crate::metadata::error::ConfigError;

// =============================================================================
// Defaults
// =============================================================================

/// Package content delivery network serving `<name>@<version>/<path>`
pub const DEFAULT_CDN: &str = "https://unpkg.com/";

/// Image used when neither the registry nor the README provides one
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://cloud.githubusercontent.com/assets/674727/19178879/5a499302-8c0c-11e6-9bc8-5e6a130cb82e.png";

/// Default base URL for the GitHub API
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com/";

/// Base URL of the npm package pages linked from each record
pub const NPM_PACKAGE_URL: &str = "https://npmjs.com/package/";

/// A-Frame releases the registry is built for, oldest first
pub const DEFAULT_PLATFORM_VERSIONS: [&str; 4] = ["0.2.0", "0.3.0", "0.4.0", "0.5.0"];

/// Timeout for fetch operations in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Environment variable that overrides `githubAccessToken`
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_ACCESS_TOKEN";

pub const DEFAULT_CONFIG_PATH: &str = "config.local.json";
pub const DEFAULT_REGISTRY_PATH: &str = "registry.yml";
pub const DEFAULT_OUT_DIR: &str = "build";
pub const DEFAULT_CACHE_PATH: &str = ".requestcache";

/// Build configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildConfig {
    #[serde(rename = "CDN")]
    pub cdn: String,
    pub placeholder_image: String,
    pub github_access_token: Option<String>,
    pub github_api: String,
    /// Ascending; later versions fall back to earlier ones only
    pub platform_versions: Vec<String>,
    pub fetch_timeout_ms: u64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            cdn: DEFAULT_CDN.to_string(),
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            github_access_token: None,
            github_api: DEFAULT_GITHUB_API.to_string(),
            platform_versions: DEFAULT_PLATFORM_VERSIONS
                .iter()
                .map(|v| v.to_string())
                .collect(),
            fetch_timeout_ms: FETCH_TIMEOUT_MS,
        }
    }
}

impl BuildConfig {
    /// Load configuration from `path`, falling back to defaults when the file
    /// does not exist. `GITHUB_ACCESS_TOKEN` takes precedence over the file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Self::default()
        };

        if let Ok(token) = std::env::var(GITHUB_TOKEN_ENV)
            && !token.is_empty()
        {
            config.github_access_token = Some(token);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce a build
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .github_access_token
            .as_deref()
            .is_none_or(|token| token.trim().is_empty())
        {
            return Err(ConfigError::MissingCredential);
        }

        if self.platform_versions.is_empty() {
            return Err(ConfigError::InvalidPlatformVersions(
                "no platform versions declared".to_string(),
            ));
        }

        let mut previous: Option<(&str, Version)> = None;
        for raw in &self.platform_versions {
            let parsed = Version::parse(raw).map_err(|e| {
                ConfigError::InvalidPlatformVersions(format!("{}: {}", raw, e))
            })?;
            if let Some((prev_raw, prev)) = &previous
                && parsed <= *prev
            {
                return Err(ConfigError::InvalidPlatformVersions(format!(
                    "{} must come after {}",
                    raw, prev_raw
                )));
            }
            previous = Some((raw.as_str(), parsed));
        }

        Ok(())
    }

    /// Access token; only valid after `validate`
    pub fn github_token(&self) -> &str {
        self.github_access_token.as_deref().unwrap_or_default()
    }
}
