//! Fetcher trait for the three metadata sources

#[cfg(test)]
use mockall::automock;

use crate::metadata::error::FetchError;
use crate::metadata::types::{PackageManifest, Readme, RepositoryInfo};

/// Trait for fetching module metadata from external sources
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait MetadataFetcher: Send + Sync {
    /// Fetches `package.json` from the package root on the CDN
    ///
    /// # Arguments
    /// * `package_root` - e.g. `https://unpkg.com/aframe-foo@1.0.0`
    async fn fetch_package(&self, package_root: &str) -> Result<PackageManifest, FetchError>;

    /// Fetches repository details from GitHub
    ///
    /// Returns the empty record without a network call when `repo` is `None`.
    async fn fetch_repository(&self, repo: Option<String>) -> Result<RepositoryInfo, FetchError>;

    /// Fetches the README from the package root, trying each conventional filename
    async fn fetch_readme(&self, package_root: &str) -> Result<Readme, FetchError>;
}
