//! HTTP implementations of the metadata sources

pub mod github;
pub mod npm;
pub mod readme;

use std::sync::Arc;
use std::time::Duration;

pub use github::GitHubSource;
pub use npm::NpmSource;
pub use readme::ReadmeSource;

use crate::config::BuildConfig;
use crate::metadata::cache::RequestCache;
use crate::metadata::error::FetchError;
use crate::metadata::fetcher::MetadataFetcher;
use crate::metadata::types::{PackageManifest, Readme, RepositoryInfo};

/// [`MetadataFetcher`] backed by the CDN and the GitHub API, sharing one
/// HTTP client and one request cache
pub struct HttpFetcher {
    npm: NpmSource,
    github: GitHubSource,
    readme: ReadmeSource,
}

impl HttpFetcher {
    pub fn new(config: &BuildConfig, cache: Arc<dyn RequestCache>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent("aframe-registry")
            .timeout(Duration::from_millis(config.fetch_timeout_ms))
            .build()?;

        Ok(Self {
            npm: NpmSource::new(client.clone(), cache.clone()),
            github: GitHubSource::new(
                client.clone(),
                cache.clone(),
                &config.github_api,
                config.github_token(),
            ),
            readme: ReadmeSource::new(client, cache),
        })
    }
}

#[async_trait::async_trait]
impl MetadataFetcher for HttpFetcher {
    async fn fetch_package(&self, package_root: &str) -> Result<PackageManifest, FetchError> {
        self.npm.fetch_package(package_root).await
    }

    async fn fetch_repository(&self, repo: Option<String>) -> Result<RepositoryInfo, FetchError> {
        self.github.fetch_repository(repo.as_deref()).await
    }

    async fn fetch_readme(&self, package_root: &str) -> Result<Readme, FetchError> {
        self.readme.fetch_readme(package_root).await
    }
}
