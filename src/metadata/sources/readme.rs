//! README fetcher

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::metadata::cache::RequestCache;
use crate::metadata::error::FetchError;
use crate::metadata::resolver::url_join;
use crate::metadata::types::Readme;

/// Conventional README filenames, tried in order
pub const README_FILENAMES: [&str; 7] = [
    "README.md",
    "readme.md",
    "Readme.md",
    "README.markdown",
    "readme.markdown",
    "README.mkd",
    "readme.mkd",
];

pub struct ReadmeSource {
    client: reqwest::Client,
    cache: Arc<dyn RequestCache>,
}

impl ReadmeSource {
    pub fn new(client: reqwest::Client, cache: Arc<dyn RequestCache>) -> Self {
        Self { client, cache }
    }

    pub async fn fetch_readme(&self, package_root: &str) -> Result<Readme, FetchError> {
        let urls: Vec<String> = README_FILENAMES
            .iter()
            .map(|filename| url_join(package_root, filename))
            .collect();

        // Any previously found variant wins before touching the network
        for url in &urls {
            if let Some(Value::String(text)) = self.cache.get(url)? {
                return Ok(Readme {
                    text,
                    url: url.clone(),
                });
            }
        }

        for url in urls {
            match self.try_fetch(&url).await {
                Ok(text) => {
                    self.cache.set(&url, Value::String(text.clone()))?;
                    return Ok(Readme { text, url });
                }
                Err(e) => debug!("README not available at {}: {}", url, e),
            }
        }

        error!("Error fetching README {}", package_root);
        Err(FetchError::NoReadme(package_root.to_string()))
    }

    async fn try_fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            warn!("CDN returned status {}: {}", status, url);
            return Err(FetchError::InvalidResponse {
                url: url.to_string(),
                message: format!("Unexpected status: {}", status),
            });
        }

        Ok(response.text().await?)
    }
}
