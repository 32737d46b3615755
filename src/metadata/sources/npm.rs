//! Package manifest fetcher (`<package root>/package.json` on the CDN)

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::metadata::cache::RequestCache;
use crate::metadata::error::FetchError;
use crate::metadata::resolver::url_join;
use crate::metadata::types::PackageManifest;

pub struct NpmSource {
    client: reqwest::Client,
    cache: Arc<dyn RequestCache>,
}

impl NpmSource {
    pub fn new(client: reqwest::Client, cache: Arc<dyn RequestCache>) -> Self {
        Self { client, cache }
    }

    pub async fn fetch_package(&self, package_root: &str) -> Result<PackageManifest, FetchError> {
        let url = url_join(package_root, "package.json");

        if let Some(cached) = self.cache.get(&url)? {
            return parse_manifest(&url, cached);
        }

        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url));
        }

        if !status.is_success() {
            warn!("CDN returned status {}: {}", status, url);
            return Err(FetchError::InvalidResponse {
                url,
                message: format!("Unexpected status: {}", status),
            });
        }

        let body: Value = response.json().await.map_err(|e| {
            warn!("Failed to parse package.json from {}: {}", url, e);
            FetchError::InvalidResponse {
                url: url.clone(),
                message: e.to_string(),
            }
        })?;

        let manifest = parse_manifest(&url, body.clone())?;
        self.cache.set(&url, body)?;
        Ok(manifest)
    }
}

fn parse_manifest(url: &str, body: Value) -> Result<PackageManifest, FetchError> {
    serde_json::from_value(body).map_err(|e| FetchError::InvalidResponse {
        url: url.to_string(),
        message: e.to_string(),
    })
}
