//! GitHub repository API fetcher

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::metadata::cache::RequestCache;
use crate::metadata::error::FetchError;
use crate::metadata::resolver::url_join;
use crate::metadata::types::RepositoryInfo;

pub struct GitHubSource {
    client: reqwest::Client,
    cache: Arc<dyn RequestCache>,
    base_url: String,
    access_token: String,
}

impl GitHubSource {
    pub fn new(
        client: reqwest::Client,
        cache: Arc<dyn RequestCache>,
        base_url: &str,
        access_token: &str,
    ) -> Self {
        Self {
            client,
            cache,
            base_url: base_url.to_string(),
            access_token: access_token.to_string(),
        }
    }

    pub async fn fetch_repository(&self, repo: Option<&str>) -> Result<RepositoryInfo, FetchError> {
        let Some(repo) = repo else {
            return Ok(RepositoryInfo::default());
        };

        // Cache key omits the access token
        let url = url_join(&url_join(&self.base_url, "repos"), repo);

        if let Some(cached) = self.cache.get(&url)? {
            return parse_repository(&url, cached);
        }

        info!("Fetching from GitHub {} ...", repo);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .query(&[("access_token", self.access_token.as_str())])
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(FetchError::RateLimited {
                url,
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(FetchError::InvalidResponse {
                url,
                message: format!("Unexpected status: {}", status),
            });
        }

        let body: Value = response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub repository response: {}", e);
            FetchError::InvalidResponse {
                url: url.clone(),
                message: e.to_string(),
            }
        })?;

        let info = parse_repository(&url, body.clone())?;
        self.cache.set(&url, body)?;
        Ok(info)
    }
}

fn parse_repository(url: &str, body: Value) -> Result<RepositoryInfo, FetchError> {
    serde_json::from_value(body).map_err(|e| FetchError::InvalidResponse {
        url: url.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::cache::MockRequestCache;
    use mockito::{Matcher, Server};

    fn empty_cache() -> MockRequestCache {
        let mut cache = MockRequestCache::new();
        cache.expect_get().returning(|_| Ok(None));
        cache
    }

    #[tokio::test]
    async fn fetch_repository_sends_token_and_parses_fields() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/aframevr/aframe")
            .match_query(Matcher::UrlEncoded(
                "access_token".to_string(),
                "secret".to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "created_at": "2000-01-01T12:00:00Z",
                    "updated_at": "2010-01-01T12:00:01Z",
                    "html_url": "https://github.com/aframevr/aframe",
                    "stargazers_count": 9001
                }"#,
            )
            .create_async()
            .await;

        let mut cache = empty_cache();
        cache
            .expect_set()
            .withf(|url, _| url.ends_with("/repos/aframevr/aframe") && !url.contains("secret"))
            .times(1)
            .returning(|_, _| Ok(()));

        let source = GitHubSource::new(
            reqwest::Client::new(),
            Arc::new(cache),
            &server.url(),
            "secret",
        );
        let info = source
            .fetch_repository(Some("aframevr/aframe"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            info,
            RepositoryInfo {
                created_at: Some("2000-01-01T12:00:00Z".to_string()),
                updated_at: Some("2010-01-01T12:00:01Z".to_string()),
                html_url: Some("https://github.com/aframevr/aframe".to_string()),
                stargazers_count: Some(9001),
            }
        );
    }

    #[tokio::test]
    async fn fetch_repository_without_slug_returns_empty_record() {
        let mut cache = MockRequestCache::new();
        cache.expect_get().times(0);
        cache.expect_set().times(0);

        let source = GitHubSource::new(
            reqwest::Client::new(),
            Arc::new(cache),
            "http://127.0.0.1:9",
            "secret",
        );
        let info = source.fetch_repository(None).await.unwrap();

        assert_eq!(info, RepositoryInfo::default());
    }

    #[tokio::test]
    async fn fetch_repository_returns_not_found_for_nonexistent_repo() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/nonexistent/repo")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let source = GitHubSource::new(
            reqwest::Client::new(),
            Arc::new(empty_cache()),
            &server.url(),
            "secret",
        );
        let result = source.fetch_repository(Some("nonexistent/repo")).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(FetchError::NotFound(_))));
    }

    #[tokio::test]
    async fn fetch_repository_returns_rate_limited_for_429() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/aframevr/aframe")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_header("retry-after", "60")
            .with_body(r#"{"message": "API rate limit exceeded"}"#)
            .create_async()
            .await;

        let source = GitHubSource::new(
            reqwest::Client::new(),
            Arc::new(empty_cache()),
            &server.url(),
            "secret",
        );
        let result = source.fetch_repository(Some("aframevr/aframe")).await;

        mock.assert_async().await;
        let error = result.unwrap_err();
        let expected_url = format!("{}/repos/aframevr/aframe", server.url());
        assert!(matches!(
            &error,
            FetchError::RateLimited { url, retry_after_secs: Some(60) } if *url == expected_url
        ));
        assert_eq!(
            error.to_string(),
            format!("Rate limited by {}: retry after 60 seconds", expected_url)
        );
    }
}
