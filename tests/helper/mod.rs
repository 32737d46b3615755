//! Shared test utilities: a configurable metadata fetcher and registry factories

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::json;

use aframe_registry::config::BuildConfig;
use aframe_registry::metadata::error::FetchError;
use aframe_registry::metadata::fetcher::MetadataFetcher;
use aframe_registry::metadata::resolver::MetadataResolver;
use aframe_registry::metadata::types::{
    AuthorField, LicenseField, PackageManifest, Readme, RepositoryField, RepositoryInfo,
};
use aframe_registry::registry::types::{ModuleDeclaration, Names, Registry, VersionEntry};

pub const CDN: &str = "https://unpkg.com/";
pub const PLACEHOLDER_IMAGE: &str = "https://example.com/placeholder.png";

/// Fetcher answering every package with the same canned metadata
pub struct StubFetcher {
    manifest: PackageManifest,
    github: RepositoryInfo,
    readme: Readme,
    failing: HashSet<String>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self {
            manifest: PackageManifest {
                author: Some(AuthorField::Text("Test Test <test@test.com>".to_string())),
                description: Some("This is test".to_string()),
                license: Some(LicenseField::Spdx("TEST".to_string())),
                repository: Some(RepositoryField::Text("aframevr/aframe".to_string())),
                homepage: None,
            },
            // Stars arrive as a string, as some mirrors of the API send them
            github: serde_json::from_value(json!({
                "created_at": "2000-01-01T12:00:00Z",
                "html_url": "https://github.com/aframevr/aframe",
                "stargazers_count": "9001",
                "updated_at": "2010-01-01T12:00:01Z"
            }))
            .unwrap(),
            readme: Readme {
                text: "This is my test".to_string(),
                url: "https://unpkg.io/aframe/README.md".to_string(),
            },
            failing: HashSet::new(),
        }
    }

    pub fn with_readme_text(mut self, text: &str) -> Self {
        self.readme.text = text.to_string();
        self
    }

    pub fn with_readme_url(mut self, url: &str) -> Self {
        self.readme.url = url.to_string();
        self
    }

    /// Make `fetch_package` fail for `package_root`
    pub fn with_failing_package(mut self, package_root: &str) -> Self {
        self.failing.insert(package_root.to_string());
        self
    }
}

#[async_trait]
impl MetadataFetcher for StubFetcher {
    async fn fetch_package(&self, package_root: &str) -> Result<PackageManifest, FetchError> {
        if self.failing.contains(package_root) {
            return Err(FetchError::NotFound(format!("{}/package.json", package_root)));
        }
        Ok(self.manifest.clone())
    }

    async fn fetch_repository(&self, repo: Option<String>) -> Result<RepositoryInfo, FetchError> {
        Ok(match repo {
            Some(_) => self.github.clone(),
            None => RepositoryInfo::default(),
        })
    }

    async fn fetch_readme(&self, _package_root: &str) -> Result<Readme, FetchError> {
        Ok(self.readme.clone())
    }
}

pub fn create_test_resolver(fetcher: StubFetcher) -> MetadataResolver {
    let config = BuildConfig {
        cdn: CDN.to_string(),
        placeholder_image: PLACEHOLDER_IMAGE.to_string(),
        ..BuildConfig::default()
    };
    MetadataResolver::new(Arc::new(fetcher), &config)
}

pub fn default_platform_versions() -> Vec<String> {
    BuildConfig::default().platform_versions
}

pub fn entry(version: &str, path: Option<&str>) -> VersionEntry {
    VersionEntry {
        version: version.to_string(),
        path: path.map(|p| p.to_string()),
        image: None,
    }
}

/// `0.2.0` pinned to `test@1.2.3` at `dist/test.js`
pub fn default_versions() -> IndexMap<String, Option<VersionEntry>> {
    IndexMap::from([(
        "0.2.0".to_string(),
        Some(entry("1.2.3", Some("dist/test.js"))),
    )])
}

/// A `test` module with the given versions and names
pub fn test_module(
    versions: Option<IndexMap<String, Option<VersionEntry>>>,
    names: Option<Names>,
) -> ModuleDeclaration {
    ModuleDeclaration {
        names: names.unwrap_or_else(|| Names::One("test".to_string())),
        path: None,
        image: None,
        versions: versions.unwrap_or_else(default_versions),
    }
}

pub fn component_factory(module: ModuleDeclaration) -> Registry {
    Registry {
        components: IndexMap::from([("test".to_string(), module)]),
        shaders: IndexMap::new(),
    }
}

pub fn shader_factory(module: ModuleDeclaration) -> Registry {
    Registry {
        components: IndexMap::new(),
        shaders: IndexMap::from([("test".to_string(), module)]),
    }
}
