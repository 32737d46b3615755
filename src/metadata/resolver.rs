//! Fuses the three metadata sources into one [`ResolvedMetadata`] record

use std::sync::Arc;

use chrono::{DateTime, Datelike};
use tracing::{info, warn};

use crate::config::{BuildConfig, NPM_PACKAGE_URL};
use crate::metadata::error::ResolveError;
use crate::metadata::fetcher::MetadataFetcher;
use crate::metadata::readme::parse_image_from_text;
use crate::metadata::repository::infer_github_repository;
use crate::metadata::types::{RepositoryInfo, ResolvedMetadata};
use crate::registry::types::{ModuleDeclaration, VersionEntry};

pub struct MetadataResolver {
    fetcher: Arc<dyn MetadataFetcher>,
    cdn: String,
    placeholder_image: String,
}

impl MetadataResolver {
    pub fn new(fetcher: Arc<dyn MetadataFetcher>, config: &BuildConfig) -> Self {
        Self {
            fetcher,
            cdn: config.cdn.clone(),
            placeholder_image: config.placeholder_image.clone(),
        }
    }

    /// Root URL of `npm_name@version` on the CDN
    pub fn package_root(&self, npm_name: &str, package_version: &str) -> String {
        url_join(&self.cdn, &format!("{}@{}", npm_name, package_version))
    }

    /// Fetch and fuse metadata for a module pinned to `entry` at `platform_version`
    pub async fn get_metadata(
        &self,
        npm_name: &str,
        module: &ModuleDeclaration,
        entry: &VersionEntry,
        platform_version: &str,
    ) -> Result<ResolvedMetadata, ResolveError> {
        let path = entry
            .path
            .as_deref()
            .or(module.path.as_deref())
            .ok_or_else(|| ResolveError::MissingPath {
                npm_name: npm_name.to_string(),
            })?;

        let package_root = self.package_root(npm_name, &entry.version);

        info!("Fetching from npm {} {} ...", npm_name, entry.version);
        let manifest = self.fetcher.fetch_package(&package_root).await?;

        let repo = manifest
            .repository
            .as_ref()
            .and_then(infer_github_repository);
        let (github, readme) = futures::try_join!(
            self.fetcher.fetch_repository(repo),
            self.fetcher.fetch_readme(&package_root),
        )?;

        info!(
            "{} registered to use {} for {}",
            npm_name, entry.version, platform_version
        );

        let author = manifest.author.as_ref().map(|a| a.display());
        let author_name = author.as_deref().map(author_name);

        let image = module
            .image
            .clone()
            .or_else(|| entry.image.clone())
            .or_else(|| parse_image_from_text(&readme.text, &package_root))
            .unwrap_or_else(|| self.placeholder_image.clone());

        let RepositoryInfo {
            created_at,
            updated_at,
            html_url,
            stargazers_count,
        } = github;

        Ok(ResolvedMetadata {
            author,
            author_name,
            description: manifest.description,
            file: url_join(&package_root, path),
            filename: basename(path).to_string(),
            github_created: created_at.as_deref().and_then(format_long_date),
            github_updated: updated_at.as_deref().and_then(format_long_date),
            github_url: html_url,
            github_stars: stargazers_count,
            image,
            license: manifest.license.as_ref().map(|l| l.name().to_string()),
            names: module.names.to_vec(),
            npm_name: npm_name.to_string(),
            npm_url: url_join(NPM_PACKAGE_URL, npm_name),
            readme_url: readme.url,
            version: entry.version.clone(),
            fallback_version: None,
        })
    }
}

/// Join URL segments with exactly one `/` between them
pub fn url_join(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// Author name without the `<email>` / `(url)` suffix
pub fn author_name(author: &str) -> String {
    author
        .split('<')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn basename(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path)
}

/// Format an RFC 3339 timestamp as e.g. `January 1st 2000` (UTC)
pub fn format_long_date(timestamp: &str) -> Option<String> {
    let parsed = DateTime::parse_from_rfc3339(timestamp)
        .inspect_err(|e| warn!("Unparsable timestamp {:?}: {}", timestamp, e))
        .ok()?
        .to_utc();

    let day = parsed.day();
    Some(format!(
        "{} {}{} {}",
        parsed.format("%B"),
        day,
        ordinal_suffix(day),
        parsed.year()
    ))
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
