//! Shapes of the external metadata sources and the resolved record

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Subset of a package's `package.json` used by the registry.
///
/// Fields with an unrecognized shape read as `None` instead of rejecting the
/// whole manifest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PackageManifest {
    #[serde(deserialize_with = "deserialize_lenient")]
    pub author: Option<AuthorField>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub license: Option<LicenseField>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub repository: Option<RepositoryField>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub homepage: Option<String>,
}

fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

/// `author` is either `"Name <email> (url)"` or `{ "name": ..., "email": ... }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AuthorField {
    Text(String),
    Person { name: String },
}

impl AuthorField {
    /// Trimmed author string
    pub fn display(&self) -> String {
        match self {
            AuthorField::Text(text) => text.trim().to_string(),
            AuthorField::Person { name } => name.trim().to_string(),
        }
    }
}

/// `license` is an SPDX string or the legacy `{ "type": ... }` object
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LicenseField {
    Spdx(String),
    Legacy {
        #[serde(rename = "type")]
        kind: String,
    },
}

impl LicenseField {
    pub fn name(&self) -> &str {
        match self {
            LicenseField::Spdx(name) => name,
            LicenseField::Legacy { kind } => kind,
        }
    }
}

/// `repository` is a slug, a URL, or `{ "type": "git", "url": ... }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RepositoryField {
    Text(String),
    Object { url: String },
}

/// Fields read from `GET /repos/{owner}/{repo}`. Every field is optional: a
/// package without a GitHub repository resolves to the empty record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryInfo {
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub html_url: Option<String>,
    #[serde(deserialize_with = "deserialize_count")]
    pub stargazers_count: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Count {
    Number(u64),
    Text(String),
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let count = Option::<Count>::deserialize(deserializer)?;
    Ok(match count {
        Some(Count::Number(n)) => Some(n),
        Some(Count::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

/// README body and the URL it was found at
#[derive(Debug, Clone, PartialEq)]
pub struct Readme {
    pub text: String,
    pub url: String,
}

/// Flattened metadata for one module at one platform version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMetadata {
    pub author: Option<String>,
    pub author_name: Option<String>,
    pub description: Option<String>,
    pub file: String,
    pub filename: String,
    pub github_created: Option<String>,
    pub github_updated: Option<String>,
    pub github_url: Option<String>,
    pub github_stars: Option<u64>,
    pub image: String,
    pub license: Option<String>,
    pub names: Vec<String>,
    pub npm_name: String,
    pub npm_url: String,
    pub readme_url: String,
    pub version: String,
    /// Set when the record was inherited from an earlier platform version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_version: Option<String>,
}

impl ResolvedMetadata {
    /// Copy of this record attributed to `platform_version`
    pub fn inherited_from(&self, platform_version: &str) -> Self {
        Self {
            fallback_version: Some(platform_version.to_string()),
            ..self.clone()
        }
    }
}
