//! Declarative registry model (`registry.yml`)

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// Kind of registered module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    Component,
    Shader,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 2] = [ModuleKind::Component, ModuleKind::Shader];

    /// Key used in `registry.yml` and the output JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Component => "components",
            ModuleKind::Shader => "shaders",
        }
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `names` is a single string or a list (component groups)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Names {
    One(String),
    Many(Vec<String>),
}

impl Names {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Names::One(name) => vec![name.clone()],
            Names::Many(names) => names.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Names::One(name) => name.trim().is_empty(),
            Names::Many(names) => names.iter().all(|n| n.trim().is_empty()),
        }
    }
}

/// A package version pinned for one platform version
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VersionEntry {
    /// npm package version
    #[serde(deserialize_with = "deserialize_package_version")]
    pub version: String,
    /// Overrides [`ModuleDeclaration::path`]
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// YAML reads `version: 1.0` as a float; accept scalars and keep their text
fn deserialize_package_version<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Integer(u64),
        Float(f64),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(text) => text,
        Scalar::Integer(n) => n.to_string(),
        Scalar::Float(f) => f.to_string(),
    })
}

/// Compatibility of a module with one platform version
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VersionSpec<'a> {
    /// Explicit `null`: incompatible, neither fetched nor inherited
    Incompatible,
    /// Pinned package version: fetch fresh metadata
    Pinned(&'a VersionEntry),
    /// Key absent: inherit from the previous platform version
    Unspecified,
}

/// One component or shader, keyed by npm package name in [`Registry`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModuleDeclaration {
    pub names: Names,
    /// Default file path inside the package
    #[serde(default)]
    pub path: Option<String>,
    /// Takes precedence over every other image source
    #[serde(default)]
    pub image: Option<String>,
    /// Platform version -> entry; `null` marks incompatibility
    #[serde(default)]
    pub versions: IndexMap<String, Option<VersionEntry>>,
}

impl ModuleDeclaration {
    pub fn version_spec(&self, platform_version: &str) -> VersionSpec<'_> {
        match self.versions.get(platform_version) {
            Some(None) => VersionSpec::Incompatible,
            Some(Some(entry)) => VersionSpec::Pinned(entry),
            None => VersionSpec::Unspecified,
        }
    }
}

/// The whole registry: module kind -> npm name -> declaration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Registry {
    pub components: IndexMap<String, ModuleDeclaration>,
    pub shaders: IndexMap<String, ModuleDeclaration>,
}

impl Registry {
    pub fn modules(&self, kind: ModuleKind) -> &IndexMap<String, ModuleDeclaration> {
        match kind {
            ModuleKind::Component => &self.components,
            ModuleKind::Shader => &self.shaders,
        }
    }
}
