//! Persistent request cache
//!
//! Responses are memoized by fully-qualified URL. Entries never expire: once a
//! URL is cached it is never fetched again, within a run or across runs.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[cfg(test)]
use mockall::automock;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info};

use crate::metadata::error::CacheError;

/// Key-value store consulted before every network fetch
#[cfg_attr(test, automock)]
pub trait RequestCache: Send + Sync {
    /// Cached body for `url`, if any
    fn get(&self, url: &str) -> Result<Option<Value>, CacheError>;

    /// Store the body fetched from `url`
    fn set(&self, url: &str, body: Value) -> Result<(), CacheError>;

    /// Write every entry, including ones added during this run, to backing storage
    fn persist(&self) -> Result<(), CacheError>;
}

/// Request cache backed by a single JSON file (`.requestcache`)
pub struct FileCache {
    path: PathBuf,
    entries: Mutex<IndexMap<String, Value>>,
}

impl FileCache {
    /// Open the cache at `path`, loading existing entries if the file exists
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        let entries = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            if content.trim().is_empty() {
                IndexMap::new()
            } else {
                serde_json::from_str::<Option<IndexMap<String, Value>>>(&content)?
                    .unwrap_or_default()
            }
        } else {
            IndexMap::new()
        };

        info!("Loaded {} cached requests from {:?}", entries.len(), path);

        Ok(Self {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
        })
    }

    fn lock_entries(&self) -> Result<MutexGuard<'_, IndexMap<String, Value>>, CacheError> {
        self.entries.lock().map_err(|_| CacheError::LockPoisoned)
    }

    pub fn len(&self) -> usize {
        self.lock_entries().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RequestCache for FileCache {
    fn get(&self, url: &str) -> Result<Option<Value>, CacheError> {
        let entries = self.lock_entries()?;
        let hit = entries.get(url).cloned();
        if hit.is_some() {
            debug!("Cache hit: {}", url);
        }
        Ok(hit)
    }

    fn set(&self, url: &str, body: Value) -> Result<(), CacheError> {
        let mut entries = self.lock_entries()?;
        entries.insert(url.to_string(), body);
        Ok(())
    }

    fn persist(&self) -> Result<(), CacheError> {
        let content = {
            let entries = self.lock_entries()?;
            serde_json::to_string(&*entries)?
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, content)?;

        info!("Wrote request cache to {:?}", self.path);
        Ok(())
    }
}
