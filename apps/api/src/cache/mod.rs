//! File-backed result cache keyed by a digest of the user profile.
//!
//! The whole file is read once at open time into an in-memory mirror and
//! rewritten in full on every `put`. There is no expiry, no size bound and no
//! cross-process locking: two processes sharing a cache file can clobber each
//! other's writes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::{JobPosting, UserProfile};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read cache file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cache file {path} is not valid JSON: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write cache file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Hex SHA-256 of the profile fields joined in a fixed order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_profile(profile: &UserProfile) -> Self {
        let combined = format!(
            "{}_{}_{}_{}",
            profile.skills, profile.experience, profile.location, profile.job_type
        );
        CacheKey(hex::encode(Sha256::digest(combined.as_bytes())))
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

type Entries = BTreeMap<CacheKey, Vec<JobPosting>>;

pub struct CacheStore {
    path: PathBuf,
    entries: RwLock<Entries>,
}

impl CacheStore {
    /// Loads the cache file at `path`. A missing file yields an empty cache;
    /// an unreadable or malformed one is an error.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| CacheError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str::<Entries>(&raw).map_err(|source| {
                CacheError::Malformed {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Entries::new(),
            Err(source) => {
                return Err(CacheError::Read {
                    path: path.clone(),
                    source,
                })
            }
        };

        info!("Loaded {} cached searches from {}", entries.len(), path.display());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self, key: &CacheKey) -> Option<Vec<JobPosting>> {
        self.entries.read().await.get(key).cloned()
    }

    /// Stores `postings` under `key` and rewrites the whole cache file.
    /// The in-memory entry only survives if the file write succeeds.
    pub async fn put(&self, key: CacheKey, postings: Vec<JobPosting>) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        let previous = entries.insert(key.clone(), postings);

        let written = match serde_json::to_string_pretty(&*entries) {
            Ok(serialized) => tokio::fs::write(&self.path, serialized)
                .await
                .map_err(|source| CacheError::Write {
                    path: self.path.clone(),
                    source,
                }),
            Err(e) => Err(CacheError::Serialize(e)),
        };

        if let Err(e) = written {
            match previous {
                Some(old) => entries.insert(key, old),
                None => entries.remove(&key),
            };
            return Err(e);
        }

        debug!("Cache file {} rewritten ({} entries)", self.path.display(), entries.len());
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
