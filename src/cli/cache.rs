use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use sha2::{Digest, Sha256};

use crate::TRACING_TARGET_CACHE;

/// Response cache: one file per URL, named by the SHA-256 of the URL.
///
/// With the cache disabled nothing is read, but fresh responses are still
/// stored so a later cached run can reuse them.
#[derive(Debug, Clone)]
pub struct Cache {
    dir: PathBuf,
    read_enabled: bool,
}

impl Cache {
    pub fn new(dir: impl Into<PathBuf>, read_enabled: bool) -> Self {
        Self {
            dir: dir.into(),
            read_enabled,
        }
    }

    /// Lowercase hex SHA-256 of `url`.
    pub fn key(url: &str) -> String {
        hex::encode(Sha256::digest(url.as_bytes()))
    }

    fn path(&self, url: &str) -> PathBuf {
        self.dir.join(Self::key(url))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the cached body of `url`, if caching is enabled and present.
    pub async fn load(&self, url: &str) -> Option<String> {
        if !self.read_enabled {
            return None;
        }

        let path = self.path(url);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                tracing::debug!(target: TRACING_TARGET_CACHE, url, path = %path.display(), "cache hit");
                Some(content)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                // unreadable entries are refetched and overwritten
                tracing::warn!(target: TRACING_TARGET_CACHE, url, error = %e, "ignoring cache entry");
                None
            }
        }
    }

    pub async fn store(&self, url: &str, content: &str) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("failed to create cache directory {}", self.dir.display()))?;

        let path = self.path(url);
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("failed to write cache entry {}", path.display()))?;

        tracing::debug!(target: TRACING_TARGET_CACHE, url, path = %path.display(), "cached");
        Ok(())
    }
}
