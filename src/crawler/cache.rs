//! On-disk response cache
//!
//! Bodies are stored under `<root>/<crawler name>/<sha256(url)>`, so a re-run does
//! not download pages it already has.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use url::Url;

/// Directory of cached page bodies for one crawler
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    /// Creates a cache rooted at `root/name`; nothing is touched on disk until a store
    pub fn new(root: impl AsRef<Path>, name: &str) -> Self {
        Self {
            dir: root.as_ref().join(name),
        }
    }

    /// The directory bodies are stored in
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_for(url: &Url) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_str().as_bytes());
        hex::encode(hasher.finalize())
    }

    fn path_for(&self, url: &Url) -> PathBuf {
        self.dir.join(Self::key_for(url))
    }

    /// Returns the cached body for `url`, if any
    pub async fn load(&self, url: &Url) -> Option<String> {
        tokio::fs::read_to_string(self.path_for(url)).await.ok()
    }

    /// Stores `body` as the cached response for `url`
    ///
    /// The body is written to a temporary file in the cache directory and renamed
    /// into place, so an interrupted store never leaves a truncated entry behind.
    pub async fn store(&self, url: &Url, body: &str) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let key = Self::key_for(url);
        let partial = self
            .dir
            .join(format!("{}.{:016x}.tmp", key, fastrand::u64(..)));

        if let Err(e) = tokio::fs::write(&partial, body).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }
        tokio::fs::rename(&partial, self.dir.join(key)).await
    }
}
