use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

/// Flat on-disk store for uploaded CSV content. Records reference files by
/// the relative name returned from `save`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("creating storage directory {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write the bytes under a uuid-prefixed name so repeated uploads of the
    /// same file never collide. Returns the stored name.
    pub fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        let stored = format!("{}_{}", Uuid::new_v4(), sanitize_filename(original_name));
        let path = self.root.join(&stored);
        fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
        Ok(stored)
    }

    pub fn path(&self, stored: &str) -> PathBuf {
        self.root.join(stored)
    }

    /// Best-effort removal. A missing or undeletable file is logged and
    /// otherwise ignored so stale records can always be cleaned up.
    pub fn remove(&self, stored: &str) {
        let path = self.root.join(stored);
        if let Err(err) = fs::remove_file(&path) {
            warn!("Failed to remove stored file {}: {}", path.display(), err);
        }
    }
}

fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "dataset.csv".to_string()
    } else {
        cleaned
    }
}
