use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::summary::ColumnStats;

pub const LATEST_FILE: &str = "latest.json";

/// The locally persisted snapshot of the last-viewed dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheDocument {
    pub name: String,
    pub uploaded_at: String,
    pub summary: IndexMap<String, ColumnStats>,
    pub rows: Vec<IndexMap<String, Value>>,
}

/// On-disk cache of the most recently fetched result. One `latest.json` at a
/// time; overwrites archive the previous document first.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn latest_path(&self) -> PathBuf {
        self.dir.join(LATEST_FILE)
    }

    /// Archive any existing latest document, then write the new one. All
    /// failures are logged and swallowed; callers never see cache errors.
    pub fn save(
        &self,
        name: &str,
        summary: IndexMap<String, ColumnStats>,
        rows: Vec<IndexMap<String, Value>>,
    ) {
        if let Err(err) = fs::create_dir_all(&self.dir) {
            warn!(
                "Failed to create cache directory {}: {}",
                self.dir.display(),
                err
            );
            return;
        }

        let latest = self.latest_path();
        if latest.exists() {
            let archive = self.archive_path(Utc::now());
            if let Err(err) = fs::rename(&latest, &archive) {
                warn!("Failed to archive previous cache: {}", err);
            }
        }

        let document = CacheDocument {
            name: name.to_string(),
            uploaded_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            summary,
            rows,
        };
        match serde_json::to_string_pretty(&document) {
            Ok(json) => {
                if let Err(err) = fs::write(&latest, json) {
                    warn!("Failed to write cache: {}", err);
                }
            }
            Err(err) => warn!("Failed to encode cache document: {}", err),
        }
    }

    /// The cached document, or `None` on a miss. Read and parse failures are
    /// logged cache-misses so startup is never blocked.
    pub fn load(&self) -> Option<CacheDocument> {
        let latest = self.latest_path();
        if !latest.exists() {
            return None;
        }
        let raw = match fs::read_to_string(&latest) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("Failed to load cached data: {}", err);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(document) => Some(document),
            Err(err) => {
                warn!("Failed to parse cached data: {}", err);
                None
            }
        }
    }

    /// Archive filename at second granularity; a counter suffix keeps
    /// same-second archives from overwriting each other.
    fn archive_path(&self, now: DateTime<Utc>) -> PathBuf {
        let stamp = now.format("%Y%m%dT%H%M%SZ");
        let base = self.dir.join(format!("archive_{}.json", stamp));
        if !base.exists() {
            return base;
        }
        for n in 1u32.. {
            let candidate = self.dir.join(format!("archive_{}-{}.json", stamp, n));
            if !candidate.exists() {
                return candidate;
            }
        }
        unreachable!()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::column_stats;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_summary() -> IndexMap<String, ColumnStats> {
        let mut summary = IndexMap::new();
        summary.insert("flow".to_string(), column_stats(&[1.0, 2.0, 3.0, 4.0]));
        summary
    }

    fn sample_rows() -> Vec<IndexMap<String, Value>> {
        let mut row = IndexMap::new();
        row.insert("flow".to_string(), json!(1.0));
        row.insert("unit".to_string(), json!("kg"));
        vec![row]
    }

    #[test]
    fn round_trip() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::new(dir.path());

        cache.save("pumps", sample_summary(), sample_rows());
        let document = cache.load().expect("cache document");

        assert_eq!(document.name, "pumps");
        assert!(document.uploaded_at.ends_with('Z'));
        assert_eq!(document.summary["flow"].count, 4);
        assert_eq!(document.rows, sample_rows());
    }

    #[test]
    fn overwrite_archives_previous_latest() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::new(dir.path());

        cache.save("first", sample_summary(), sample_rows());
        cache.save("second", sample_summary(), sample_rows());

        let document = cache.load().expect("cache document");
        assert_eq!(document.name, "second");

        let archives: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .filter(|name| name.starts_with("archive_"))
            .collect();
        assert_eq!(archives.len(), 1);

        let archived: CacheDocument =
            serde_json::from_str(&fs::read_to_string(dir.path().join(&archives[0])).unwrap())
                .unwrap();
        assert_eq!(archived.name, "first");
    }

    #[test]
    fn same_second_archives_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::new(dir.path());

        cache.save("a", sample_summary(), sample_rows());
        cache.save("b", sample_summary(), sample_rows());
        cache.save("c", sample_summary(), sample_rows());

        let archives = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with("archive_")
            })
            .count();
        assert_eq!(archives, 2);
        assert_eq!(cache.load().unwrap().name, "c");
    }

    #[test]
    fn missing_cache_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::new(dir.path());
        assert!(cache.load().is_none());
    }

    #[test]
    fn corrupt_cache_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::new(dir.path());
        fs::write(cache.latest_path(), "not json {").unwrap();
        assert!(cache.load().is_none());
    }
}
