use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::Result;

use crate::data::loader::load_file;
use crate::data::model::JobDataset;

// ---------------------------------------------------------------------------
// Load-once dataset cache
// ---------------------------------------------------------------------------

struct CachedDataset {
    dataset: Arc<JobDataset>,
    /// Source modification time when it was read.
    modified: Option<SystemTime>,
}

/// Memoizes the dataset for one source path. The file is read on the
/// first [`DatasetCache::get_or_load`] and reused until invalidated.
pub struct DatasetCache {
    path: PathBuf,
    entry: Option<CachedDataset>,
    /// Source modification time seen by the last failed read.
    failed: Option<Option<SystemTime>>,
    loads: usize,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entry: None,
            failed: None,
            loads: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of times the source has actually been read.
    pub fn loads(&self) -> usize {
        self.loads
    }

    /// Point the cache at another source. Drops whatever was cached.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
        self.failed = None;
        self.invalidate();
    }

    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            log::debug!("Invalidated cached dataset for {}", self.path.display());
        }
    }

    /// Return the cached dataset, reading the source if nothing is cached.
    pub fn get_or_load(&mut self) -> Result<Arc<JobDataset>> {
        if let Some(entry) = &self.entry {
            return Ok(Arc::clone(&entry.dataset));
        }
        let modified = modified_time(&self.path);
        let dataset = match load_file(&self.path) {
            Ok(dataset) => Arc::new(dataset),
            Err(e) => {
                self.failed = Some(modified);
                return Err(e);
            }
        };
        self.failed = None;
        self.loads += 1;
        self.entry = Some(CachedDataset {
            dataset: Arc::clone(&dataset),
            modified,
        });
        Ok(dataset)
    }

    /// Whether the source changed (or vanished) since it was cached, or
    /// since the last read of it failed.
    pub fn is_stale(&self) -> bool {
        let seen = match (&self.entry, self.failed) {
            (Some(entry), _) => entry.modified,
            (None, Some(seen)) => seen,
            (None, None) => return false,
        };
        modified_time(&self.path) != seen
    }

    /// Reload when the source changed. Returns whether a reload happened.
    pub fn reload_if_stale(&mut self) -> Result<bool> {
        if !self.is_stale() {
            return Ok(false);
        }
        log::info!("{} changed on disk, reloading", self.path.display());
        self.invalidate();
        self.get_or_load()?;
        Ok(true)
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::is_not_found;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn loads_once_until_invalidated() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("jobs.csv");
        fs::write(&path, "Location\nCairo\n").expect("write");

        let mut cache = DatasetCache::new(&path);
        let first = cache.get_or_load().expect("load");
        let second = cache.get_or_load().expect("cached");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.loads(), 1);

        fs::write(&path, "Location\nCairo\nGiza\n").expect("rewrite");
        cache.invalidate();
        let third = cache.get_or_load().expect("reload");
        assert_eq!(third.len(), 2);
        assert_eq!(cache.loads(), 2);
    }

    #[test]
    fn vanished_source_is_stale() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("jobs.csv");
        fs::write(&path, "Location\nCairo\n").expect("write");

        let mut cache = DatasetCache::new(&path);
        assert!(!cache.is_stale());
        cache.get_or_load().expect("load");
        assert!(!cache.is_stale());

        fs::remove_file(&path).expect("remove");
        assert!(cache.is_stale());
        let err = cache.reload_if_stale().expect_err("source gone");
        assert!(is_not_found(&err));
    }

    #[test]
    fn recovers_after_failed_reload() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("jobs.csv");
        fs::write(&path, "Location\nCairo\n").expect("write");

        let mut cache = DatasetCache::new(&path);
        cache.get_or_load().expect("load");
        fs::remove_file(&path).expect("remove");
        assert!(cache.reload_if_stale().is_err());
        assert!(!cache.is_stale());

        fs::write(&path, "Location\nCairo\nGiza\n").expect("rewrite");
        assert!(cache.is_stale());
        assert!(cache.reload_if_stale().expect("reload"));
        assert_eq!(cache.get_or_load().expect("cached").len(), 2);
        assert!(!cache.is_stale());
    }

    #[test]
    fn failed_load_is_not_cached() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("jobs.csv");
        let mut cache = DatasetCache::new(&path);
        assert!(cache.get_or_load().is_err());
        assert_eq!(cache.loads(), 0);

        fs::write(&path, "Company\nAcme\n").expect("write");
        assert_eq!(cache.get_or_load().expect("load").len(), 1);
    }

    #[test]
    fn set_path_switches_source() {
        let tmp = tempdir().expect("tempdir");
        let a = tmp.path().join("a.csv");
        let b = tmp.path().join("b.csv");
        fs::write(&a, "Company\nA\n").expect("write a");
        fs::write(&b, "Company\nB1\nB2\n").expect("write b");

        let mut cache = DatasetCache::new(&a);
        assert_eq!(cache.get_or_load().expect("a").len(), 1);
        cache.set_path(&b);
        assert_eq!(cache.path(), b.as_path());
        assert_eq!(cache.get_or_load().expect("b").len(), 2);
    }
}
