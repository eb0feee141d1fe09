//! On-disk cache of downloaded files.
//!
//! Presence on disk is the only source of truth: a file at the resolved path
//! is taken as a complete earlier download. Nothing checks its content, so a
//! file truncated by an interrupted run elsewhere is treated as cached too.

use crate::cache::cache_key::{belongs_to, CacheKey};
use crate::cache::error::CacheError;
use crate::request::download_unit::DownloadUnit;
use crate::request::logical_request::Dataset;
use crate::utils::ensure_cache_dir_exists;
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct DownloadCache {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl DownloadCache {
    /// Opens a cache rooted at `root`, creating the directory if needed.
    pub async fn with_root(root: PathBuf) -> Result<Self, CacheError> {
        ensure_cache_dir_exists(&root)
            .await
            .map_err(|e| CacheError::CacheDirCreation(root.clone(), e))?;
        Ok(Self {
            root,
            files: Vec::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path the unit is stored at. Identical units always map to the same path.
    pub fn resolve_path(&self, unit: &DownloadUnit<'_>) -> PathBuf {
        self.root.join(CacheKey::for_unit(unit).file_name())
    }

    /// Whether something already exists at `path`.
    pub async fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).await.is_ok()
    }

    /// Adds a path to the inventory of files downloaded in this session.
    pub fn record(&mut self, path: PathBuf) {
        self.files.push(path);
    }

    /// Files downloaded in this session, in download order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Every cached file of `dataset`, whatever its temporal selector, sorted by name.
    pub async fn find_files(&self, dataset: &Dataset) -> Result<Vec<PathBuf>, CacheError> {
        let read_error = |e: std::io::Error| CacheError::CacheDirRead(self.root.clone(), e);
        let mut entries = fs::read_dir(&self.root).await.map_err(read_error)?;
        let mut found = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
            let name = entry.file_name();
            if name.to_str().is_some_and(|name| belongs_to(name, dataset)) {
                found.push(entry.path());
            }
        }
        found.sort();
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::download_unit::TemporalSelector;
    use crate::types::calendar::YearMonth;
    use crate::types::data_source::{Product, Resolution};

    fn month(dataset: &Dataset, m: u32) -> DownloadUnit<'_> {
        DownloadUnit::new(dataset, TemporalSelector::Month(YearMonth::new(2020, m)))
    }

    #[tokio::test]
    async fn creates_its_root() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("cache");
        let cache = DownloadCache::with_root(root.clone()).await.unwrap();
        assert!(root.is_dir());
        assert_eq!(cache.root(), root.as_path());
    }

    #[tokio::test]
    async fn file_in_place_of_root_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = DownloadCache::with_root(file.path().to_path_buf()).await;
        assert!(matches!(result, Err(CacheError::CacheDirCreation(..))));
    }

    #[tokio::test]
    async fn existence_follows_the_filesystem() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = DownloadCache::with_root(tmp.path().to_path_buf()).await.unwrap();
        let dataset = Dataset::new(Product::Land, Resolution::Monthly, ["t2m"]);
        let path = cache.resolve_path(&month(&dataset, 1));

        assert!(path.starts_with(tmp.path()));
        assert_eq!(path, cache.resolve_path(&month(&dataset, 1)));
        assert!(!cache.exists(&path).await);
        std::fs::write(&path, b"").unwrap();
        // Empty files count as cached.
        assert!(cache.exists(&path).await);
    }

    #[tokio::test]
    async fn record_keeps_session_order() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cache = DownloadCache::with_root(tmp.path().to_path_buf()).await.unwrap();
        cache.record(tmp.path().join("b.nc"));
        cache.record(tmp.path().join("a.nc"));
        assert_eq!(
            cache.files(),
            &[tmp.path().join("b.nc"), tmp.path().join("a.nc")]
        );
    }

    #[tokio::test]
    async fn find_files_filters_by_dataset() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = DownloadCache::with_root(tmp.path().to_path_buf()).await.unwrap();
        let t2m = Dataset::new(Product::Land, Resolution::Monthly, ["t2m"]);
        let tp = Dataset::new(Product::Land, Resolution::Monthly, ["tp"]);

        for path in [
            cache.resolve_path(&month(&t2m, 2)),
            cache.resolve_path(&month(&t2m, 1)),
            cache.resolve_path(&month(&tp, 1)),
            tmp.path().join("notes.txt"),
        ] {
            std::fs::write(path, b"x").unwrap();
        }

        let found = cache.find_files(&t2m).await.unwrap();
        assert_eq!(
            found,
            vec![
                cache.resolve_path(&month(&t2m, 1)),
                cache.resolve_path(&month(&t2m, 2)),
            ]
        );
    }

    #[tokio::test]
    async fn find_files_skips_datasets_whose_variables_share_a_suffix() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = DownloadCache::with_root(tmp.path().to_path_buf()).await.unwrap();
        let runoff = Dataset::new(Product::Land, Resolution::Monthly, ["runoff"]);
        let surface_runoff = Dataset::new(Product::Land, Resolution::Monthly, ["surface_runoff"]);

        std::fs::write(cache.resolve_path(&month(&surface_runoff, 1)), b"x").unwrap();
        std::fs::write(cache.resolve_path(&month(&runoff, 1)), b"x").unwrap();

        assert_eq!(
            cache.find_files(&runoff).await.unwrap(),
            vec![cache.resolve_path(&month(&runoff, 1))]
        );
        assert_eq!(
            cache.find_files(&surface_runoff).await.unwrap(),
            vec![cache.resolve_path(&month(&surface_runoff, 1))]
        );
    }
}
