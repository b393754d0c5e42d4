//! Cache index: a persistent registry of which identifiers are cached and when.
//!
//! This module provides:
//!
//! - [`CacheIndex`], the registry with membership queries and appends
//! - [`IndexBackend`], the storage primitives each backend supplies
//! - In-memory, CSV and SQLite backends
//! - An injectable [`Clock`] for stamping entries
//!
//! Every registry call is a fresh `load`, an optional mutation, and an
//! optional `save`. Nothing is cached between calls and nothing locks the
//! sequence; two writers racing on the same storage lose updates.

pub mod backend;
pub mod clock;
pub mod entry;
pub mod hash;
pub mod migrations;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub use backend::{Backend, BackendKind, CsvIndex, IndexBackend, MemoryIndex, SqliteIndex};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, TIME_FORMAT};

/// Registry over a pluggable backend.
///
/// `B` supplies storage and `C` supplies registration times. Backend errors
/// are returned as-is.
#[derive(Debug)]
pub struct CacheIndex<B, C = SystemClock> {
    index_dir: Option<PathBuf>,
    backend: B,
    clock: C,
}

impl<B: IndexBackend> CacheIndex<B, SystemClock> {
    /// Open a registry stamped by the system clock.
    pub async fn open(backend: B, index_dir: Option<PathBuf>) -> Result<Self, B::Error> {
        Self::new(backend, SystemClock, index_dir).await
    }
}

impl<B: IndexBackend, C: Clock> CacheIndex<B, C> {
    /// Build a registry and initialize storage at `index_dir`.
    pub async fn new(backend: B, clock: C, index_dir: Option<PathBuf>) -> Result<Self, B::Error> {
        let mut index = Self { index_dir: None, backend, clock };
        index.set_index_dir(index_dir).await?;
        Ok(index)
    }

    /// Currently configured storage location.
    pub fn index_dir(&self) -> Option<&Path> {
        self.index_dir.as_deref()
    }

    /// Point the registry at `index_dir` and prepare storage there.
    ///
    /// Safe to call again to reconfigure; existing entries are kept. On
    /// failure the previous location stays in effect.
    pub async fn set_index_dir(&mut self, index_dir: Option<PathBuf>) -> Result<(), B::Error> {
        self.backend.initialize_index(index_dir.as_deref()).await?;
        self.index_dir = index_dir;
        tracing::debug!(index_dir = ?self.index_dir, "index initialized");
        Ok(())
    }

    /// Is `identifier` present in the index?
    pub async fn has(&self, identifier: &str) -> Result<bool, B::Error> {
        let index = self.backend.load().await?;
        Ok(index.iter().any(|entry| entry.identifier == identifier))
    }

    /// Every distinct identifier in the index.
    pub async fn known(&self) -> Result<BTreeSet<String>, B::Error> {
        let index = self.backend.load().await?;
        Ok(index.into_iter().map(|entry| entry.identifier).collect())
    }

    /// Append a record for `identifier` stamped with the current time.
    ///
    /// Repeated identifiers are appended again, not merged.
    pub async fn add(&mut self, identifier: impl Into<String>) -> Result<CacheEntry, B::Error> {
        let mut index = self.backend.load().await?;
        let entry = CacheEntry::new(identifier, self.clock.now());
        index.push(entry.clone());
        self.backend.save(&index).await?;
        tracing::debug!(identifier = %entry.identifier, total = index.len(), "index entry added");
        Ok(entry)
    }

    /// The full entry sequence in insertion order.
    pub async fn entries(&self) -> Result<Vec<CacheEntry>, B::Error> {
        self.backend.load().await
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap().and_hms_opt(10, 0, 0).unwrap()
    }

    async fn memory_index() -> CacheIndex<MemoryIndex, ManualClock> {
        CacheIndex::new(MemoryIndex::new(), ManualClock::at(start()), None).await.unwrap()
    }

    #[tokio::test]
    async fn test_fresh_index_is_empty() {
        let index = memory_index().await;
        assert!(index.known().await.unwrap().is_empty());
        assert!(index.entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_has_flips_after_add() {
        let mut index = memory_index().await;
        assert!(!index.has("abc").await.unwrap());
        index.add("abc").await.unwrap();
        assert!(index.has("abc").await.unwrap());
        assert!(!index.has("abd").await.unwrap());
    }

    #[tokio::test]
    async fn test_add_stamps_with_clock() {
        let mut index = memory_index().await;
        let first = index.add("a").await.unwrap();
        index.clock().advance(TimeDelta::seconds(90));
        let second = index.add("b").await.unwrap();

        assert_eq!(first.timestamp, start());
        assert_eq!(second.formatted_timestamp(), "2024-02-29:10:01:30");
    }

    #[tokio::test]
    async fn test_duplicates_are_appended() {
        let mut index = memory_index().await;
        index.add("a").await.unwrap();
        index.add("a").await.unwrap();

        let entries = index.entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.identifier == "a"));
        assert_eq!(index.known().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_scenario_file1_file2() {
        let mut index = memory_index().await;
        assert!(index.known().await.unwrap().is_empty());

        index.add("file1").await.unwrap();
        assert!(index.has("file1").await.unwrap());
        assert!(!index.has("file2").await.unwrap());

        index.clock().advance(TimeDelta::seconds(1));
        index.add("file2").await.unwrap();
        index.add("file1").await.unwrap();

        let known: Vec<String> = index.known().await.unwrap().into_iter().collect();
        assert_eq!(known, vec!["file1".to_string(), "file2".to_string()]);

        let entries = index.entries().await.unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.identifier.as_str()).collect();
        assert_eq!(ids, vec!["file1", "file2", "file1"]);
        assert!(entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test]
    async fn test_index_dir_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = CacheIndex::open(CsvIndex::new(), None).await.unwrap();
        assert!(index.index_dir().is_none());

        index.set_index_dir(Some(dir.path().to_path_buf())).await.unwrap();
        assert_eq!(index.index_dir(), Some(dir.path()));
        assert!(index.entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_backed_without_dir_propagates_error() {
        let mut index = CacheIndex::open(CsvIndex::new(), None).await.unwrap();
        assert!(matches!(index.has("x").await, Err(Error::IndexDirUnset)));
        assert!(matches!(index.add("x").await, Err(Error::IndexDirUnset)));
    }

    #[tokio::test]
    async fn test_reconfigure_keeps_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_path_buf();
        let mut index = CacheIndex::new(CsvIndex::new(), ManualClock::at(start()), Some(path.clone()))
            .await
            .unwrap();
        index.add("file1").await.unwrap();

        index.set_index_dir(Some(path)).await.unwrap();

        assert!(index.has("file1").await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_reconfigure_keeps_previous_dir() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("idx");
        let not_a_dir = dir.path().join("not_a_dir");
        std::fs::write(&not_a_dir, b"plain file").unwrap();

        let mut index = CacheIndex::new(CsvIndex::new(), ManualClock::at(start()), Some(original.clone()))
            .await
            .unwrap();

        let result = index.set_index_dir(Some(not_a_dir.clone())).await;
        assert!(matches!(result, Err(Error::Unavailable { .. })));
        assert_eq!(index.index_dir(), Some(original.as_path()));

        index.add("after").await.unwrap();
        let raw = std::fs::read_to_string(original.join("index.csv")).unwrap();
        assert!(raw.contains("after,2024-02-29:10:00:00"));
        assert_eq!(std::fs::read(&not_a_dir).unwrap(), b"plain file");
    }

    #[tokio::test]
    async fn test_entries_survive_new_registry() {
        let dir = tempfile::tempdir().unwrap();
        for kind in [BackendKind::Csv, BackendKind::Sqlite] {
            let path = dir.path().join(kind.to_string());
            let mut index = CacheIndex::new(Backend::new(kind), ManualClock::at(start()), Some(path.clone()))
                .await
                .unwrap();
            index.add("file1").await.unwrap();
            index.add("file2").await.unwrap();
            drop(index);

            let reopened = CacheIndex::open(Backend::new(kind), Some(path)).await.unwrap();
            let entries = reopened.entries().await.unwrap();
            assert_eq!(
                entries,
                vec![CacheEntry::new("file1", start()), CacheEntry::new("file2", start())],
                "backend {kind}"
            );
        }
    }
}
