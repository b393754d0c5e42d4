//! In-process index with no persistence.

use std::path::Path;

use async_trait::async_trait;

use super::IndexBackend;
use crate::Error;
use crate::index::CacheEntry;

/// Keeps the entry sequence in a `Vec`.
///
/// The index location is ignored, and re-initializing keeps whatever
/// has been saved so far.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    entries: Vec<CacheEntry>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing sequence.
    pub fn with_entries(entries: Vec<CacheEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl IndexBackend for MemoryIndex {
    type Error = Error;

    async fn initialize_index(&mut self, _index_dir: Option<&Path>) -> Result<(), Error> {
        Ok(())
    }

    async fn load(&self) -> Result<Vec<CacheEntry>, Error> {
        Ok(self.entries.clone())
    }

    async fn save(&mut self, entries: &[CacheEntry]) -> Result<(), Error> {
        self.entries = entries.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_save_replaces_contents() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(3, 4, 5).unwrap();
        let mut index = MemoryIndex::with_entries(vec![CacheEntry::new("old", at)]);

        index.save(&[CacheEntry::new("new", at)]).await.unwrap();

        let loaded = index.load().await.unwrap();
        assert_eq!(loaded, vec![CacheEntry::new("new", at)]);
    }

    #[tokio::test]
    async fn test_reinitialize_keeps_entries() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(3, 4, 5).unwrap();
        let mut index = MemoryIndex::new();
        index.save(&[CacheEntry::new("a", at)]).await.unwrap();

        index.initialize_index(Some(Path::new("/elsewhere"))).await.unwrap();

        assert_eq!(index.load().await.unwrap().len(), 1);
    }
}
