//! Storage backends for the cache index.
//!
//! A backend only knows how to prepare its storage, read the whole entry
//! sequence, and replace it. Membership queries and appends live on
//! [`CacheIndex`](super::CacheIndex) and are shared by every backend.

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::CacheEntry;
use crate::Error;

mod csv_file;
mod memory;
mod sqlite;

pub use csv_file::CsvIndex;
pub use memory::MemoryIndex;
pub use sqlite::SqliteIndex;

/// Storage primitives a concrete index must provide.
///
/// Errors are backend-defined and reach callers of the registry unchanged.
#[async_trait]
pub trait IndexBackend: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Ensure storage under `index_dir` exists and loads cleanly.
    ///
    /// Called every time the location is (re)configured, so it must not
    /// discard entries that are already stored.
    async fn initialize_index(&mut self, index_dir: Option<&Path>) -> Result<(), Self::Error>;

    /// Read the full entry sequence in insertion order.
    async fn load(&self) -> Result<Vec<CacheEntry>, Self::Error>;

    /// Replace the stored sequence with `entries`.
    async fn save(&mut self, entries: &[CacheEntry]) -> Result<(), Self::Error>;
}

/// Which bundled backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    #[default]
    Csv,
    Sqlite,
}

impl BackendKind {
    /// Whether this backend needs an index directory to hold its files.
    pub fn is_file_backed(self) -> bool {
        !matches!(self, BackendKind::Memory)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::Memory => "memory",
            BackendKind::Csv => "csv",
            BackendKind::Sqlite => "sqlite",
        };
        f.write_str(name)
    }
}

/// One of the bundled backends, chosen at runtime.
#[derive(Debug)]
pub enum Backend {
    Memory(MemoryIndex),
    Csv(CsvIndex),
    Sqlite(SqliteIndex),
}

impl Backend {
    pub fn new(kind: BackendKind) -> Self {
        match kind {
            BackendKind::Memory => Backend::Memory(MemoryIndex::new()),
            BackendKind::Csv => Backend::Csv(CsvIndex::new()),
            BackendKind::Sqlite => Backend::Sqlite(SqliteIndex::new()),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Memory(_) => BackendKind::Memory,
            Backend::Csv(_) => BackendKind::Csv,
            Backend::Sqlite(_) => BackendKind::Sqlite,
        }
    }
}

#[async_trait]
impl IndexBackend for Backend {
    type Error = Error;

    async fn initialize_index(&mut self, index_dir: Option<&Path>) -> Result<(), Error> {
        match self {
            Backend::Memory(b) => b.initialize_index(index_dir).await,
            Backend::Csv(b) => b.initialize_index(index_dir).await,
            Backend::Sqlite(b) => b.initialize_index(index_dir).await,
        }
    }

    async fn load(&self) -> Result<Vec<CacheEntry>, Error> {
        match self {
            Backend::Memory(b) => b.load().await,
            Backend::Csv(b) => b.load().await,
            Backend::Sqlite(b) => b.load().await,
        }
    }

    async fn save(&mut self, entries: &[CacheEntry]) -> Result<(), Error> {
        match self {
            Backend::Memory(b) => b.save(entries).await,
            Backend::Csv(b) => b.save(entries).await,
            Backend::Sqlite(b) => b.save(entries).await,
        }
    }
}
