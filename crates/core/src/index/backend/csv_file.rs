//! CSV file index.
//!
//! Layout: `<index_dir>/index.csv` with an `identifier,timestamp` header and
//! one row per entry, oldest first. Saves go through a sibling temp file
//! and a rename so readers never see a half-written index.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::IndexBackend;
use crate::Error;
use crate::index::CacheEntry;

/// File name of the index inside the configured directory.
pub const INDEX_FILE: &str = "index.csv";

const HEADER: [&str; 2] = ["identifier", "timestamp"];

#[derive(Debug, Clone, Default)]
pub struct CsvIndex {
    path: Option<PathBuf>,
}

impl CsvIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the index file, once a directory has been configured.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn require_path(&self) -> Result<&Path, Error> {
        self.path.as_deref().ok_or(Error::IndexDirUnset)
    }
}

#[async_trait]
impl IndexBackend for CsvIndex {
    type Error = Error;

    async fn initialize_index(&mut self, index_dir: Option<&Path>) -> Result<(), Error> {
        let Some(dir) = index_dir else {
            self.path = None;
            return Ok(());
        };

        fs::create_dir_all(dir)
            .await
            .map_err(|source| Error::Unavailable { path: dir.to_path_buf(), source })?;

        let path = dir.join(INDEX_FILE);
        let exists = fs::try_exists(&path)
            .await
            .map_err(|source| Error::Unavailable { path: path.clone(), source })?;
        if !exists {
            write_atomic(&path, &encode(&path, &[])?).await?;
            tracing::debug!(path = %path.display(), "created empty csv index");
        }

        self.path = Some(path);
        Ok(())
    }

    async fn load(&self) -> Result<Vec<CacheEntry>, Error> {
        let path = self.require_path()?;
        let bytes = fs::read(path)
            .await
            .map_err(|source| Error::Unavailable { path: path.to_path_buf(), source })?;

        let entries = decode(&bytes)?;
        tracing::debug!(path = %path.display(), count = entries.len(), "loaded csv index");
        Ok(entries)
    }

    async fn save(&mut self, entries: &[CacheEntry]) -> Result<(), Error> {
        let path = self.require_path()?;
        write_atomic(path, &encode(path, entries)?).await?;
        tracing::debug!(path = %path.display(), count = entries.len(), "saved csv index");
        Ok(())
    }
}

fn encode(path: &Path, entries: &[CacheEntry]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(HEADER).map_err(|e| unwritable(path, e))?;
    for entry in entries {
        writer.serialize(entry).map_err(|e| unwritable(path, e))?;
    }
    writer.into_inner().map_err(|e| unwritable(path, e.into_error()))
}

/// A save that fails while encoding is still a failed write.
fn unwritable(path: &Path, err: impl Into<std::io::Error>) -> Error {
    Error::Unwritable { path: path.to_path_buf(), source: err.into() }
}

fn decode(bytes: &[u8]) -> Result<Vec<CacheEntry>, Error> {
    let mut reader = csv::Reader::from_reader(bytes);
    reader
        .deserialize::<CacheEntry>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let tmp = path.with_extension("csv.tmp");
    fs::write(&tmp, bytes)
        .await
        .map_err(|source| Error::Unwritable { path: tmp.clone(), source })?;
    fs::rename(&tmp, path)
        .await
        .map_err(|source| Error::Unwritable { path: path.to_path_buf(), source })
}
