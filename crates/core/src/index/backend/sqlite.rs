//! SQLite index with pragma configuration and migrations.
//!
//! Layout: `<index_dir>/index.sqlite`, table `cache_index`. Row order is
//! kept by an autoincrement `seq` column. A save rewrites the table inside
//! a single transaction.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio_rusqlite::{Connection, params};

use super::IndexBackend;
use crate::Error;
use crate::index::entry::{format_timestamp, parse_timestamp};
use crate::index::{CacheEntry, migrations};

/// File name of the database inside the configured directory.
pub const INDEX_FILE: &str = "index.sqlite";

/// Index handle backed by a tokio-rusqlite connection.
///
/// The connection runs statements on a background thread; it is opened
/// when a directory is configured and dropped when it is cleared.
#[derive(Debug, Clone, Default)]
pub struct SqliteIndex {
    conn: Option<Connection>,
    path: Option<PathBuf>,
}

impl SqliteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the database file, once a directory has been configured.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn require_conn(&self) -> Result<&Connection, Error> {
        self.conn.as_ref().ok_or(Error::IndexDirUnset)
    }
}

async fn open(path: &Path) -> Result<Connection, Error> {
    let conn = Connection::open(path).await.map_err(|e| {
        let err: tokio_rusqlite::Error = e.into();
        Error::from(err)
    })?;

    conn.call(|conn| -> Result<(), Error> {
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA temp_store=MEMORY;
             PRAGMA foreign_keys=ON;",
        )?;
        Ok(())
    })
    .await
    .map_err(Error::from)?;

    migrations::run(&conn).await?;

    Ok(conn)
}

#[async_trait]
impl IndexBackend for SqliteIndex {
    type Error = Error;

    async fn initialize_index(&mut self, index_dir: Option<&Path>) -> Result<(), Error> {
        let Some(dir) = index_dir else {
            self.conn = None;
            self.path = None;
            return Ok(());
        };

        fs::create_dir_all(dir)
            .await
            .map_err(|source| Error::Unavailable { path: dir.to_path_buf(), source })?;

        let path = dir.join(INDEX_FILE);
        let conn = open(&path).await?;
        tracing::debug!(path = %path.display(), "opened sqlite index");

        self.conn = Some(conn);
        self.path = Some(path);
        Ok(())
    }

    async fn load(&self) -> Result<Vec<CacheEntry>, Error> {
        let conn = self.require_conn()?;
        let entries = conn
            .call(|conn| -> Result<Vec<CacheEntry>, Error> {
                let mut stmt = conn.prepare("SELECT identifier, created_at FROM cache_index ORDER BY seq ASC")?;
                let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

                let mut entries = Vec::new();
                for row in rows {
                    let (identifier, created_at) = row?;
                    entries.push(CacheEntry::new(identifier, parse_timestamp(&created_at)?));
                }
                Ok(entries)
            })
            .await
            .map_err(Error::from)?;

        tracing::debug!(path = ?self.path(), count = entries.len(), "loaded sqlite index");
        Ok(entries)
    }

    async fn save(&mut self, entries: &[CacheEntry]) -> Result<(), Error> {
        let conn = self.require_conn()?;
        let rows: Vec<(String, String)> = entries
            .iter()
            .map(|entry| (entry.identifier.clone(), format_timestamp(&entry.timestamp)))
            .collect();
        let count = rows.len();

        conn.call(move |conn| -> Result<(), Error> {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM cache_index", [])?;
            {
                let mut stmt = tx.prepare("INSERT INTO cache_index (identifier, created_at) VALUES (?1, ?2)")?;
                for (identifier, created_at) in &rows {
                    stmt.execute(params![identifier, created_at])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(Error::from)?;

        tracing::debug!(path = ?self.path(), count, "saved sqlite index");
        Ok(())
    }
}
