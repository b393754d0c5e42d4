//! Schema migrations for the SQLite index.
//!
//! `_migrations` records the highest applied version. Each pending batch
//! runs in its own transaction together with its version row, so a failed
//! batch leaves neither schema changes nor a version record behind.

use crate::Error;
use tokio_rusqlite::{Connection, params, rusqlite};

/// Ordered (version, SQL) pairs. Versions must strictly increase.
const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../../migrations/001_cache_index.sql"))];

/// Apply every migration newer than the recorded version.
///
/// # Errors
///
/// Returns `Error::MigrationFailed` naming the version whose batch failed.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| apply(conn, MIGRATIONS)).await.map_err(Error::from)
}

fn apply(conn: &mut rusqlite::Connection, migrations: &[(i64, &str)]) -> Result<(), Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        )",
        [],
    )?;

    let current: i64 = conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| row.get(0))?;

    for &(version, sql) in migrations.iter().filter(|(version, _)| *version > current) {
        let tx = conn.transaction()?;
        tx.execute_batch(sql)
            .map_err(|e| Error::MigrationFailed(format!("version {version}: {e}")))?;
        tx.execute(
            "INSERT INTO _migrations (version, applied_at) VALUES (?1, ?2)",
            params![version, chrono::Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;
        tracing::debug!(version, "applied index migration");
    }

    Ok(())
}
