//! Schema migrations for the archive database.
//!
//! # Invariants
//! - Versions are strictly increasing; the applied version lives in
//!   `PRAGMA user_version`.
//! - All pending migrations run in one transaction.
//! - An unversioned database that already holds archive tables is refused;
//!   its tables lack the constraints the repository relies on.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;
use std::cmp::Ordering;

const ARCHIVE_TABLES: [&str; 5] = [
    "tbl_file",
    "tbl_keyword",
    "tbl_person",
    "tbl_hlp_file_keyword",
    "tbl_hlp_file_person",
];

/// `(version, sql)` pairs in apply order.
const MIGRATIONS: &[(u32, &str)] = &[(1, include_str!("0001_init.sql"))];

/// Returns the newest schema version this build can create.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |(version, _)| *version)
}

/// Brings the schema up to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
/// - `LegacySchema` when archive tables exist without a schema version.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let applied = schema_version(conn)?;
    let latest = latest_version();

    match applied.cmp(&latest) {
        Ordering::Greater => {
            return Err(DbError::UnsupportedSchemaVersion {
                db_version: applied,
                latest_supported: latest,
            })
        }
        Ordering::Equal => return Ok(()),
        Ordering::Less => {}
    }

    if applied == 0 {
        if let Some(table) = existing_archive_table(conn)? {
            return Err(DbError::LegacySchema { table });
        }
    }

    let tx = conn.transaction()?;
    for (version, sql) in MIGRATIONS.iter().filter(|(version, _)| *version > applied) {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        info!(
            "event=schema_migrate module=db status=ok version={}",
            version
        );
    }
    tx.commit()?;

    Ok(())
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

fn existing_archive_table(conn: &Connection) -> DbResult<Option<String>> {
    let mut stmt =
        conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;")?;
    for table in ARCHIVE_TABLES {
        if stmt.exists([table])? {
            return Ok(Some(table.to_string()));
        }
    }
    Ok(None)
}
