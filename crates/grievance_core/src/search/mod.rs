//! Term search across Files and their associations.
//!
//! # Responsibility
//! - Match a raw term against filename, location, attached keyword and
//!   attached person of every File.
//!
//! # Invariants
//! - Matching is a case-sensitive substring test (`instr`), never `LIKE`.
//! - The term is always bound as a parameter.
//! - The empty term matches every File.

use crate::repo::{RepoResult, SqliteRepository};
use rusqlite::Connection;
use std::collections::BTreeSet;

/// Repository interface for term search.
pub trait SearchRepository {
    /// Returns stored filenames of every File matching `term`.
    fn search_by_term(&self, term: &str) -> RepoResult<BTreeSet<String>>;
}

impl SearchRepository for SqliteRepository {
    fn search_by_term(&self, term: &str) -> RepoResult<BTreeSet<String>> {
        search_by_term(self.connection(), term)
    }
}

/// Scans the File/keyword/person left-join view for `term`.
pub fn search_by_term(conn: &Connection, term: &str) -> RepoResult<BTreeSet<String>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT f.filename
         FROM tbl_file f
         LEFT JOIN tbl_hlp_file_keyword hk ON f.id = hk.file_id
         LEFT JOIN tbl_keyword k ON hk.keyword_id = k.id
         LEFT JOIN tbl_hlp_file_person hp ON f.id = hp.file_id
         LEFT JOIN tbl_person p ON hp.person_id = p.id
         WHERE instr(f.filename, ?1) > 0
            OR instr(f.location, ?1) > 0
            OR instr(k.keyword, ?1) > 0
            OR instr(p.name, ?1) > 0;",
    )?;

    let filenames = stmt
        .query_map([term], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<BTreeSet<_>>>()?;
    Ok(filenames)
}
