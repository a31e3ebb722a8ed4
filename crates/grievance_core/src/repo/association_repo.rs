//! File-Keyword and File-Person association repository.
//!
//! # Responsibility
//! - Attach and detach keywords/persons on one File.
//! - List the names attached to one File.
//!
//! # Invariants
//! - Attaching never checks for an existing association; duplicate checks
//!   belong to the service layer.
//! - Person rows are created on first attach and reused by exact name.
//! - Detach removes exactly one matching association row.

use crate::repo::{require_file_id, Entity, RepoError, RepoResult, SqliteRepository};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

/// Repository interface for the two join tables.
pub trait AssociationRepository {
    /// Keyword texts attached to one File, in attach order.
    fn keywords_for_file(&self, filename: &str) -> RepoResult<Vec<String>>;
    /// Person names attached to one File, in attach order.
    fn persons_for_file(&self, filename: &str) -> RepoResult<Vec<String>>;
    /// Links an existing keyword to one File.
    fn attach_keyword(&mut self, filename: &str, keyword: &str) -> RepoResult<()>;
    /// Links a person to one File, creating the Person row if needed.
    fn attach_person(&mut self, filename: &str, person: &str) -> RepoResult<()>;
    /// Removes one keyword association from one File.
    fn detach_keyword(&mut self, filename: &str, keyword: &str) -> RepoResult<()>;
    /// Removes one person association from one File.
    fn detach_person(&mut self, filename: &str, person: &str) -> RepoResult<()>;
}

impl AssociationRepository for SqliteRepository {
    fn keywords_for_file(&self, filename: &str) -> RepoResult<Vec<String>> {
        let file_id = require_file_id(self.connection(), filename)?;
        load_names(
            self.connection(),
            "SELECT k.keyword
             FROM tbl_hlp_file_keyword h
             INNER JOIN tbl_keyword k ON k.id = h.keyword_id
             WHERE h.file_id = ?1
             ORDER BY h.rowid ASC;",
            file_id,
        )
    }

    fn persons_for_file(&self, filename: &str) -> RepoResult<Vec<String>> {
        let file_id = require_file_id(self.connection(), filename)?;
        load_names(
            self.connection(),
            "SELECT p.name
             FROM tbl_hlp_file_person h
             INNER JOIN tbl_person p ON p.id = h.person_id
             WHERE h.file_id = ?1
             ORDER BY h.rowid ASC;",
            file_id,
        )
    }

    fn attach_keyword(&mut self, filename: &str, keyword: &str) -> RepoResult<()> {
        let tx = self
            .connection_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let file_id = require_file_id(&tx, filename)?;
        let keyword_id: i64 = tx
            .query_row(
                "SELECT id FROM tbl_keyword WHERE keyword = ?1;",
                [keyword],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| RepoError::not_found(Entity::Keyword, keyword))?;

        tx.execute(
            "INSERT INTO tbl_hlp_file_keyword (file_id, keyword_id) VALUES (?1, ?2);",
            params![file_id, keyword_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn attach_person(&mut self, filename: &str, person: &str) -> RepoResult<()> {
        let tx = self
            .connection_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let file_id = require_file_id(&tx, filename)?;

        tx.execute(
            "INSERT OR IGNORE INTO tbl_person (name) VALUES (?1);",
            [person],
        )?;
        tx.execute(
            "INSERT INTO tbl_hlp_file_person (file_id, person_id)
             SELECT ?1, id
             FROM tbl_person
             WHERE name = ?2;",
            params![file_id, person],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn detach_keyword(&mut self, filename: &str, keyword: &str) -> RepoResult<()> {
        let file_id = require_file_id(self.connection(), filename)?;
        let changed = self.connection().execute(
            "DELETE FROM tbl_hlp_file_keyword
             WHERE rowid = (
                SELECT h.rowid
                FROM tbl_hlp_file_keyword h
                INNER JOIN tbl_keyword k ON k.id = h.keyword_id
                WHERE h.file_id = ?1 AND k.keyword = ?2
                ORDER BY h.rowid ASC
                LIMIT 1
             );",
            params![file_id, keyword],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found(
                Entity::FileKeyword,
                format!("{filename} / {keyword}"),
            ));
        }
        Ok(())
    }

    fn detach_person(&mut self, filename: &str, person: &str) -> RepoResult<()> {
        let file_id = require_file_id(self.connection(), filename)?;
        let changed = self.connection().execute(
            "DELETE FROM tbl_hlp_file_person
             WHERE rowid = (
                SELECT h.rowid
                FROM tbl_hlp_file_person h
                INNER JOIN tbl_person p ON p.id = h.person_id
                WHERE h.file_id = ?1 AND p.name = ?2
                ORDER BY h.rowid ASC
                LIMIT 1
             );",
            params![file_id, person],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found(
                Entity::FilePerson,
                format!("{filename} / {person}"),
            ));
        }
        Ok(())
    }
}

fn load_names(conn: &Connection, sql: &str, file_id: i64) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([file_id])?;
    let mut names = Vec::new();
    while let Some(row) = rows.next()? {
        names.push(row.get(0)?);
    }
    Ok(names)
}
