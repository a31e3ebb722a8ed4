//! Keyword repository contract and SQLite implementation.
//!
//! # Invariants
//! - Keyword text is unique (exact, case-sensitive match).
//! - A keyword referenced by any association cannot be deleted.

use crate::model::tag::Keyword;
use crate::repo::{is_unique_violation, Entity, RepoError, RepoResult, SqliteRepository};
use rusqlite::{OptionalExtension, TransactionBehavior};

/// Repository interface for `tbl_keyword` rows.
pub trait KeywordRepository {
    /// Lists all keywords in creation order.
    fn list_keywords(&self) -> RepoResult<Vec<Keyword>>;
    /// Creates one keyword and returns its id.
    fn add_keyword(&mut self, keyword: &str) -> RepoResult<i64>;
    /// Deletes one keyword that no File references.
    fn delete_keyword(&mut self, keyword: &str) -> RepoResult<()>;
}

impl KeywordRepository for SqliteRepository {
    fn list_keywords(&self) -> RepoResult<Vec<Keyword>> {
        let mut stmt = self
            .connection()
            .prepare("SELECT id, keyword FROM tbl_keyword ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut keywords = Vec::new();
        while let Some(row) = rows.next()? {
            keywords.push(Keyword {
                id: row.get("id")?,
                keyword: row.get("keyword")?,
            });
        }
        Ok(keywords)
    }

    fn add_keyword(&mut self, keyword: &str) -> RepoResult<i64> {
        match self
            .connection()
            .execute("INSERT INTO tbl_keyword (keyword) VALUES (?1);", [keyword])
        {
            Ok(_) => Ok(self.connection().last_insert_rowid()),
            Err(err) if is_unique_violation(&err) => {
                Err(RepoError::DuplicateKeyword(keyword.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn delete_keyword(&mut self, keyword: &str) -> RepoResult<()> {
        let tx = self
            .connection_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let keyword_id: Option<i64> = tx
            .query_row(
                "SELECT id FROM tbl_keyword WHERE keyword = ?1;",
                [keyword],
                |row| row.get(0),
            )
            .optional()?;
        let Some(keyword_id) = keyword_id else {
            return Err(RepoError::not_found(Entity::Keyword, keyword));
        };

        let in_use: i64 = tx.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM tbl_hlp_file_keyword WHERE keyword_id = ?1
            );",
            [keyword_id],
            |row| row.get(0),
        )?;
        if in_use == 1 {
            return Err(RepoError::KeywordInUse(keyword.to_string()));
        }

        tx.execute("DELETE FROM tbl_keyword WHERE id = ?1;", [keyword_id])?;
        tx.commit()?;
        Ok(())
    }
}
