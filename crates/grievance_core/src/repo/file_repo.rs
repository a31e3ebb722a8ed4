//! File repository contract and SQLite implementation.
//!
//! # Invariants
//! - `filename` is unique; a second insert fails with `DuplicateFilename`.
//! - Deleting a File removes its keyword and person associations in the same
//!   transaction.

use crate::model::file::{FileId, GrievanceFile, NewFile, PayPeriod};
use crate::repo::{
    file_id_by_name, is_unique_violation, Entity, RepoError, RepoResult, SqliteRepository,
};
use rusqlite::{params, OptionalExtension, Row, TransactionBehavior};

/// Repository interface for `tbl_file` rows.
pub trait FileRepository {
    /// Inserts one File row and returns its new id.
    fn add_file(&mut self, file: &NewFile) -> RepoResult<FileId>;
    /// Deletes the File row and all of its associations.
    fn delete_file(&mut self, filename: &str) -> RepoResult<()>;
    /// Replaces the free-text location of one File.
    fn update_location(&mut self, filename: &str, location: &str) -> RepoResult<()>;
    /// Returns the highest File id, or 0 for an empty table.
    fn latest_file_id(&self) -> RepoResult<FileId>;
    /// Gets one File by stored filename.
    fn get_file(&self, filename: &str) -> RepoResult<Option<GrievanceFile>>;
    /// Returns whether any File exists at all.
    fn has_files(&self) -> RepoResult<bool>;
}

impl FileRepository for SqliteRepository {
    fn add_file(&mut self, file: &NewFile) -> RepoResult<FileId> {
        let inserted = self.connection().execute(
            "INSERT INTO tbl_file (filename, location, year, payperiod)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                file.filename.as_str(),
                file.location.as_str(),
                file.year,
                file.pay_period.get(),
            ],
        );

        match inserted {
            Ok(_) => Ok(self.connection().last_insert_rowid()),
            Err(err) if is_unique_violation(&err) => {
                Err(RepoError::DuplicateFilename(file.filename.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn delete_file(&mut self, filename: &str) -> RepoResult<()> {
        let tx = self
            .connection_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let Some(file_id) = file_id_by_name(&tx, filename)? else {
            return Err(RepoError::not_found(Entity::File, filename));
        };

        tx.execute(
            "DELETE FROM tbl_hlp_file_keyword WHERE file_id = ?1;",
            [file_id],
        )?;
        tx.execute(
            "DELETE FROM tbl_hlp_file_person WHERE file_id = ?1;",
            [file_id],
        )?;
        tx.execute("DELETE FROM tbl_file WHERE id = ?1;", [file_id])?;
        tx.commit()?;
        Ok(())
    }

    fn update_location(&mut self, filename: &str, location: &str) -> RepoResult<()> {
        let changed = self.connection().execute(
            "UPDATE tbl_file SET location = ?2 WHERE filename = ?1;",
            params![filename, location],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found(Entity::File, filename));
        }

        Ok(())
    }

    fn latest_file_id(&self) -> RepoResult<FileId> {
        let latest = self.connection().query_row(
            "SELECT COALESCE(MAX(id), 0) FROM tbl_file;",
            [],
            |row| row.get::<_, FileId>(0),
        )?;
        Ok(latest)
    }

    fn get_file(&self, filename: &str) -> RepoResult<Option<GrievanceFile>> {
        let row = self
            .connection()
            .query_row(
                "SELECT id, filename, location, year, payperiod
                 FROM tbl_file
                 WHERE filename = ?1;",
                [filename],
                FileRow::from_row,
            )
            .optional()?;

        row.map(FileRow::into_file).transpose()
    }

    fn has_files(&self) -> RepoResult<bool> {
        let exists: i64 = self.connection().query_row(
            "SELECT EXISTS(SELECT 1 FROM tbl_file);",
            [],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

struct FileRow {
    id: FileId,
    filename: String,
    location: String,
    year: i32,
    payperiod: i64,
}

impl FileRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            filename: row.get("filename")?,
            location: row.get("location")?,
            year: row.get("year")?,
            payperiod: row.get("payperiod")?,
        })
    }

    fn into_file(self) -> RepoResult<GrievanceFile> {
        let pay_period = u8::try_from(self.payperiod)
            .ok()
            .and_then(PayPeriod::new)
            .ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid pay period `{}` in tbl_file.payperiod for `{}`",
                    self.payperiod, self.filename
                ))
            })?;

        Ok(GrievanceFile {
            id: self.id,
            filename: self.filename,
            location: self.location,
            year: self.year,
            pay_period,
        })
    }
}
