//! Repository layer contracts and the SQLite implementation.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts, one trait per concern.
//! - Keep every SQL statement, parameter-bound, behind these traits.
//!
//! # Invariants
//! - One [`SqliteRepository`] owns the archive connection; no ambient handle.
//! - Repository APIs return semantic errors (`NotFound`, duplicates) in
//!   addition to DB transport errors.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::file::FileId;
use rusqlite::{Connection, OptionalExtension};
use std::fmt::{Display, Formatter};
use std::path::Path;
use thiserror::Error;

pub mod association_repo;
pub mod file_repo;
pub mod keyword_repo;
pub mod stats_repo;

pub use association_repo::AssociationRepository;
pub use file_repo::FileRepository;
pub use keyword_repo::KeywordRepository;
pub use stats_repo::{CountsByLabel, StatsRepository};

use crate::search::SearchRepository;

pub type RepoResult<T> = Result<T, RepoError>;

/// What a `NotFound` lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    File,
    Keyword,
    /// A keyword association on one File.
    FileKeyword,
    /// A person association on one File.
    FilePerson,
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::File => "file",
            Self::Keyword => "keyword",
            Self::FileKeyword => "keyword on file",
            Self::FilePerson => "person on file",
        };
        f.write_str(label)
    }
}

/// Repository error for archive persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("file `{0}` is already in the archive")]
    DuplicateFilename(String),
    #[error("keyword `{0}` already exists")]
    DuplicateKeyword(String),
    #[error("keyword `{0}` is attached to at least one file")]
    KeywordInUse(String),
    #[error("{entity} not found: {key}")]
    NotFound { entity: Entity, key: String },
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("invalid persisted archive data: {0}")]
    InvalidData(String),
}

impl RepoError {
    pub(crate) fn not_found(entity: Entity, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Every repository concern the domain layer needs, as one bound.
pub trait GrievanceRepository:
    FileRepository + KeywordRepository + AssociationRepository + StatsRepository + SearchRepository
{
}

impl<T> GrievanceRepository for T where
    T: FileRepository
        + KeywordRepository
        + AssociationRepository
        + StatsRepository
        + SearchRepository
{
}

/// SQLite-backed archive repository owning its connection.
#[derive(Debug)]
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Wraps a connection returned by [`open_db`] or [`open_db_in_memory`].
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens the archive database file, applying migrations.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a throwaway in-memory archive.
    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

pub(crate) fn file_id_by_name(conn: &Connection, filename: &str) -> RepoResult<Option<FileId>> {
    let id = conn
        .query_row(
            "SELECT id FROM tbl_file WHERE filename = ?1;",
            [filename],
            |row| row.get::<_, FileId>(0),
        )
        .optional()?;
    Ok(id)
}

pub(crate) fn require_file_id(conn: &Connection, filename: &str) -> RepoResult<FileId> {
    file_id_by_name(conn, filename)?.ok_or_else(|| RepoError::not_found(Entity::File, filename))
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
