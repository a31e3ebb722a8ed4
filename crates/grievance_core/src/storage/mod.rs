//! Managed document directory.
//!
//! # Responsibility
//! - Copy uploaded documents into the managed directory under their stored
//!   filename, and remove them again.
//! - Hand out scoped guards so a paired database write can be undone on the
//!   file-system side.
//! - Open stored documents with the OS default handler.
//!
//! # Invariants
//! - A stored document is never overwritten.
//! - Stored names are plain file names; separators and `..` are rejected.

mod staging;

pub use staging::{PendingRemoval, StagedDocument};

use log::{info, warn};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

/// File-system failures around stored documents.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid stored document name `{0}`")]
    InvalidName(String),
    #[error("upload source `{}` is not a readable file", .0.display())]
    SourceMissing(PathBuf),
    #[error("document `{}` already exists in storage", .0.display())]
    AlreadyStored(PathBuf),
    #[error("failed to {action} `{}`: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Directory holding every stored document.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    /// Opens the managed directory, creating it when missing.
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|err| StorageError::io("create", &root, err))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of one stored document.
    pub fn path_for(&self, stored_name: &str) -> StorageResult<PathBuf> {
        validate_stored_name(stored_name)?;
        Ok(self.root.join(stored_name))
    }

    pub fn contains(&self, stored_name: &str) -> StorageResult<bool> {
        Ok(self.path_for(stored_name)?.is_file())
    }

    /// Copies `source` into storage as `stored_name`.
    ///
    /// The copy is removed again when the returned guard is dropped without
    /// [`StagedDocument::commit`].
    pub fn import(&self, source: &Path, stored_name: &str) -> StorageResult<StagedDocument> {
        let target = self.path_for(stored_name)?;
        if !source.is_file() {
            return Err(StorageError::SourceMissing(source.to_path_buf()));
        }

        let mut reader =
            File::open(source).map_err(|err| StorageError::io("read", source, err))?;
        let mut writer = match OpenOptions::new().write(true).create_new(true).open(&target) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyStored(target));
            }
            Err(err) => return Err(StorageError::io("create", &target, err)),
        };

        let copied = io::copy(&mut reader, &mut writer)
            .and_then(|bytes| writer.sync_all().map(|()| bytes));
        drop(writer);

        // From here on the guard owns the target, complete or not.
        let staged = StagedDocument::new(target.clone());
        let bytes = copied.map_err(|err| StorageError::io("copy", &target, err))?;

        info!(
            "event=document_import module=storage status=staged stored_name={} bytes={}",
            stored_name, bytes
        );
        Ok(staged)
    }

    /// Moves `stored_name` aside until the paired row delete is known to
    /// have succeeded.
    ///
    /// A document that is already missing yields an empty guard.
    pub fn stage_removal(&self, stored_name: &str) -> StorageResult<PendingRemoval> {
        let original = self.path_for(stored_name)?;
        if !original.exists() {
            warn!(
                "event=document_remove module=storage status=missing stored_name={}",
                stored_name
            );
            return Ok(PendingRemoval::empty());
        }

        let parked = self
            .root
            .join(format!(".{}.pending-delete", uuid::Uuid::new_v4()));
        fs::rename(&original, &parked).map_err(|err| StorageError::io("move", &original, err))?;
        Ok(PendingRemoval::new(original, parked))
    }

    /// Opens one stored document with the OS default application.
    pub fn launch(&self, stored_name: &str) -> StorageResult<()> {
        let path = self.path_for(stored_name)?;
        if !path.is_file() {
            return Err(StorageError::io(
                "open",
                &path,
                io::Error::from(io::ErrorKind::NotFound),
            ));
        }

        open::that(&path).map_err(|err| StorageError::io("open", &path, err))?;
        info!(
            "event=document_open module=storage status=ok stored_name={}",
            stored_name
        );
        Ok(())
    }
}

fn validate_stored_name(stored_name: &str) -> StorageResult<()> {
    let invalid = stored_name.trim().is_empty()
        || stored_name.contains(['/', '\\'])
        || stored_name == "."
        || stored_name == ".."
        || stored_name.contains('\0');
    if invalid {
        return Err(StorageError::InvalidName(stored_name.to_string()));
    }
    Ok(())
}
