//! Scoped guards pairing a file-system change with a database write.

use super::{StorageError, StorageResult};
use log::{error, info, warn};
use std::fs;
use std::path::PathBuf;

/// A freshly imported document that is deleted on drop unless committed.
#[derive(Debug)]
#[must_use = "an uncommitted staged document is deleted on drop"]
pub struct StagedDocument {
    path: PathBuf,
    committed: bool,
}

impl StagedDocument {
    pub(super) fn new(path: PathBuf) -> Self {
        Self {
            path,
            committed: false,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Keeps the document in storage.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for StagedDocument {
    fn drop(&mut self) {
        if self.committed {
            return;
        }

        match fs::remove_file(&self.path) {
            Ok(()) => info!(
                "event=document_import module=storage status=rolled_back path={}",
                self.path.display()
            ),
            Err(err) => error!(
                "event=document_import module=storage status=error error_code=rollback_failed path={} error={}",
                self.path.display(),
                err
            ),
        }
    }
}

/// A document moved aside for deletion; restored on drop unless committed.
#[derive(Debug)]
#[must_use = "an uncommitted removal is restored on drop"]
pub struct PendingRemoval {
    paths: Option<(PathBuf, PathBuf)>,
}

impl PendingRemoval {
    pub(super) fn new(original: PathBuf, parked: PathBuf) -> Self {
        Self {
            paths: Some((original, parked)),
        }
    }

    pub(super) fn empty() -> Self {
        Self { paths: None }
    }

    /// Deletes the parked document for good.
    pub fn commit(mut self) -> StorageResult<()> {
        let Some((original, parked)) = self.paths.take() else {
            return Ok(());
        };

        if let Err(source) = fs::remove_file(&parked) {
            error!(
                "event=document_remove module=storage status=error error_code=parked_orphaned path={} parked={} error={}",
                original.display(),
                parked.display(),
                source
            );
            return Err(StorageError::Io {
                action: "delete",
                path: parked,
                source,
            });
        }
        info!(
            "event=document_remove module=storage status=ok path={}",
            original.display()
        );
        Ok(())
    }
}

impl Drop for PendingRemoval {
    fn drop(&mut self) {
        let Some((original, parked)) = self.paths.take() else {
            return;
        };

        match fs::rename(&parked, &original) {
            Ok(()) => warn!(
                "event=document_remove module=storage status=restored path={}",
                original.display()
            ),
            Err(err) => error!(
                "event=document_remove module=storage status=error error_code=restore_failed path={} parked={} error={}",
                original.display(),
                parked.display(),
                err
            ),
        }
    }
}
