//! Archive use-case service: upload, search, details and deletion of Files.
//!
//! # Invariants
//! - An uploaded document stays in storage only if its File row was written.
//! - A deleted File's document is restored if the row delete fails.

use crate::config::AppConfig;
use crate::model::file::{stored_filename, FileId, GrievanceFile, NewFile};
use crate::model::tag::Keyword;
use crate::repo::{Entity, GrievanceRepository, SqliteRepository};
use crate::service::{required, FormField, ServiceError, ServiceResult, UploadForm};
use crate::storage::DocumentStore;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub id: FileId,
    /// Generated stored filename.
    pub filename: String,
}

/// Search result, keeping "nothing stored yet" apart from "no match".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "filenames", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// The archive holds no Files at all.
    EmptyArchive,
    /// Files exist but none matched.
    NoMatches,
    Matches(BTreeSet<String>),
}

impl SearchOutcome {
    /// Matching filenames; empty for both non-match outcomes.
    pub fn filenames(&self) -> Vec<&str> {
        match self {
            Self::Matches(filenames) => filenames.iter().map(String::as_str).collect(),
            Self::EmptyArchive | Self::NoMatches => Vec::new(),
        }
    }
}

/// Everything the File Details view shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDetails {
    pub file: GrievanceFile,
    pub keywords: Vec<String>,
    pub persons: Vec<String>,
    /// Keywords offered for attaching.
    pub available_keywords: Vec<Keyword>,
}

/// Domain facade owning the repository and the managed document directory.
#[derive(Debug)]
pub struct ArchiveService<R: GrievanceRepository> {
    pub(crate) repo: R,
    pub(crate) store: DocumentStore,
}

impl ArchiveService<SqliteRepository> {
    /// Opens the configured archive database and document directory.
    pub fn open(config: &AppConfig) -> ServiceResult<Self> {
        let database_path = config.database_path();
        if let Some(parent) = database_path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                ServiceError::StorageIoFailure(format!(
                    "failed to create `{}`: {err}",
                    parent.display()
                ))
            })?;
        }

        let store = DocumentStore::open(config.documents_path())?;
        let repo = SqliteRepository::open(&database_path)?;
        info!(
            "event=archive_open module=service status=ok database={} documents={}",
            database_path.display(),
            store.root().display()
        );
        Ok(Self::new(repo, store))
    }
}

impl<R: GrievanceRepository> ArchiveService<R> {
    pub fn new(repo: R, store: DocumentStore) -> Self {
        Self { repo, store }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Validates the form, stores a copy under a new serial filename and
    /// records the File.
    ///
    /// # Errors
    /// - `ValidationIncomplete` / `InvalidField` before anything is written.
    /// - `DuplicateFilename` when the generated name is taken.
    /// - `StorageIoFailure` when the copy or the insert fails; the copy is
    ///   removed again in that case.
    pub fn upload(&mut self, form: &UploadForm) -> ServiceResult<UploadReceipt> {
        let upload = form.validate()?;
        let latest_id = self.repo.latest_file_id()?;
        let filename = stored_filename(upload.year, latest_id, &upload.original_name);

        let staged = self.store.import(&upload.source, &filename)?;
        let id = self.repo.add_file(&NewFile {
            filename: filename.clone(),
            location: upload.location,
            year: upload.year,
            pay_period: upload.pay_period,
        })?;
        staged.commit();

        info!(
            "event=file_upload module=service status=ok id={} filename={}",
            id, filename
        );
        Ok(UploadReceipt { id, filename })
    }

    /// Finds Files whose filename, location, keyword or person contains
    /// `term` (case-sensitive).
    pub fn search(&self, term: &str) -> ServiceResult<SearchOutcome> {
        if !self.repo.has_files()? {
            return Ok(SearchOutcome::EmptyArchive);
        }

        let filenames = self.repo.search_by_term(term)?;
        if filenames.is_empty() {
            return Ok(SearchOutcome::NoMatches);
        }
        Ok(SearchOutcome::Matches(filenames))
    }

    /// Removes the File row, its associations and its stored document.
    pub fn delete_file(&mut self, filename: &str) -> ServiceResult<()> {
        self.require_file(filename)?;

        let removal = self.store.stage_removal(filename)?;
        self.repo.delete_file(filename)?;
        if let Err(err) = removal.commit() {
            // The record is gone; only a parked copy is left behind.
            warn!(
                "event=file_delete module=service status=partial filename={} error={}",
                filename, err
            );
        }

        info!(
            "event=file_delete module=service status=ok filename={}",
            filename
        );
        Ok(())
    }

    /// Opens the stored document with the OS default application.
    pub fn open_file(&self, filename: &str) -> ServiceResult<()> {
        self.require_file(filename)?;
        self.store.launch(filename)?;
        Ok(())
    }

    /// Loads the File Details view model.
    pub fn file_details(&self, filename: &str) -> ServiceResult<FileDetails> {
        let file = self.require_file(filename)?;
        Ok(FileDetails {
            keywords: self.repo.keywords_for_file(filename)?,
            persons: self.repo.persons_for_file(filename)?,
            available_keywords: self.repo.list_keywords()?,
            file,
        })
    }

    /// Replaces the location of one File.
    pub fn update_location(&mut self, filename: &str, location: &str) -> ServiceResult<()> {
        let location = required(FormField::Location, location)?;
        self.repo.update_location(filename, location)?;
        info!(
            "event=location_update module=service status=ok filename={}",
            filename
        );
        Ok(())
    }

    /// Years offered by the chart year selector.
    pub fn years(&self) -> ServiceResult<BTreeSet<i32>> {
        Ok(self.repo.distinct_years()?)
    }

    fn require_file(&self, filename: &str) -> ServiceResult<GrievanceFile> {
        self.repo
            .get_file(filename)?
            .ok_or_else(|| ServiceError::NotFound {
                entity: Entity::File,
                key: filename.to_string(),
            })
    }
}
