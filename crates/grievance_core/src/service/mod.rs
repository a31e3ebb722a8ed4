//! Domain use-case services.
//!
//! # Responsibility
//! - Sequence repository and document-store calls into user-facing actions.
//! - Enforce the guards that are not plain constraints: required upload
//!   fields, "already attached" checks, paired file/row cleanup.
//! - Translate lower-layer failures into [`ServiceError`] kinds.
//!
//! # Invariants
//! - Raw driver errors never leave this layer; they are logged and reported
//!   as `StorageIoFailure`.

mod archive;
mod charts;
mod tagging;
mod upload;

pub use archive::{ArchiveService, FileDetails, SearchOutcome, UploadReceipt};
pub use charts::{ChartData, ChartEntry, ChartMode, ChartStyle};
pub use tagging::AttachOutcome;
pub use upload::{UploadForm, ValidUpload};

use crate::db::DbError;
use crate::repo::{Entity, RepoError};
use crate::storage::StorageError;
use log::error;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// User-editable input fields named by validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Source,
    Location,
    Year,
    PayPeriod,
    Keyword,
    Person,
}

impl Display for FormField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Source => "file",
            Self::Location => "location",
            Self::Year => "year",
            Self::PayPeriod => "pay period",
            Self::Keyword => "keyword",
            Self::Person => "person",
        };
        f.write_str(label)
    }
}

/// Errors surfaced to the presentation layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("file `{0}` is already in the archive")]
    DuplicateFilename(String),
    #[error("keyword `{0}` already exists")]
    DuplicateKeyword(String),
    #[error("keyword `{0}` is attached to at least one file")]
    KeywordInUse(String),
    #[error("{entity} not found: {key}")]
    NotFound { entity: Entity, key: String },
    #[error("missing required fields: {}", list_fields(.0))]
    ValidationIncomplete(Vec<FormField>),
    #[error("invalid {field}: {reason}")]
    InvalidField { field: FormField, reason: String },
    #[error("storage failure: {0}")]
    StorageIoFailure(String),
}

impl ServiceError {
    pub(crate) fn invalid(field: FormField, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateFilename(name) => Self::DuplicateFilename(name),
            RepoError::DuplicateKeyword(keyword) => Self::DuplicateKeyword(keyword),
            RepoError::KeywordInUse(keyword) => Self::KeywordInUse(keyword),
            RepoError::NotFound { entity, key } => Self::NotFound { entity, key },
            other => {
                error!(
                    "event=repo_failure module=service status=error error={}",
                    other
                );
                Self::StorageIoFailure(other.to_string())
            }
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(value: DbError) -> Self {
        RepoError::from(value).into()
    }
}

impl From<StorageError> for ServiceError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::AlreadyStored(path) => Self::DuplicateFilename(
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
            ),
            other => {
                error!(
                    "event=storage_failure module=service status=error error={}",
                    other
                );
                Self::StorageIoFailure(other.to_string())
            }
        }
    }
}

fn list_fields(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Trims `value` and rejects it when blank.
pub(crate) fn required(field: FormField, value: &str) -> ServiceResult<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::ValidationIncomplete(vec![field]));
    }
    Ok(trimmed)
}
