//! User-facing notifications for dispatched commands.

use crate::command::Response;
use crate::model::tag::TagKind;
use crate::repo::Entity;
use crate::service::{AttachOutcome, SearchOutcome, ServiceError};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// A titled message box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    fn info(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.to_string(),
            message: message.into(),
        }
    }

    fn warning(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.to_string(),
            message: message.into(),
        }
    }

    /// Notice shown after a successful command, if any.
    ///
    /// Plain list/lookup responses carry no notice.
    pub fn for_response(response: &Response) -> Option<Self> {
        let notice = match response {
            Response::Uploaded(receipt) => Self::info(
                "Success",
                format!(
                    "File '{}' has been stored to database successfully. Go to 'Search' to find and modify the record.",
                    receipt.filename
                ),
            ),
            Response::Search {
                outcome: SearchOutcome::EmptyArchive,
                ..
            } => Self::warning("No results found", "No data found."),
            Response::Search {
                term,
                outcome: SearchOutcome::NoMatches,
            } => Self::warning(
                "No results found",
                format!("No results found for searchterm '{term}'."),
            ),
            Response::Deleted { filename } => {
                Self::info("File deleted", format!("File '{filename}' has been deleted."))
            }
            Response::LocationUpdated { filename, location } => Self::info(
                "Location updated",
                format!("The location of '{filename}' has been updated to '{location}' successfully."),
            ),
            Response::Attached {
                kind,
                outcome: AttachOutcome::AlreadyPresent,
                ..
            } => match kind {
                TagKind::Keyword => Self::warning(
                    "Keyword already there",
                    "The keyword is already connected to the file",
                ),
                TagKind::Person => Self::warning(
                    "Person already there",
                    "The person is already connected to the file",
                ),
            },
            _ => return None,
        };
        Some(notice)
    }

    /// Notice shown when a command failed.
    pub fn for_error(err: &ServiceError) -> Self {
        match err {
            ServiceError::ValidationIncomplete(_) => Self::warning(
                "Please fill all data",
                "All information needs to be filled. Please enter missing values.",
            ),
            ServiceError::InvalidField { field, reason } => {
                Self::warning("Invalid input", format!("Invalid {field}: {reason}."))
            }
            ServiceError::DuplicateFilename(filename) => Self::warning(
                "Upload failed",
                format!("File '{filename}' could not be stored in database"),
            ),
            ServiceError::DuplicateKeyword(keyword) => Self::warning(
                "Keyword already exists",
                format!("Keyword '{keyword}' is in database already."),
            ),
            ServiceError::KeywordInUse(keyword) => Self::warning(
                "Keyword cannot be deleted",
                format!(
                    "Keyword '{keyword}' is in use and cannot be deleted. Please delete the keyword from all files, first."
                ),
            ),
            ServiceError::NotFound { entity, key } => {
                let title = match entity {
                    Entity::File => "File not found",
                    Entity::Keyword => "Keyword not found",
                    Entity::FileKeyword | Entity::FilePerson => "Not attached",
                };
                Self::warning(title, format!("No {entity} '{key}' in the database."))
            }
            ServiceError::StorageIoFailure(details) => Self::warning(
                "Storage failure",
                format!("The action could not be completed: {details}"),
            ),
        }
    }
}
