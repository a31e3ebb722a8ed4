//! Core of the grievance tracker: archive schema, repository, document
//! storage and the domain operations behind every view.
//! This crate is the single source of truth for archive invariants.

pub mod command;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod storage;

pub use command::{Command, Notice, NoticeLevel, Response};
pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::file::{stored_filename, FileId, GrievanceFile, PayPeriod};
pub use model::tag::{Keyword, TagKind};
pub use repo::{Entity, GrievanceRepository, RepoError, RepoResult, SqliteRepository};
pub use service::{
    ArchiveService, AttachOutcome, ChartData, ChartEntry, ChartMode, ChartStyle, FileDetails,
    FormField, SearchOutcome, ServiceError, ServiceResult, UploadForm, UploadReceipt,
};
pub use storage::{DocumentStore, StorageError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
