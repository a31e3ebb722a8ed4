//! Presentation contract: named UI actions and their results.
//!
//! # Responsibility
//! - Map every action of the Upload, Search, Keywords, Graphics and File
//!   Details views to one [`Command`] with explicit arguments.
//! - Route each command to exactly one domain operation.
//!
//! # Invariants
//! - Dispatch is synchronous; the call returns once the operation finished.

mod notice;

pub use notice::{Notice, NoticeLevel};

use crate::model::tag::{Keyword, TagKind};
use crate::repo::GrievanceRepository;
use crate::service::{
    ArchiveService, AttachOutcome, ChartData, ChartMode, FileDetails, SearchOutcome,
    ServiceResult, UploadForm, UploadReceipt,
};
use log::debug;
use serde::Serialize;
use std::collections::BTreeSet;

/// One user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Upload(UploadForm),
    Search { term: String },
    OpenFile { filename: String },
    DeleteFile { filename: String },
    ShowDetails { filename: String },
    UpdateLocation { filename: String, location: String },
    ListKeywords,
    AddKeyword { keyword: String },
    DeleteKeyword { keyword: String },
    Attach { filename: String, kind: TagKind, name: String },
    Detach { filename: String, kind: TagKind, name: String },
    ListYears,
    Chart { year: i32, mode: ChartMode },
}

impl Command {
    /// Stable action name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Upload(_) => "upload",
            Self::Search { .. } => "search",
            Self::OpenFile { .. } => "open_file",
            Self::DeleteFile { .. } => "delete_file",
            Self::ShowDetails { .. } => "show_details",
            Self::UpdateLocation { .. } => "update_location",
            Self::ListKeywords => "list_keywords",
            Self::AddKeyword { .. } => "add_keyword",
            Self::DeleteKeyword { .. } => "delete_keyword",
            Self::Attach { .. } => "attach",
            Self::Detach { .. } => "detach",
            Self::ListYears => "list_years",
            Self::Chart { .. } => "chart",
        }
    }
}

/// Result of one dispatched command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "response", rename_all = "snake_case")]
pub enum Response {
    Uploaded(UploadReceipt),
    Search {
        term: String,
        outcome: SearchOutcome,
    },
    Opened {
        filename: String,
    },
    Deleted {
        filename: String,
    },
    Details(FileDetails),
    LocationUpdated {
        filename: String,
        location: String,
    },
    Keywords {
        keywords: Vec<Keyword>,
    },
    KeywordAdded(Keyword),
    KeywordDeleted {
        keyword: String,
    },
    Attached {
        filename: String,
        kind: TagKind,
        name: String,
        outcome: AttachOutcome,
    },
    Detached {
        filename: String,
        kind: TagKind,
        name: String,
    },
    Years {
        years: BTreeSet<i32>,
    },
    Chart(ChartData),
}

impl<R: GrievanceRepository> ArchiveService<R> {
    /// Runs one command to completion.
    pub fn dispatch(&mut self, command: Command) -> ServiceResult<Response> {
        debug!("event=dispatch module=command action={}", command.name());

        let response = match command {
            Command::Upload(form) => Response::Uploaded(self.upload(&form)?),
            Command::Search { term } => {
                let outcome = self.search(&term)?;
                Response::Search { term, outcome }
            }
            Command::OpenFile { filename } => {
                self.open_file(&filename)?;
                Response::Opened { filename }
            }
            Command::DeleteFile { filename } => {
                self.delete_file(&filename)?;
                Response::Deleted { filename }
            }
            Command::ShowDetails { filename } => Response::Details(self.file_details(&filename)?),
            Command::UpdateLocation { filename, location } => {
                self.update_location(&filename, &location)?;
                Response::LocationUpdated {
                    filename,
                    location: location.trim().to_string(),
                }
            }
            Command::ListKeywords => Response::Keywords {
                keywords: self.list_keywords()?,
            },
            Command::AddKeyword { keyword } => Response::KeywordAdded(self.add_keyword(&keyword)?),
            Command::DeleteKeyword { keyword } => {
                self.delete_keyword(&keyword)?;
                Response::KeywordDeleted {
                    keyword: keyword.trim().to_string(),
                }
            }
            Command::Attach {
                filename,
                kind,
                name,
            } => {
                let outcome = match kind {
                    TagKind::Keyword => self.attach_keyword(&filename, &name)?,
                    TagKind::Person => self.attach_person(&filename, &name)?,
                };
                Response::Attached {
                    filename,
                    kind,
                    name: name.trim().to_string(),
                    outcome,
                }
            }
            Command::Detach {
                filename,
                kind,
                name,
            } => {
                match kind {
                    TagKind::Keyword => self.detach_keyword(&filename, &name)?,
                    TagKind::Person => self.detach_person(&filename, &name)?,
                }
                Response::Detached {
                    filename,
                    kind,
                    name: name.trim().to_string(),
                }
            }
            Command::ListYears => Response::Years {
                years: self.years()?,
            },
            Command::Chart { year, mode } => Response::Chart(self.chart(year, mode)?),
        };

        Ok(response)
    }
}
