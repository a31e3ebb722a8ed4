//! Command-line interface definitions.
//!
//! Every subcommand maps to one action of the archive views: upload,
//! search, file details, keyword catalogue, tagging and charts.

use clap::{Parser, Subcommand, ValueEnum};
use grievance_core::{ChartMode, Command, TagKind, UploadForm};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "grievance-tracker", version, about = "Archive and tag grievance reports")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Use this config file instead of the default location
    #[arg(short = 'c', long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Suppress notices (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Store a copy of a document and record it
    #[command(visible_alias = "u")]
    Upload {
        /// Document to upload; the path must be valid UTF-8
        #[arg(value_name = "FILE")]
        source: String,

        /// Where the grievance was filed
        #[arg(short = 'l', long = "location")]
        location: Option<String>,

        /// Four digit year
        #[arg(short = 'y', long = "year")]
        year: Option<String>,

        /// Pay period, 1-26
        #[arg(short = 'p', long = "pay-period")]
        pay_period: Option<String>,
    },

    /// Find files by filename, location, keyword or person
    #[command(visible_alias = "s")]
    Search {
        /// Case-sensitive term; lists every file when omitted
        #[arg(value_name = "TERM", default_value = "")]
        term: String,
    },

    /// Open a stored document with the default application
    Open { filename: String },

    /// Delete a file record and its stored document
    Delete {
        filename: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Show location, year, keywords and persons of a file
    #[command(visible_alias = "d")]
    Details { filename: String },

    /// Change the location of a file
    Relocate { filename: String, location: String },

    /// Manage the keyword catalogue
    #[command(visible_alias = "k")]
    Keyword {
        #[command(subcommand)]
        command: KeywordCommands,
    },

    /// Attach a keyword or person to a file
    Attach {
        kind: TagArg,
        filename: String,
        name: String,
    },

    /// Detach a keyword or person from a file
    Detach {
        kind: TagArg,
        filename: String,
        name: String,
    },

    /// List the years that have files
    Years,

    /// Show the counts behind one chart
    Chart {
        year: i32,

        #[arg(short = 'm', long = "mode", value_enum, default_value_t = ChartArg::KeywordCount)]
        mode: ChartArg,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum KeywordCommands {
    /// List all keywords
    #[command(visible_alias = "ls")]
    List,
    /// Add a keyword
    Add { keyword: String },
    /// Delete a keyword no file uses
    #[command(visible_alias = "rm")]
    Delete { keyword: String },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagArg {
    Keyword,
    Person,
}

impl From<TagArg> for TagKind {
    fn from(value: TagArg) -> Self {
        match value {
            TagArg::Keyword => Self::Keyword,
            TagArg::Person => Self::Person,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartArg {
    /// Bars of keyword counts
    KeywordCount,
    /// Bars of per-person counts
    PersonCount,
    /// Keyword shares of the year's total
    KeywordDensity,
}

impl From<ChartArg> for ChartMode {
    fn from(value: ChartArg) -> Self {
        match value {
            ChartArg::KeywordCount => Self::KeywordCount,
            ChartArg::PersonCount => Self::PersonCount,
            ChartArg::KeywordDensity => Self::KeywordDensity,
        }
    }
}

impl Commands {
    /// Converts the parsed arguments into an archive command.
    pub fn into_command(self) -> Command {
        match self {
            Self::Upload {
                source,
                location,
                year,
                pay_period,
            } => Command::Upload(UploadForm {
                source,
                location: location.unwrap_or_default(),
                year: year.unwrap_or_default(),
                pay_period: pay_period.unwrap_or_default(),
            }),
            Self::Search { term } => Command::Search { term },
            Self::Open { filename } => Command::OpenFile { filename },
            Self::Delete { filename, .. } => Command::DeleteFile { filename },
            Self::Details { filename } => Command::ShowDetails { filename },
            Self::Relocate { filename, location } => Command::UpdateLocation { filename, location },
            Self::Keyword { command } => match command {
                KeywordCommands::List => Command::ListKeywords,
                KeywordCommands::Add { keyword } => Command::AddKeyword { keyword },
                KeywordCommands::Delete { keyword } => Command::DeleteKeyword { keyword },
            },
            Self::Attach {
                kind,
                filename,
                name,
            } => Command::Attach {
                filename,
                kind: kind.into(),
                name,
            },
            Self::Detach {
                kind,
                filename,
                name,
            } => Command::Detach {
                filename,
                kind: kind.into(),
                name,
            },
            Self::Years => Command::ListYears,
            Self::Chart { year, mode } => Command::Chart {
                year,
                mode: mode.into(),
            },
        }
    }
}
