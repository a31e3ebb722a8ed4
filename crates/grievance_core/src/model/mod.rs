//! Archive domain model.
//!
//! # Responsibility
//! - Define the records stored in the archive tables.
//! - Own serial-number and stored-filename generation rules.
//!
//! # Invariants
//! - A File is addressed by its generated, globally unique stored filename.
//! - Keyword text and Person names are unique across the archive.

pub mod file;
pub mod tag;
