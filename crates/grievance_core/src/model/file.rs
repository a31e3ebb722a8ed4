//! File record model and stored-filename rules.
//!
//! # Invariants
//! - Serial numbers are `year` followed by a zero-padded 4-digit counter.
//! - Stored filenames are `"<serial> <original filename>"`.
//! - Pay periods are in `1..=26`.

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Number of pay periods in one year.
pub const PAY_PERIODS_PER_YEAR: u8 = 26;

/// Surrogate key of a `tbl_file` row.
pub type FileId = i64;

/// Pay period number within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PayPeriod(u8);

impl PayPeriod {
    /// Builds a pay period, returning `None` outside `1..=26`.
    pub fn new(value: u8) -> Option<Self> {
        (1..=PAY_PERIODS_PER_YEAR)
            .contains(&value)
            .then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Display for PayPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One tracked grievance document as persisted in `tbl_file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrievanceFile {
    pub id: FileId,
    /// Generated stored filename, unique across the archive.
    pub filename: String,
    /// Free-text location; editable after upload.
    pub location: String,
    pub year: i32,
    pub pay_period: PayPeriod,
}

/// Insert model for a new File row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFile {
    pub filename: String,
    pub location: String,
    pub year: i32,
    pub pay_period: PayPeriod,
}

/// Builds the serial number for the next upload.
///
/// The counter is `latest_file_id + 1`, padded to four digits. Counters
/// beyond 9999 widen instead of wrapping.
pub fn serial_number(year: i32, latest_file_id: FileId) -> String {
    format!("{year}{:04}", latest_file_id + 1)
}

/// Builds the stored filename for an uploaded document.
///
/// ```
/// use grievance_core::model::file::stored_filename;
///
/// assert_eq!(stored_filename(2021, 41, "report.pdf"), "20210042 report.pdf");
/// ```
pub fn stored_filename(year: i32, latest_file_id: FileId, original_name: &str) -> String {
    format!("{} {original_name}", serial_number(year, latest_file_id))
}
