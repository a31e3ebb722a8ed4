//! Per-year aggregates feeding the chart views.

use crate::repo::{RepoResult, SqliteRepository};
use rusqlite::Connection;
use std::collections::{BTreeMap, BTreeSet};

/// Label to count mapping, ordered by label.
pub type CountsByLabel = BTreeMap<String, u64>;

/// Repository interface for chart aggregates.
pub trait StatsRepository {
    /// Keyword attachment counts over Files of `year`.
    fn keyword_counts_by_year(&self, year: i32) -> RepoResult<CountsByLabel>;
    /// Person attachment counts over Files of `year`.
    fn person_counts_by_year(&self, year: i32) -> RepoResult<CountsByLabel>;
    /// Every year present in `tbl_file`.
    fn distinct_years(&self) -> RepoResult<BTreeSet<i32>>;
}

impl StatsRepository for SqliteRepository {
    fn keyword_counts_by_year(&self, year: i32) -> RepoResult<CountsByLabel> {
        load_counts(
            self.connection(),
            "SELECT k.keyword, COUNT(*)
             FROM tbl_file f
             INNER JOIN tbl_hlp_file_keyword h ON f.id = h.file_id
             INNER JOIN tbl_keyword k ON h.keyword_id = k.id
             WHERE f.year = ?1
             GROUP BY k.keyword;",
            year,
        )
    }

    fn person_counts_by_year(&self, year: i32) -> RepoResult<CountsByLabel> {
        load_counts(
            self.connection(),
            "SELECT p.name, COUNT(*)
             FROM tbl_file f
             INNER JOIN tbl_hlp_file_person h ON f.id = h.file_id
             INNER JOIN tbl_person p ON h.person_id = p.id
             WHERE f.year = ?1
             GROUP BY p.name;",
            year,
        )
    }

    fn distinct_years(&self) -> RepoResult<BTreeSet<i32>> {
        let mut stmt = self
            .connection()
            .prepare("SELECT DISTINCT year FROM tbl_file;")?;
        let years = stmt
            .query_map([], |row| row.get::<_, i32>(0))?
            .collect::<rusqlite::Result<BTreeSet<_>>>()?;
        Ok(years)
    }
}

fn load_counts(conn: &Connection, sql: &str, year: i32) -> RepoResult<CountsByLabel> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([year])?;
    let mut counts = CountsByLabel::new();
    while let Some(row) = rows.next()? {
        let label: String = row.get(0)?;
        let count: i64 = row.get(1)?;
        counts.insert(label, count.unsigned_abs());
    }
    Ok(counts)
}
