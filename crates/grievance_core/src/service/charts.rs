//! Chart data assembly for the Graphics view.

use crate::repo::CountsByLabel;
use crate::repo::GrievanceRepository;
use crate::service::{ArchiveService, ServiceResult};
use serde::{Deserialize, Serialize};

/// The three charts offered per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartMode {
    /// Bars of keyword attachment counts.
    KeywordCount,
    /// Bars of person attachment counts.
    PersonCount,
    /// Pie of keyword counts as shares of the year's total.
    KeywordDensity,
}

impl ChartMode {
    pub fn title(self, year: i32) -> String {
        match self {
            Self::KeywordCount => format!("Keyword Count {year}"),
            Self::PersonCount => format!("Employee Issue Count {year}"),
            Self::KeywordDensity => format!("Keyword Density {year}"),
        }
    }

    pub fn style(self) -> ChartStyle {
        match self {
            Self::KeywordCount | Self::PersonCount => ChartStyle::Bar,
            Self::KeywordDensity => ChartStyle::Pie,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartStyle {
    Bar,
    Pie,
}

/// One labelled slice or bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartEntry {
    pub label: String,
    pub count: u64,
    /// `count / total`, 0.0 when the total is zero.
    pub share: f64,
}

impl ChartEntry {
    /// Share as a percentage with one decimal, e.g. `"33.3%"`.
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.share * 100.0)
    }
}

/// Renderer-agnostic chart description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub year: i32,
    pub mode: ChartMode,
    pub title: String,
    pub style: ChartStyle,
    pub total: u64,
    /// Ordered by label.
    pub entries: Vec<ChartEntry>,
}

impl ChartData {
    pub fn from_counts(year: i32, mode: ChartMode, counts: CountsByLabel) -> Self {
        let total: u64 = counts.values().sum();
        let entries = counts
            .into_iter()
            .map(|(label, count)| ChartEntry {
                label,
                count,
                share: if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64
                },
            })
            .collect();

        Self {
            year,
            mode,
            title: mode.title(year),
            style: mode.style(),
            total,
            entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<R: GrievanceRepository> ArchiveService<R> {
    /// Fetches the counts behind one chart; density reuses keyword counts.
    pub fn chart(&self, year: i32, mode: ChartMode) -> ServiceResult<ChartData> {
        let counts = match mode {
            ChartMode::KeywordCount | ChartMode::KeywordDensity => {
                self.repo.keyword_counts_by_year(year)?
            }
            ChartMode::PersonCount => self.repo.person_counts_by_year(year)?,
        };
        Ok(ChartData::from_counts(year, mode, counts))
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartData, ChartMode, ChartStyle};
    use std::collections::BTreeMap;

    #[test]
    fn density_shares_sum_to_one() {
        let counts = BTreeMap::from([
            ("overtime".to_string(), 2),
            ("safety".to_string(), 1),
        ]);
        let chart = ChartData::from_counts(2021, ChartMode::KeywordDensity, counts);

        assert_eq!(chart.title, "Keyword Density 2021");
        assert_eq!(chart.style, ChartStyle::Pie);
        assert_eq!(chart.total, 3);
        assert_eq!(chart.entries[0].percent_label(), "66.7%");
        assert_eq!(chart.entries[1].percent_label(), "33.3%");
        let sum: f64 = chart.entries.iter().map(|entry| entry.share).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_counts_produce_empty_chart() {
        let chart = ChartData::from_counts(2020, ChartMode::PersonCount, BTreeMap::new());
        assert!(chart.is_empty());
        assert_eq!(chart.total, 0);
        assert_eq!(chart.title, "Employee Issue Count 2020");
    }
}
