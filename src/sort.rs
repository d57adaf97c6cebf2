//! Sort engine for the per-year summary table.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::aggregate::YearSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Year,
    JobCount,
    AverageSalary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortConfig {
    #[must_use]
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Config produced by a header click on `key`.
    ///
    /// Clicking the active ascending key flips it to descending; every other
    /// click sorts `key` ascending.
    #[must_use]
    pub fn toggled(self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        Self { key, direction }
    }
}

fn compare(a: &YearSummary, b: &YearSummary, key: SortKey) -> Ordering {
    match key {
        SortKey::Year => a.year.cmp(&b.year),
        SortKey::JobCount => a.job_count.cmp(&b.job_count),
        SortKey::AverageSalary => a.average_salary.total_cmp(&b.average_salary),
    }
}

/// Return `rows` ordered by `config`. Stable: equal keys keep input order in
/// both directions. The input slice is not modified.
#[must_use]
pub fn sort_summaries(rows: &[YearSummary], config: SortConfig) -> Vec<YearSummary> {
    let mut out = rows.to_vec();
    match config.direction {
        SortDirection::Ascending => out.sort_by(|a, b| compare(a, b, config.key)),
        SortDirection::Descending => out.sort_by(|a, b| compare(b, a, config.key)),
    }
    out
}

#[cfg(test)]
#[path = "sort_test.rs"]
mod tests;
