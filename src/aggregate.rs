//! Aggregation: per-year and per-job-title statistics.
//!
//! DESIGN
//! ======
//! Two pure passes over the record slice. Grouping preserves
//! first-encountered order, so the output order is a function of the input
//! file alone; sorting is a separate concern (`crate::sort`).
//!
//! A salary that does not parse as a finite number fails the whole pass.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dataset::{COL_SALARY_USD, COL_WORK_YEAR, Record};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregateError {
    #[error("row {row}: salary_in_usd '{value}' is not a number")]
    InvalidSalary { row: usize, value: String },
    #[error("row {row}: missing field '{field}'")]
    MissingField { row: usize, field: &'static str },
}

impl crate::error::ErrorCode for AggregateError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidSalary { .. } => "E_INVALID_SALARY",
            Self::MissingField { .. } => "E_MISSING_FIELD",
        }
    }
}

/// Aggregate job count and average salary for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    pub year: String,
    pub job_count: usize,
    pub average_salary: f64,
}

/// Job count for one title within a selected year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTitleSummary {
    pub job_title: String,
    pub job_count: usize,
}

// =============================================================================
// PER-YEAR
// =============================================================================

/// One [`YearSummary`] per distinct `work_year`, in first-encountered order.
///
/// # Errors
///
/// Returns [`AggregateError::InvalidSalary`] for a non-numeric salary and
/// [`AggregateError::MissingField`] for a record without `work_year` or
/// `salary_in_usd`. Row numbers are 1-based data rows (header excluded).
#[allow(clippy::cast_precision_loss)]
pub fn summarize_years(records: &[Record]) -> Result<Vec<YearSummary>, AggregateError> {
    // (year, count, salary sum) in first-seen order; index maps year -> slot.
    let mut groups: Vec<(&str, usize, f64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (i, record) in records.iter().enumerate() {
        let row = i + 1;
        let year = record
            .work_year()
            .ok_or(AggregateError::MissingField { row, field: COL_WORK_YEAR })?;
        let salary = parse_salary(record, row)?;

        let slot = *index.entry(year).or_insert_with(|| {
            groups.push((year, 0, 0.0));
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.1 += 1;
        group.2 += salary;
    }

    Ok(groups
        .into_iter()
        .map(|(year, count, sum)| YearSummary {
            year: year.to_owned(),
            job_count: count,
            average_salary: round_cents(sum / count as f64),
        })
        .collect())
}

fn parse_salary(record: &Record, row: usize) -> Result<f64, AggregateError> {
    let raw = record
        .salary_in_usd()
        .ok_or(AggregateError::MissingField { row, field: COL_SALARY_USD })?;
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AggregateError::InvalidSalary { row, value: raw.to_owned() }),
    }
}

/// Round to two decimal places, half away from zero.
///
/// Works on the shortest decimal form of `value`, so a mean that prints as
/// `1.005` rounds to `1.01` even though its binary value sits just below.
#[must_use]
pub fn round_cents(value: f64) -> f64 {
    decimal_cents(value).unwrap_or_else(|| (value * 100.0).round() / 100.0)
}

// Beyond 1e13 a double has no fractional cents left to round.
#[allow(clippy::cast_precision_loss)]
fn decimal_cents(value: f64) -> Option<f64> {
    if !value.is_finite() || value.abs() >= 1e13 {
        return None;
    }
    let repr = value.abs().to_string();
    let (whole, frac) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let digit = |i: usize| frac.as_bytes().get(i).map_or(0, |b| u64::from(b - b'0'));

    let mut cents = whole.parse::<u64>().ok()? * 100 + digit(0) * 10 + digit(1);
    if digit(2) >= 5 {
        cents += 1;
    }
    let rounded = cents as f64 / 100.0;
    Some(if value < 0.0 { -rounded } else { rounded })
}

// =============================================================================
// PER-TITLE
// =============================================================================

/// Job-title breakdown for `year`, in first-encountered title order.
///
/// Year matching is exact. Records without a `job_title` are grouped under
/// the empty title so the counts still partition the year.
#[must_use]
pub fn summarize_job_titles(records: &[Record], year: &str) -> Vec<JobTitleSummary> {
    let mut out: Vec<JobTitleSummary> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records.iter().filter(|r| r.work_year() == Some(year)) {
        let title = record.job_title().unwrap_or("");
        match index.get(title) {
            Some(&slot) => out[slot].job_count += 1,
            None => {
                index.insert(title, out.len());
                out.push(JobTitleSummary { job_title: title.to_owned(), job_count: 1 });
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
