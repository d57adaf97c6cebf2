//! Dataset: parsed salary rows.
//!
//! DESIGN
//! ======
//! The CSV is read with headers on; every row becomes a [`Record`] mapping
//! column name to raw string value. Only `work_year`, `job_title` and
//! `salary_in_usd` are interpreted downstream, but every column is kept.
//! Blank lines are skipped by the reader. A header missing one of the
//! required columns rejects the whole document.

use std::collections::HashMap;

use serde::Serialize;

pub const COL_WORK_YEAR: &str = "work_year";
pub const COL_JOB_TITLE: &str = "job_title";
pub const COL_SALARY_USD: &str = "salary_in_usd";

/// Columns the aggregation pipeline depends on.
pub const REQUIRED_COLUMNS: [&str; 3] = [COL_WORK_YEAR, COL_JOB_TITLE, COL_SALARY_USD];

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("CSV parse failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV header is missing required column '{0}'")]
    MissingColumn(&'static str),
}

impl crate::error::ErrorCode for DatasetError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Csv(_) => "E_CSV_PARSE",
            Self::MissingColumn(_) => "E_MISSING_COLUMN",
        }
    }
}

// =============================================================================
// RECORD
// =============================================================================

/// One CSV row keyed by header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    /// Build a record from `(column, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self { fields: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    #[must_use]
    pub fn work_year(&self) -> Option<&str> {
        self.get(COL_WORK_YEAR)
    }

    #[must_use]
    pub fn job_title(&self) -> Option<&str> {
        self.get(COL_JOB_TITLE)
    }

    #[must_use]
    pub fn salary_in_usd(&self) -> Option<&str> {
        self.get(COL_SALARY_USD)
    }
}

// =============================================================================
// DATASET
// =============================================================================

/// All rows of one loaded CSV document, in file order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    #[must_use]
    pub fn new(headers: Vec<String>, records: Vec<Record>) -> Self {
        Self { headers, records }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse CSV text into a [`Dataset`].
///
/// # Errors
///
/// Returns [`DatasetError::MissingColumn`] if a required column is absent
/// from the header, or [`DatasetError::Csv`] for malformed input (for
/// example a row with a different field count than the header).
pub fn parse_csv(text: &str) -> Result<Dataset, DatasetError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(DatasetError::MissingColumn(required));
        }
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(Record::from_pairs(
            headers.iter().cloned().zip(row.iter().map(str::to_owned)),
        ));
    }

    Ok(Dataset::new(headers, records))
}

#[cfg(test)]
#[path = "dataset_test.rs"]
mod tests;
