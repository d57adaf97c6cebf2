//! Chart payload: per-year stats projected for the line-chart renderer.
//!
//! The renderer owns its own draw/destroy lifecycle; the server only supplies
//! data in first-encountered year order plus the fixed display options.

use serde::Serialize;

use crate::aggregate::YearSummary;

pub const CHART_TITLE: &str = "Job Statistics";
pub const SERIES_JOB_COUNTS: &str = "Job counts";
pub const SERIES_AVERAGE_SALARY: &str = "Average salary";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesData {
    Counts(Vec<usize>),
    Amounts(Vec<f64>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: &'static str,
    pub data: SeriesData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub title: &'static str,
    #[serde(rename = "type")]
    pub chart_type: &'static str,
    pub height: u32,
    pub x_axis_title: &'static str,
    pub colors: [&'static str; 2],
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self { title: CHART_TITLE, chart_type: "line", height: 350, x_axis_title: "Year", colors: ["#77B6EA", "#545454"] }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    pub options: ChartOptions,
}

impl ChartPayload {
    #[must_use]
    pub fn from_summaries(rows: &[YearSummary]) -> Self {
        Self {
            categories: rows.iter().map(|r| r.year.clone()).collect(),
            series: vec![
                Series { name: SERIES_JOB_COUNTS, data: SeriesData::Counts(rows.iter().map(|r| r.job_count).collect()) },
                Series {
                    name: SERIES_AVERAGE_SALARY,
                    data: SeriesData::Amounts(rows.iter().map(|r| r.average_salary).collect()),
                },
            ],
            options: ChartOptions::default(),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::from_summaries(&[])
    }
}
