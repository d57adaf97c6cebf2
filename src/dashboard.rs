//! Dashboard session: reducer, selection state machine, derived views.
//!
//! DESIGN
//! ======
//! The whole session is one immutable [`DashboardState`]. Every mutation is
//! an [`Action`] passed through [`reduce`], which returns a new state or an
//! error (leaving the old state in place). [`Dashboard::dispatch`] is the
//! only writer: it reduces, recomputes every derived view from the new
//! state, then swaps both in. Callers hold the session behind one `RwLock`,
//! so a reader sees either the old state with its views or the new state
//! with its views, never a mix.
//!
//! SELECTION
//! =========
//! `NoSelection -> YearSelected(y)` on `SelectYear`. Re-selecting replaces
//! the year. `ClearSelection` drops the year; what happens to the detail
//! flag is the [`DetailVisibility`] policy.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::aggregate::{self, AggregateError, JobTitleSummary, YearSummary};
use crate::chart::ChartPayload;
use crate::dataset::Dataset;
use crate::sort::{self, SortConfig, SortKey};

// =============================================================================
// POLICY
// =============================================================================

/// Whether the detail table can be hidden again once shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailVisibility {
    /// Once a year has been selected the detail table stays visible.
    #[default]
    Sticky,
    /// The detail table is visible exactly while a year is selected.
    FollowSelection,
}

impl DetailVisibility {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "sticky" => Some(Self::Sticky),
            "follow_selection" => Some(Self::FollowSelection),
            _ => None,
        }
    }

    fn after_clear(self, was_visible: bool) -> bool {
        match self {
            Self::Sticky => was_visible,
            Self::FollowSelection => false,
        }
    }
}

// =============================================================================
// STATE TYPES
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub selected_year: Option<String>,
    pub detail_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// A failed exchange. Shown in the transcript, never sent as context.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self { role: Role::Error, content: content.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DataStatus {
    Loading,
    Ready { rows: usize },
    Unavailable { code: String, reason: String },
}

/// A parsed dataset together with its per-year summary.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub dataset: Arc<Dataset>,
    pub summaries: Arc<[YearSummary]>,
}

impl LoadedData {
    /// Aggregate `dataset` and bundle both.
    ///
    /// # Errors
    ///
    /// Propagates [`AggregateError`] from the per-year pass.
    pub fn from_dataset(dataset: Dataset) -> Result<Self, AggregateError> {
        let summaries = aggregate::summarize_years(&dataset.records)?;
        Ok(Self { dataset: Arc::new(dataset), summaries: summaries.into() })
    }

    fn has_year(&self, year: &str) -> bool {
        self.summaries.iter().any(|s| s.year == year)
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    /// A (re)load began. Bumps the load generation; older results are ignored.
    LoadStarted,
    DatasetLoaded { generation: u64, data: LoadedData },
    DatasetFailed { generation: u64, code: &'static str, reason: String },
    ToggleSort(SortKey),
    SetSort(SortConfig),
    SelectYear(String),
    ClearSelection,
    AppendTurn(ChatTurn),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    #[error("dataset is still loading")]
    DataLoading,
    #[error("dataset unavailable: {0}")]
    DataUnavailable(String),
    #[error("year '{0}' is not in the dataset")]
    UnknownYear(String),
}

impl crate::error::ErrorCode for DashboardError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DataLoading => "E_DATA_LOADING",
            Self::DataUnavailable(_) => "E_DATA_UNAVAILABLE",
            Self::UnknownYear(_) => "E_UNKNOWN_YEAR",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::DataLoading)
    }
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub visibility: DetailVisibility,
    pub generation: u64,
    pub status: DataStatus,
    pub data: Option<LoadedData>,
    pub sort: SortConfig,
    pub selection: Selection,
    pub transcript: Vec<ChatTurn>,
}

impl DashboardState {
    #[must_use]
    pub fn new(visibility: DetailVisibility) -> Self {
        Self {
            visibility,
            generation: 0,
            status: DataStatus::Loading,
            data: None,
            sort: SortConfig::default(),
            selection: Selection::default(),
            transcript: Vec::new(),
        }
    }

    /// Loaded data, or why there is none.
    ///
    /// # Errors
    ///
    /// [`DashboardError::DataLoading`] before the first load completes,
    /// [`DashboardError::DataUnavailable`] after a failed load.
    pub fn ready_data(&self) -> Result<&LoadedData, DashboardError> {
        match (&self.status, &self.data) {
            (DataStatus::Ready { .. }, Some(data)) => Ok(data),
            (DataStatus::Unavailable { reason, .. }, _) => Err(DashboardError::DataUnavailable(reason.clone())),
            _ => Err(DashboardError::DataLoading),
        }
    }

    /// Transcript turns that form the model's conversation context.
    pub fn chat_context(&self) -> impl Iterator<Item = &ChatTurn> {
        self.transcript.iter().filter(|t| t.role != Role::Error)
    }
}

// =============================================================================
// REDUCER
// =============================================================================

/// Apply `action` to `state`, producing the next state.
///
/// # Errors
///
/// Returns a [`DashboardError`] when the action is not valid in the current
/// state; the caller keeps `state` unchanged.
pub fn reduce(state: &DashboardState, action: Action) -> Result<DashboardState, DashboardError> {
    let mut next = state.clone();
    match action {
        Action::LoadStarted => {
            next.generation += 1;
            if next.data.is_none() {
                next.status = DataStatus::Loading;
            }
        }
        Action::DatasetLoaded { generation, data } => {
            if generation != state.generation {
                return Ok(next);
            }
            next.status = DataStatus::Ready { rows: data.dataset.len() };
            let stale = next
                .selection
                .selected_year
                .as_deref()
                .is_some_and(|year| !data.has_year(year));
            if stale {
                next.selection.selected_year = None;
                next.selection.detail_visible = state.visibility.after_clear(next.selection.detail_visible);
            }
            next.data = Some(data);
        }
        Action::DatasetFailed { generation, code, reason } => {
            if generation != state.generation {
                return Ok(next);
            }
            next.status = DataStatus::Unavailable { code: code.to_owned(), reason };
            next.data = None;
            next.selection.selected_year = None;
            next.selection.detail_visible = state.visibility.after_clear(next.selection.detail_visible);
        }
        Action::ToggleSort(key) => next.sort = state.sort.toggled(key),
        Action::SetSort(config) => next.sort = config,
        Action::SelectYear(year) => {
            let data = state.ready_data()?;
            if !data.has_year(&year) {
                return Err(DashboardError::UnknownYear(year));
            }
            next.selection = Selection { selected_year: Some(year), detail_visible: true };
        }
        Action::ClearSelection => {
            next.selection.selected_year = None;
            next.selection.detail_visible = state.visibility.after_clear(state.selection.detail_visible);
        }
        Action::AppendTurn(turn) => next.transcript.push(turn),
    }
    Ok(next)
}

// =============================================================================
// DERIVED VIEWS
// =============================================================================

/// Everything the tables and chart display, computed from one state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Views {
    /// Per-year rows in the current sort order.
    pub rows: Vec<YearSummary>,
    /// Job-title breakdown of the selected year; empty when none is selected.
    pub detail: Vec<JobTitleSummary>,
    /// Per-year stats in first-encountered order, independent of sort.
    pub chart: ChartPayload,
}

impl Views {
    #[must_use]
    pub fn derive(state: &DashboardState) -> Self {
        let Some(data) = state.data.as_ref() else {
            return Self { rows: Vec::new(), detail: Vec::new(), chart: ChartPayload::empty() };
        };
        let detail = state
            .selection
            .selected_year
            .as_deref()
            .map(|year| aggregate::summarize_job_titles(&data.dataset.records, year))
            .unwrap_or_default();
        Self {
            rows: sort::sort_summaries(&data.summaries, state.sort),
            detail,
            chart: ChartPayload::from_summaries(&data.summaries),
        }
    }
}

// =============================================================================
// DASHBOARD
// =============================================================================

/// The session: current state plus the views derived from it.
#[derive(Debug, Clone)]
pub struct Dashboard {
    state: DashboardState,
    views: Views,
}

/// Full serialized view of the session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub status: DataStatus,
    pub sort: SortConfig,
    pub selection: Selection,
    pub rows: Vec<YearSummary>,
    pub detail: Vec<JobTitleSummary>,
    pub transcript: Vec<ChatTurn>,
}

impl Dashboard {
    #[must_use]
    pub fn new(visibility: DetailVisibility) -> Self {
        let state = DashboardState::new(visibility);
        let views = Views::derive(&state);
        Self { state, views }
    }

    /// The single state-update entry point.
    ///
    /// # Errors
    ///
    /// Propagates the reducer's [`DashboardError`]; state and views are left
    /// untouched on error.
    pub fn dispatch(&mut self, action: Action) -> Result<(), DashboardError> {
        let next = reduce(&self.state, action)?;
        let views = Views::derive(&next);
        self.state = next;
        self.views = views;
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    #[must_use]
    pub fn views(&self) -> &Views {
        &self.views
    }

    #[must_use]
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            status: self.state.status.clone(),
            sort: self.state.sort,
            selection: self.state.selection.clone(),
            rows: self.views.rows.clone(),
            detail: self.views.detail.clone(),
            transcript: self.state.transcript.clone(),
        }
    }
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
