//! Dashboard routes: summary table, sort, chart, selection, reload.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::aggregate::{JobTitleSummary, YearSummary};
use crate::chart::ChartPayload;
use crate::dashboard::{Action, Dashboard, DashboardError, DashboardSnapshot, Selection};
use crate::error::ApiError;
use crate::services::loader;
use crate::sort::{SortConfig, SortDirection, SortKey};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub sort: SortConfig,
    pub rows: Vec<YearSummary>,
}

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub selection: Selection,
    pub rows: Vec<JobTitleSummary>,
}

#[derive(Debug, Deserialize)]
pub struct SortBody {
    pub key: SortKey,
    /// Absent: toggle as a header click would. Present: set explicitly.
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Deserialize)]
pub struct SelectBody {
    pub year: String,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub generation: u64,
}

fn summary(dashboard: &Dashboard) -> SummaryResponse {
    SummaryResponse { sort: dashboard.state().sort, rows: dashboard.views().rows.clone() }
}

fn selection(dashboard: &Dashboard) -> SelectionResponse {
    SelectionResponse { selection: dashboard.state().selection.clone(), rows: dashboard.views().detail.clone() }
}

/// `GET /api/dashboard`: full session snapshot, always available.
pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    Json(state.dashboard.read().await.snapshot())
}

/// `GET /api/summary`: per-year rows in the current sort order.
pub async fn get_summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, ApiError> {
    let dashboard = state.dashboard.read().await;
    dashboard.state().ready_data().map_err(dashboard_error)?;
    Ok(Json(summary(&dashboard)))
}

/// `POST /api/summary/sort`: toggle or set the sort.
pub async fn sort_summary(
    State(state): State<AppState>,
    Json(body): Json<SortBody>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let mut dashboard = state.dashboard.write().await;
    dashboard.state().ready_data().map_err(dashboard_error)?;
    let action = match body.direction {
        Some(direction) => Action::SetSort(SortConfig::new(body.key, direction)),
        None => Action::ToggleSort(body.key),
    };
    dashboard.dispatch(action).map_err(dashboard_error)?;
    tracing::debug!(sort = ?dashboard.state().sort, "dashboard: sort changed");
    Ok(Json(summary(&dashboard)))
}

/// `GET /api/chart`: per-year stats in first-encountered order.
pub async fn get_chart(State(state): State<AppState>) -> Result<Json<ChartPayload>, ApiError> {
    let dashboard = state.dashboard.read().await;
    dashboard.state().ready_data().map_err(dashboard_error)?;
    Ok(Json(dashboard.views().chart.clone()))
}

/// `GET /api/selection`: selection plus the detail rows.
pub async fn get_selection(State(state): State<AppState>) -> Result<Json<SelectionResponse>, ApiError> {
    let dashboard = state.dashboard.read().await;
    dashboard.state().ready_data().map_err(dashboard_error)?;
    Ok(Json(selection(&dashboard)))
}

/// `POST /api/selection`: drill into one year.
pub async fn select_year(
    State(state): State<AppState>,
    Json(body): Json<SelectBody>,
) -> Result<Json<SelectionResponse>, ApiError> {
    let mut dashboard = state.dashboard.write().await;
    dashboard
        .dispatch(Action::SelectYear(body.year))
        .map_err(dashboard_error)?;
    Ok(Json(selection(&dashboard)))
}

/// `DELETE /api/selection`: clear the selected year.
pub async fn clear_selection(State(state): State<AppState>) -> Result<Json<SelectionResponse>, ApiError> {
    let mut dashboard = state.dashboard.write().await;
    dashboard.dispatch(Action::ClearSelection).map_err(dashboard_error)?;
    Ok(Json(selection(&dashboard)))
}

/// `POST /api/dataset/reload`: restart the load in the background.
pub async fn reload_dataset(State(state): State<AppState>) -> (StatusCode, Json<ReloadResponse>) {
    let handle = loader::spawn_load(&state).await;
    tracing::info!(generation = handle.generation, "dashboard: reload requested");
    (StatusCode::ACCEPTED, Json(ReloadResponse { generation: handle.generation }))
}

pub(crate) fn dashboard_error(err: DashboardError) -> ApiError {
    let status = match err {
        DashboardError::DataLoading | DashboardError::DataUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        DashboardError::UnknownYear(_) => StatusCode::NOT_FOUND,
    };
    ApiError::new(status, &err)
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
