//! Dataset loader: read, parse, aggregate, publish.
//!
//! DESIGN
//! ======
//! A load is a spawned task tied to a child of the shutdown token. Starting
//! a load cancels the previous one and dispatches `LoadStarted`, which bumps
//! the dashboard's load generation. The task reports back with that
//! generation, so a result that arrives after a newer load started is
//! discarded by the reducer.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::aggregate::AggregateError;
use crate::dashboard::{Action, LoadedData};
use crate::dataset::{self, DatasetError};
use crate::error::ErrorCode;
use crate::state::AppState;

// =============================================================================
// SOURCE
// =============================================================================

/// Where the CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` values are URLs; anything else is a path.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw.to_owned())
        } else {
            Self::File(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("could not read {path}: {message}")]
    Source { path: String, message: String },
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("fetch returned status {status}")]
    FetchStatus { status: u16 },
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error("load cancelled")]
    Cancelled,
}

impl ErrorCode for DataLoadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Source { .. } => "E_DATA_SOURCE",
            Self::Fetch(_) | Self::FetchStatus { .. } => "E_DATA_FETCH",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Dataset(e) => e.error_code(),
            Self::Aggregate(e) => e.error_code(),
            Self::Cancelled => "E_LOAD_CANCELLED",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::FetchStatus { status: 429 | 500..=599 })
    }
}

// =============================================================================
// LOADING
// =============================================================================

/// # Errors
///
/// Returns [`DataLoadError::HttpClientBuild`] if the client cannot be built.
pub fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, DataLoadError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| DataLoadError::HttpClientBuild(e.to_string()))
}

/// Raw CSV text from `source`.
///
/// # Errors
///
/// [`DataLoadError::Source`] for an unreadable file, [`DataLoadError::Fetch`]
/// or [`DataLoadError::FetchStatus`] for a failed download.
pub async fn fetch_text(source: &DataSource, http: &reqwest::Client) -> Result<String, DataLoadError> {
    match source {
        DataSource::File(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DataLoadError::Source { path: path.display().to_string(), message: e.to_string() }),
        DataSource::Url(url) => {
            let response = http
                .get(url)
                .send()
                .await
                .map_err(|e| DataLoadError::Fetch(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(DataLoadError::FetchStatus { status: status.as_u16() });
            }
            response
                .text()
                .await
                .map_err(|e| DataLoadError::Fetch(e.to_string()))
        }
    }
}

/// Read, parse, and aggregate `source`.
///
/// # Errors
///
/// Any [`DataLoadError`] from the three stages.
pub async fn load(source: &DataSource, http: &reqwest::Client) -> Result<LoadedData, DataLoadError> {
    let text = fetch_text(source, http).await?;
    let dataset = dataset::parse_csv(&text)?;
    Ok(LoadedData::from_dataset(dataset)?)
}

/// A started load: its generation and the task running it.
pub struct LoadHandle {
    pub generation: u64,
    pub task: JoinHandle<()>,
}

/// Start (or restart) the dataset load in the background.
pub async fn spawn_load(state: &AppState) -> LoadHandle {
    let token = state.shutdown.child_token();

    // Held until the generation is read so concurrent reloads are ordered.
    let mut current = state.loader.lock().await;
    if let Some(previous) = current.replace(token.clone()) {
        previous.cancel();
    }
    let generation = {
        let mut dashboard = state.dashboard.write().await;
        if let Err(e) = dashboard.dispatch(Action::LoadStarted) {
            warn!(error = %e, "dataset: load start rejected");
        }
        dashboard.state().generation
    };
    drop(current);

    let dashboard = state.dashboard.clone();
    let source = state.data_source.clone();
    let http = state.http.clone();
    let task = tokio::spawn(async move {
        info!(%source, generation, "dataset: load started");
        let outcome = tokio::select! {
            biased;
            () = token.cancelled() => Err(DataLoadError::Cancelled),
            result = load(&source, &http) => result,
        };

        let action = match outcome {
            Ok(data) => {
                if data.dataset.is_empty() {
                    warn!(%source, generation, "dataset: CSV has no data rows");
                }
                info!(
                    generation,
                    columns = data.dataset.headers.len(),
                    rows = data.dataset.len(),
                    years = data.summaries.len(),
                    "dataset: loaded"
                );
                Action::DatasetLoaded { generation, data }
            }
            Err(DataLoadError::Cancelled) => {
                info!(generation, "dataset: load cancelled");
                return;
            }
            Err(e) => {
                error!(%source, generation, code = e.error_code(), error = %e, "dataset: load failed");
                Action::DatasetFailed { generation, code: e.error_code(), reason: e.to_string() }
            }
        };

        if let Err(e) = dashboard.write().await.dispatch(action) {
            warn!(generation, error = %e, "dataset: result rejected");
        }
    });

    LoadHandle { generation, task }
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
