//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! JSON endpoints for the dashboard session and the chat relay live under
//! `/api`. The dashboard page itself is served as static files from the
//! website directory for every other path.

pub mod chat;
pub mod dashboard;

use std::path::Path;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/dashboard", get(dashboard::get_dashboard))
        .route("/api/summary", get(dashboard::get_summary))
        .route("/api/summary/sort", post(dashboard::sort_summary))
        .route("/api/chart", get(dashboard::get_chart))
        .route(
            "/api/selection",
            get(dashboard::get_selection)
                .post(dashboard::select_year)
                .delete(dashboard::clear_selection),
        )
        .route("/api/dataset/reload", post(dashboard::reload_dataset))
        .route("/api/chat", get(chat::get_transcript).post(chat::post_message))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

/// API routes plus the static dashboard page from `website_dir`.
pub fn app(state: AppState, website_dir: &Path) -> Router {
    let website = ServeDir::new(website_dir).append_index_html_on_directories(true);
    api_routes(state)
        .fallback_service(website)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}


#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
