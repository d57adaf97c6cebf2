mod aggregate;
mod chart;
mod config;
mod dashboard;
mod dataset;
mod error;
mod llm;
mod routes;
mod services;
mod sort;
mod state;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::dashboard::Dashboard;
use crate::llm::LlmChat;
use crate::services::chat::ChatRelay;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "configuration invalid; refusing to start");
            std::process::exit(1);
        }
    };

    let llm: Arc<dyn LlmChat> = match llm::LlmClient::from_config(config.llm.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!(error = %e, "LLM client init failed");
            std::process::exit(1);
        }
    };
    tracing::info!(model = llm.model(), mode = ?config.llm.openai_mode, "LLM client initialized");

    let http = services::loader::build_http_client(config.data_fetch_timeout_secs).expect("http client build failed");
    let shutdown = CancellationToken::new();
    let state = state::AppState::new(
        Dashboard::new(config.detail_visibility),
        ChatRelay::new(llm, config.chat.clone()),
        http,
        config.data_source.clone(),
        shutdown.clone(),
    );

    let initial_load = services::loader::spawn_load(&state).await;

    let app = routes::app(state, &config.website_dir);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(
        port = config.port,
        source = %config.data_source,
        visibility = ?config.detail_visibility,
        "salarydash listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown requested");
            shutdown.cancel();
        })
        .await
        .expect("server failed");

    if initial_load.task.await.is_err() {
        tracing::warn!("dataset: initial load task panicked");
    }
}
