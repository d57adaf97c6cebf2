//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the single dashboard session, the chat relay, and the handles
//! the loader needs to (re)start a load.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use crate::dashboard::Dashboard;
use crate::services::chat::ChatRelay;
use crate::services::loader::DataSource;

/// Clone is required by Axum; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<RwLock<Dashboard>>,
    pub chat: Arc<ChatRelay>,
    /// Client used for URL data sources.
    pub http: reqwest::Client,
    pub data_source: DataSource,
    /// Cancelled on process shutdown; loads and chat exchanges observe it.
    pub shutdown: CancellationToken,
    /// Token of the in-flight load, if any.
    pub loader: Arc<Mutex<Option<CancellationToken>>>,
}

impl AppState {
    #[must_use]
    pub fn new(
        dashboard: Dashboard,
        chat: ChatRelay,
        http: reqwest::Client,
        data_source: DataSource,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            dashboard: Arc::new(RwLock::new(dashboard)),
            chat: Arc::new(chat),
            http,
            data_source,
            shutdown,
            loader: Arc::new(Mutex::new(None)),
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::dashboard::{Action, DetailVisibility, LoadedData};
    use crate::dataset::parse_csv;
    use crate::llm::LlmChat;
    use crate::llm::types::{ChatResponse, ContentBlock, LlmError, Message};
    use crate::services::chat::ChatSettings;

    pub const SAMPLE_CSV: &str = "\
work_year,job_title,salary_in_usd
2020,Engineer,100000
2020,Engineer,120000
2021,Analyst,90000
";

    /// `AppState` whose data source does not exist and whose LLM is `llm`.
    #[must_use]
    pub fn test_app_state(llm: Arc<dyn LlmChat>) -> AppState {
        test_app_state_with(
            DataSource::File("/nonexistent/salarydash-test.csv".into()),
            DetailVisibility::Sticky,
            llm,
        )
    }

    #[must_use]
    pub fn test_app_state_with(source: DataSource, visibility: DetailVisibility, llm: Arc<dyn LlmChat>) -> AppState {
        let settings = ChatSettings { max_input_chars: 100, ..ChatSettings::default() };
        AppState::new(
            Dashboard::new(visibility),
            ChatRelay::new(llm, settings),
            reqwest::Client::new(),
            source,
            CancellationToken::new(),
        )
    }

    /// Answers from a script, then with "ok" once the script runs out.
    pub struct ScriptedLlm {
        replies: std::sync::Mutex<Vec<Result<ChatResponse, LlmError>>>,
    }

    impl ScriptedLlm {
        #[must_use]
        pub fn new(replies: Vec<Result<ChatResponse, LlmError>>) -> Arc<dyn LlmChat> {
            Arc::new(Self { replies: std::sync::Mutex::new(replies) })
        }
    }

    #[async_trait::async_trait]
    impl LlmChat for ScriptedLlm {
        async fn chat(&self, _max_tokens: u32, _system: &str, _messages: &[Message]) -> Result<ChatResponse, LlmError> {
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() { text_reply("ok") } else { replies.remove(0) }
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    pub fn text_reply(text: &str) -> Result<ChatResponse, LlmError> {
        Ok(ChatResponse {
            content: vec![ContentBlock::Text { text: text.into() }],
            model: "scripted".into(),
            stop_reason: "end_turn".into(),
            input_tokens: 0,
            output_tokens: 0,
        })
    }

    /// Load `csv` straight into the dashboard, bypassing the loader.
    pub async fn seed_dataset(state: &AppState, csv: &str) {
        let data = LoadedData::from_dataset(parse_csv(csv).unwrap()).unwrap();
        let mut dashboard = state.dashboard.write().await;
        dashboard.dispatch(Action::LoadStarted).unwrap();
        let generation = dashboard.state().generation;
        dashboard
            .dispatch(Action::DatasetLoaded { generation, data })
            .unwrap();
    }
}
