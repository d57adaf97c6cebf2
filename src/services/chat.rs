//! Chat relay: user turn to completion API to assistant or error turn.
//!
//! DESIGN
//! ======
//! The transcript lives in the dashboard state and is only changed through
//! `Action::AppendTurn`. One exchange runs at a time: the relay holds its
//! exchange lock from the moment the user turn is appended until the reply
//! (or the error turn) is appended, so turns from two exchanges never
//! interleave. The dashboard lock itself is never held across the model call.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{DEFAULT_CHAT_MAX_INPUT_CHARS, DEFAULT_CHAT_MAX_TOKENS};
use crate::dashboard::{Action, ChatTurn, Dashboard, DashboardError, DashboardState, Role};
use crate::error::ErrorCode;
use crate::llm::LlmChat;
use crate::llm::types::{LlmError, Message};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    /// Upper bound on a trimmed utterance, in characters.
    pub max_input_chars: usize,
    pub max_tokens: u32,
    /// Sent as the system prompt when non-empty.
    pub system_prompt: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            max_input_chars: DEFAULT_CHAT_MAX_INPUT_CHARS,
            max_tokens: DEFAULT_CHAT_MAX_TOKENS,
            system_prompt: String::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
    #[error("the model returned an empty reply")]
    EmptyReply,
    #[error("chat cancelled: server is shutting down")]
    Cancelled,
    #[error(transparent)]
    Dashboard(#[from] DashboardError),
}

impl ErrorCode for ChatError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "E_INVALID_INPUT",
            Self::Llm(_) => "E_LLM_ERROR",
            Self::EmptyReply => "E_EMPTY_REPLY",
            Self::Cancelled => "E_CANCELLED",
            Self::Dashboard(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Llm(e) => e.retryable(),
            Self::EmptyReply => true,
            _ => false,
        }
    }
}

/// A completed exchange.
#[derive(Debug, Clone, Serialize)]
pub struct ChatExchange {
    pub reply: String,
    pub transcript: Vec<ChatTurn>,
}

pub struct ChatRelay {
    llm: Arc<dyn LlmChat>,
    settings: ChatSettings,
    exchange: Mutex<()>,
}

impl ChatRelay {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmChat>, settings: ChatSettings) -> Self {
        Self { llm, settings, exchange: Mutex::new(()) }
    }

    /// Relay one user utterance and record the outcome in the transcript.
    ///
    /// # Errors
    ///
    /// [`ChatError::InvalidInput`] leaves the transcript unchanged. Every
    /// other error is also recorded as an error turn after the user turn.
    pub async fn send(
        &self,
        dashboard: &RwLock<Dashboard>,
        shutdown: &CancellationToken,
        utterance: &str,
    ) -> Result<ChatExchange, ChatError> {
        validate(utterance, self.settings.max_input_chars)?;
        let _exchange = self.exchange.lock().await;

        let messages = {
            let mut dashboard = dashboard.write().await;
            dashboard.dispatch(Action::AppendTurn(ChatTurn::user(utterance)))?;
            context_messages(dashboard.state())
        };
        info!(model = self.llm.model(), turns = messages.len(), input_len = utterance.len(), "chat: exchange started");

        let outcome = tokio::select! {
            biased;
            () = shutdown.cancelled() => Err(ChatError::Cancelled),
            result = self.llm.chat(self.settings.max_tokens, &self.settings.system_prompt, &messages) => {
                match result {
                    Ok(response) => {
                        info!(
                            model = %response.model,
                            input_tokens = response.input_tokens,
                            output_tokens = response.output_tokens,
                            stop_reason = %response.stop_reason,
                            "chat: reply received"
                        );
                        response.text().ok_or(ChatError::EmptyReply)
                    }
                    Err(e) => Err(ChatError::Llm(e)),
                }
            }
        };

        let mut dashboard = dashboard.write().await;
        match outcome {
            Ok(reply) => {
                dashboard.dispatch(Action::AppendTurn(ChatTurn::assistant(reply.clone())))?;
                Ok(ChatExchange { reply, transcript: dashboard.state().transcript.clone() })
            }
            Err(err) => {
                warn!(code = err.error_code(), error = %err, "chat: exchange failed");
                dashboard.dispatch(Action::AppendTurn(ChatTurn::error(err.to_string())))?;
                Err(err)
            }
        }
    }
}

/// Checks the trimmed form; the utterance itself is relayed verbatim.
fn validate(utterance: &str, max_chars: usize) -> Result<(), ChatError> {
    let text = utterance.trim();
    if text.is_empty() {
        return Err(ChatError::InvalidInput("message must not be empty".into()));
    }
    if text.chars().count() > max_chars {
        return Err(ChatError::InvalidInput(format!("message exceeds {max_chars} characters")));
    }
    Ok(())
}

/// Transcript turns sent as model context, error turns excluded.
pub(crate) fn context_messages(state: &DashboardState) -> Vec<Message> {
    state
        .chat_context()
        .filter_map(|turn| match turn.role {
            Role::User => Some(Message::user(turn.content.clone())),
            Role::Assistant => Some(Message::assistant(turn.content.clone())),
            Role::Error => None,
        })
        .collect()
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
