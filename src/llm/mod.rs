//! LLM: completion API adapter for the data insights chat.
//!
//! DESIGN
//! ======
//! Configured from environment variables. `LlmClient` pairs the configured
//! model with an OpenAI-compatible client; the rest of the server only sees
//! the [`LlmChat`] trait so tests can swap in a mock.

pub mod config;
pub mod openai;
pub mod types;

use config::LlmConfig;
pub use types::LlmChat;
use types::{ChatResponse, LlmError, Message};

/// Concrete LLM client for the configured completion endpoint.
pub struct LlmClient {
    inner: openai::OpenAiClient,
    model: String,
}

impl LlmClient {
    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner =
            openai::OpenAiClient::new(config.api_key, config.openai_mode, config.openai_base_url, config.timeouts)?;
        Ok(Self { inner, model: config.model })
    }
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    async fn chat(&self, max_tokens: u32, system: &str, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        self.inner.chat(&self.model, max_tokens, system, messages).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
