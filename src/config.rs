//! Process configuration parsed from environment variables.
//!
//! Read once at startup. Any error here is fatal: the server refuses to
//! start rather than run with a half-understood configuration.

use std::path::PathBuf;
use std::str::FromStr;

use crate::dashboard::DetailVisibility;
use crate::llm::config::LlmConfig;
use crate::llm::types::LlmError;
use crate::services::chat::ChatSettings;
use crate::services::loader::DataSource;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SALARIES_CSV: &str = "data/salaries.csv";
pub const DEFAULT_WEBSITE_DIR: &str = "website";
pub const DEFAULT_CHAT_MAX_INPUT_CHARS: usize = 4000;
pub const DEFAULT_CHAT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_DATA_FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl crate::error::ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidValue { .. } => "E_CONFIG_INVALID",
            Self::Llm(e) => e.error_code(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_source: DataSource,
    pub website_dir: PathBuf,
    pub detail_visibility: DetailVisibility,
    pub data_fetch_timeout_secs: u64,
    pub chat: ChatSettings,
    pub llm: LlmConfig,
}

impl AppConfig {
    /// # Errors
    ///
    /// See [`AppConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the full configuration from a variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unparsable number or an
    /// unknown `DETAIL_VISIBILITY`, and [`ConfigError::Llm`] when the LLM
    /// settings are incomplete (including a missing API key).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;

        let data_source = DataSource::parse(
            lookup("SALARIES_CSV")
                .filter(|v| !v.trim().is_empty())
                .as_deref()
                .unwrap_or(DEFAULT_SALARIES_CSV),
        );
        let website_dir = lookup("WEBSITE_DIR").map_or_else(|| PathBuf::from(DEFAULT_WEBSITE_DIR), PathBuf::from);

        let detail_visibility = match lookup("DETAIL_VISIBILITY") {
            None => DetailVisibility::default(),
            Some(raw) => DetailVisibility::parse(raw.trim())
                .ok_or(ConfigError::InvalidValue { key: "DETAIL_VISIBILITY", value: raw })?,
        };

        let chat = ChatSettings {
            max_input_chars: parse_or(&lookup, "CHAT_MAX_INPUT_CHARS", DEFAULT_CHAT_MAX_INPUT_CHARS)?,
            max_tokens: parse_or(&lookup, "CHAT_MAX_TOKENS", DEFAULT_CHAT_MAX_TOKENS)?,
            system_prompt: lookup("CHAT_SYSTEM_PROMPT").unwrap_or_default(),
        };

        let data_fetch_timeout_secs = parse_or(&lookup, "DATA_FETCH_TIMEOUT_SECS", DEFAULT_DATA_FETCH_TIMEOUT_SECS)?;
        let llm = LlmConfig::from_lookup(&lookup)?;

        Ok(Self { port, data_source, website_dir, detail_visibility, data_fetch_timeout_secs, chat, llm })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
