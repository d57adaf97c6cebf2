use super::*;
use config::{LlmTimeouts, OpenAiApiMode};

fn config(model: &str) -> LlmConfig {
    LlmConfig {
        api_key: "secret".into(),
        model: model.into(),
        openai_mode: OpenAiApiMode::ChatCompletions,
        openai_base_url: config::DEFAULT_OPENAI_BASE_URL.into(),
        timeouts: LlmTimeouts { request_secs: 5, connect_secs: 1 },
    }
}

#[test]
fn client_reports_configured_model() {
    let client = LlmClient::from_config(config("gpt-4o-mini")).unwrap();
    assert_eq!(client.model(), "gpt-4o-mini");
}

#[test]
fn provider_variable_is_not_consulted() {
    let lookup = |key: &str| match key {
        "LLM_PROVIDER" => Some("other".to_owned()),
        "LLM_API_KEY_ENV" => Some("TEST_KEY".to_owned()),
        "TEST_KEY" => Some("secret".to_owned()),
        _ => None,
    };
    let cfg = LlmConfig::from_lookup(lookup).unwrap();
    assert_eq!(cfg.model, config::DEFAULT_LLM_MODEL);
    assert_eq!(LlmClient::from_config(cfg).unwrap().model(), "gpt-3.5-turbo");
}
