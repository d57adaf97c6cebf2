use serde_json::json;

use super::*;
use crate::llm::types::LlmError;
use crate::routes::test_support::{call, router};
use crate::state::test_helpers::{ScriptedLlm, test_app_state, text_reply};

#[tokio::test]
async fn post_message_returns_reply_and_transcript() {
    let state = test_app_state(ScriptedLlm::new(vec![text_reply("hi")]));
    let (status, body) = call(router(state), "POST", "/api/chat", Some(json!({ "content": "hello" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "hi");
    assert_eq!(
        body["transcript"],
        json!([
            { "role": "user", "content": "hello" },
            { "role": "assistant", "content": "hi" }
        ])
    );
}

#[tokio::test]
async fn blank_message_is_400() {
    let state = test_app_state(ScriptedLlm::new(vec![]));
    let (status, body) = call(router(state.clone()), "POST", "/api/chat", Some(json!({ "content": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E_INVALID_INPUT");

    let (_, body) = call(router(state), "GET", "/api/chat", None).await;
    assert_eq!(body["transcript"], json!([]));
}

#[tokio::test]
async fn provider_failure_is_502_with_error_turn() {
    let failure = Err(LlmError::ApiResponse { status: 429, body: "slow down".into() });
    let state = test_app_state(ScriptedLlm::new(vec![failure]));
    let (status, body) = call(router(state.clone()), "POST", "/api/chat", Some(json!({ "content": "hello" }))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "E_LLM_ERROR");
    assert_eq!(body["retryable"], true);

    let (_, body) = call(router(state), "GET", "/api/chat", None).await;
    assert_eq!(body["transcript"][0], json!({ "role": "user", "content": "hello" }));
    assert_eq!(body["transcript"][1]["role"], "error");
}

#[test]
fn chat_error_statuses() {
    assert_eq!(chat_error(ChatError::InvalidInput("x".into())).status, StatusCode::BAD_REQUEST);
    assert_eq!(chat_error(ChatError::EmptyReply).status, StatusCode::BAD_GATEWAY);
    assert_eq!(chat_error(ChatError::Cancelled).status, StatusCode::SERVICE_UNAVAILABLE);
}
