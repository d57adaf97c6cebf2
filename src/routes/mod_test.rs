use axum::http::StatusCode;

use super::test_support::{call, router};
use crate::state::test_helpers::{ScriptedLlm, test_app_state};

#[tokio::test]
async fn healthz_ok() {
    let state = test_app_state(ScriptedLlm::new(vec![]));
    let (status, _) = call(router(state), "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_path_falls_through_to_static_files() {
    let state = test_app_state(ScriptedLlm::new(vec![]));
    let (status, _) = call(router(state), "GET", "/no-such-page.html", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
