//! Tests for the OpenAI provider against a local stand-in for the API.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use compound_service::models::prompt::WATER_EXAMPLE;
use compound_service::services::providers::openai::{OpenAiConfig, OpenAiTextProvider};
use compound_service::services::providers::{
    FinishReason, GenerationParams, ProviderError, TextProvider,
};
use secrecy::Secret;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Clone)]
struct FakeApi {
    status: StatusCode,
    reply: Value,
    seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn chat_completions(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    api.seen.lock().unwrap().push((auth, body));
    (api.status, Json(api.reply.clone()))
}

/// Serves the fake API on a random port and returns its base URL.
async fn spawn_fake_api(api: FakeApi) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let router = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .with_state(api);

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    format!("http://127.0.0.1:{}/v1", port)
}

fn fake_api(status: StatusCode, reply: Value) -> FakeApi {
    FakeApi {
        status,
        reply,
        seen: Arc::new(Mutex::new(Vec::new())),
    }
}

fn completion(content: Value, finish_reason: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": finish_reason
        }],
        "usage": {"prompt_tokens": 120, "completion_tokens": 80, "total_tokens": 200}
    })
}

fn provider(base_url: String) -> OpenAiTextProvider {
    OpenAiTextProvider::new(OpenAiConfig {
        api_key: Secret::new("sk-test".to_string()),
        base_url,
    })
}

fn params() -> GenerationParams {
    GenerationParams {
        model: "gpt-4".to_string(),
        temperature: Some(0.7),
    }
}

#[tokio::test]
async fn returns_first_choice_content_and_usage() {
    let api = fake_api(StatusCode::OK, completion(json!(WATER_EXAMPLE), "stop"));
    let seen = api.seen.clone();
    let base_url = spawn_fake_api(api).await;

    let response = provider(base_url)
        .generate("describe water", &params())
        .await
        .unwrap();

    assert_eq!(response.text.as_deref(), Some(WATER_EXAMPLE));
    assert_eq!(response.input_tokens, 120);
    assert_eq!(response.output_tokens, 80);
    assert_eq!(response.finish_reason, FinishReason::Complete);

    let calls = seen.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (auth, body) = &calls[0];
    assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    assert_eq!(body["model"], "gpt-4");
    assert_eq!(body["messages"], json!([{"role": "user", "content": "describe water"}]));
    assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
}

#[tokio::test]
async fn too_many_requests_is_rate_limited() {
    let base_url = spawn_fake_api(fake_api(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"message": "slow down"}}),
    ))
    .await;

    let err = provider(base_url).generate("x", &params()).await.unwrap_err();
    assert!(matches!(err, ProviderError::RateLimited));
}

#[tokio::test]
async fn other_error_statuses_are_api_errors() {
    let base_url = spawn_fake_api(fake_api(
        StatusCode::UNAUTHORIZED,
        json!({"error": {"message": "invalid api key"}}),
    ))
    .await;

    match provider(base_url).generate("x", &params()).await {
        Err(ProviderError::ApiError(message)) => assert!(message.contains("401")),
        other => panic!("expected ApiError, got {:?}", other.map(|r| r.text)),
    }
}

#[tokio::test]
async fn no_choices_is_empty_response() {
    let base_url = spawn_fake_api(fake_api(StatusCode::OK, json!({"choices": []}))).await;

    let err = provider(base_url).generate("x", &params()).await.unwrap_err();
    assert!(matches!(err, ProviderError::EmptyResponse));
}

#[tokio::test]
async fn null_content_yields_no_text() {
    let base_url =
        spawn_fake_api(fake_api(StatusCode::OK, completion(Value::Null, "stop"))).await;

    let response = provider(base_url).generate("x", &params()).await.unwrap();
    assert!(response.text.is_none());
}

#[tokio::test]
async fn content_filter_is_an_error() {
    let base_url = spawn_fake_api(fake_api(
        StatusCode::OK,
        completion(json!(""), "content_filter"),
    ))
    .await;

    let err = provider(base_url).generate("x", &params()).await.unwrap_err();
    assert!(matches!(err, ProviderError::ContentFiltered));
}

#[tokio::test]
async fn unreachable_api_is_a_network_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = provider(format!("http://127.0.0.1:{}/v1", port))
        .generate("x", &params())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::NetworkError(_)));
}
