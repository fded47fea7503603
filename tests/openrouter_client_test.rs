use health_store_api::config::LlmConfig;
use health_store_api::llm::{
    CompletionRequest, LlmError, OpenRouterClient, TextGenerator, extract_keywords, get_ai_analysis,
};
use httpmock::prelude::*;
use serde_json::json;

fn config(server: &MockServer) -> LlmConfig {
    LlmConfig {
        base_url: server.url("/api/v1/"),
        api_key: "test-key".to_string(),
        model: "test/model".to_string(),
        referer: "http://localhost:5000".to_string(),
        title: "Smart Health Store".to_string(),
        timeout_secs: 5,
    }
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "gen-1",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}}
        ]
    })
}

#[tokio::test]
async fn sends_openai_compatible_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/chat/completions")
                .header("authorization", "Bearer test-key")
                .header("HTTP-Referer", "http://localhost:5000")
                .header("X-Title", "Smart Health Store")
                .json_body_partial(r#"{"model": "test/model", "max_tokens": 50}"#);
            then.status(200).json_body(completion("hello"));
        })
        .await;

    let client = OpenRouterClient::new(&config(&server)).unwrap();
    let request = CompletionRequest::new("system", "user").max_tokens(50);

    let reply = client.complete(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(reply, "hello");
    assert_eq!(client.model_name(), "test/model");
}

#[tokio::test]
async fn missing_choices_is_empty_reply() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/chat/completions");
            then.status(200).json_body(json!({"choices": []}));
        })
        .await;

    let client = OpenRouterClient::new(&config(&server)).unwrap();
    let reply = client
        .complete(&CompletionRequest::new("s", "u"))
        .await
        .unwrap();

    assert_eq!(reply, "");
}

#[tokio::test]
async fn error_status_is_reported() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/chat/completions");
            then.status(401).body("invalid key");
        })
        .await;

    let client = OpenRouterClient::new(&config(&server)).unwrap();
    let err = client
        .complete(&CompletionRequest::new("s", "u"))
        .await
        .unwrap_err();

    match err {
        LlmError::Status { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid key");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn keyword_extraction_over_http() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/chat/completions");
            then.status(200).json_body(completion("Joint, Pain , arthritis"));
        })
        .await;

    let client = OpenRouterClient::new(&config(&server)).unwrap();
    let keywords = extract_keywords(&client, "my knees hurt").await;

    assert_eq!(keywords, vec!["joint", "pain", "arthritis"]);
}

#[tokio::test]
async fn keyword_extraction_survives_outage() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/chat/completions");
            then.status(500);
        })
        .await;

    let client = OpenRouterClient::new(&config(&server)).unwrap();

    assert!(extract_keywords(&client, "tired").await.is_empty());
    assert!(get_ai_analysis(&client, "tired").await.is_err());
}
