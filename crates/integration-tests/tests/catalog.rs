mod harness;

use axum::http::StatusCode;
use harness::config::ConfigBuilder;
use harness::mock_ollama::MockOllama;
use kiln_ollama::{AUTO_MODEL, OllamaError};

#[tokio::test]
async fn auto_selects_most_recent_model() {
    let mock = MockOllama::builder()
        .model("llama3.1:8b", "2024-07-23T10:00:00Z")
        .model("qwen2.5:7b", "2024-09-20T08:15:00-04:00")
        .model("mistral:7b", "2024-09-20T12:14:59Z")
        .fragments(&["hi"])
        .start()
        .await
        .unwrap();
    let client = ConfigBuilder::new(&mock.base_url()).client();

    assert_eq!(client.resolve_model(AUTO_MODEL).await.unwrap(), "qwen2.5:7b");

    client.chat("p", "").await.unwrap();
    assert_eq!(mock.chat_requests()[0]["model"], "qwen2.5:7b");
    assert_eq!(mock.tags_count(), 2);
}

#[tokio::test]
async fn equal_timestamps_keep_catalog_order() {
    let mock = MockOllama::builder()
        .model("first:latest", "2024-05-01T00:00:00Z")
        .model("second:latest", "2024-05-01T00:00:00Z")
        .start()
        .await
        .unwrap();
    let client = ConfigBuilder::new(&mock.base_url()).client();

    assert_eq!(client.resolve_model("ollama").await.unwrap(), "first:latest");
}

#[tokio::test]
async fn explicit_model_never_queries_catalog() {
    let mock = MockOllama::builder().fragments(&["ok"]).start().await.unwrap();
    let client = ConfigBuilder::new(&mock.base_url()).client();

    client.chat("p", "not-installed:1b").await.unwrap();

    assert_eq!(mock.tags_count(), 0);
    assert_eq!(mock.chat_requests()[0]["model"], "not-installed:1b");
}

#[tokio::test]
async fn empty_catalog_fails_before_chat() {
    let mock = MockOllama::builder().start().await.unwrap();
    let client = ConfigBuilder::new(&mock.base_url()).client();

    let err = client.chat("p", AUTO_MODEL).await.unwrap_err();

    assert!(matches!(err, OllamaError::NoModelsAvailable));
    assert_eq!(mock.chat_count(), 0);
}

#[tokio::test]
async fn failing_catalog_is_unavailable() {
    let mock = MockOllama::builder()
        .tags_status(StatusCode::SERVICE_UNAVAILABLE)
        .start()
        .await
        .unwrap();
    let client = ConfigBuilder::new(&mock.base_url()).client();

    let err = client.list_models().await.unwrap_err();

    match err {
        OllamaError::CatalogUnavailable(message) => assert!(message.contains("503")),
        other => panic!("expected CatalogUnavailable, got {other:?}"),
    }
    assert_eq!(mock.chat_count(), 0);
}

#[tokio::test]
async fn catalog_entries_are_fully_decoded() {
    let mock = MockOllama::builder()
        .model("llama3.1:8b", "2024-07-23T10:00:00.123456789+02:00")
        .start()
        .await
        .unwrap();
    let client = ConfigBuilder::new(&mock.base_url()).client();

    let models = client.list_models().await.unwrap();

    assert_eq!(models.len(), 1);
    let entry = &models[0];
    assert_eq!(entry.digest, "sha256:llama3.1:8b");
    assert_eq!(entry.details.parameter_size, "8.0B");
    assert_eq!(entry.modified_at.unwrap().to_string(), "2024-07-23T08:00:00.123456789Z");
}
