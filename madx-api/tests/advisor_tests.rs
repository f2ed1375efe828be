//! Chat completion client tests against a local server

mod helpers;

use helpers::start_mock_server;
use madx_api::services::{recommend_action, AdvisorConfig, AdvisorError, OpenAiClient};
use serde_json::{json, Value};

fn config_for(base_url: &str) -> AdvisorConfig {
    AdvisorConfig {
        api_key: Some("sk-test".to_string()),
        base_url: base_url.to_string(),
        ..AdvisorConfig::default()
    }
}

#[tokio::test]
async fn test_recommendation_request_shape() {
    let server = start_mock_server(
        200,
        r#"{"choices":[{"message":{"role":"assistant","content":"Škálovat: ROAS je nad cílem."}}]}"#,
    )
    .await;
    let client = OpenAiClient::new(&config_for(&server.base_url)).unwrap();

    let reply = recommend_action(&client, &json!({"id": "c1", "roas": 3.1}))
        .await
        .unwrap();
    assert_eq!(reply, "Škálovat: ROAS je nad cílem.");

    let request = server.single_request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/chat/completions");
    assert_eq!(request.authorization.as_deref(), Some("Bearer sk-test"));

    let sent: Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(sent["model"], "gpt-4");
    assert_eq!(sent["messages"][0]["role"], "user");
    let prompt = sent["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.starts_with("Zde jsou data kampaně:"));
    assert!(prompt.contains("\"roas\": 3.1"));
}

#[tokio::test]
async fn test_api_error_status_is_reported() {
    let server = start_mock_server(401, r#"{"error":{"message":"Incorrect API key"}}"#).await;
    let client = OpenAiClient::new(&config_for(&server.base_url)).unwrap();

    let err = recommend_action(&client, &json!({})).await.unwrap_err();
    match err {
        AdvisorError::Api(status, body) => {
            assert_eq!(status, 401);
            assert!(body.contains("Incorrect API key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_choices_is_parse_error() {
    let server = start_mock_server(200, r#"{"choices":[]}"#).await;
    let client = OpenAiClient::new(&config_for(&server.base_url)).unwrap();

    let err = recommend_action(&client, &json!({})).await.unwrap_err();
    assert!(matches!(err, AdvisorError::Parse(_)));
}
