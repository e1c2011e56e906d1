use std::time::Duration;

use namecheck_config::ServerConfig;
use namecheck_core::{ModelId, PredictionError};
use namecheck_llm::{build_prompt, Completion, LlmClient, SYSTEM_PROMPT};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> LlmClient {
    LlmClient::from_config(&ServerConfig::new("sk-test").with_api_base(server.uri()))
}

fn completion_body(content: Value) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 120, "completion_tokens": 9, "total_tokens": 129}
    })
}

#[tokio::test]
async fn sends_configured_request_and_reads_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "max_completion_tokens": 60,
            "temperature": 0.0
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body(json!("  {\"prediction\": \"Realistic\"}\n"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let prompt = build_prompt("Aisha Khan");
    let reply = client(&server)
        .complete(ModelId::Gpt4oMini, SYSTEM_PROMPT, &prompt)
        .await
        .unwrap();

    assert_eq!(reply.content, r#"{"prediction": "Realistic"}"#);
    assert_eq!(reply.metrics.input_tokens, 120);
    assert_eq!(reply.metrics.output_tokens, 9);

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], prompt.as_str());
}

#[tokio::test]
async fn slow_provider_hits_timeout_ceiling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body(json!("Realistic")))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let ceiling = Duration::from_millis(200);
    let config = ServerConfig::new("sk-test")
        .with_api_base(server.uri())
        .with_upstream_timeout(ceiling);

    let err = LlmClient::from_config(&config)
        .complete(ModelId::Gpt41, SYSTEM_PROMPT, "John")
        .await
        .unwrap_err();
    assert_eq!(err, PredictionError::Timeout(ceiling));
}

#[tokio::test]
async fn provider_error_is_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"message": "boom", "type": "server_error", "param": null, "code": null}
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .complete(ModelId::Gpt41Mini, SYSTEM_PROMPT, "John")
        .await
        .unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(&err, PredictionError::Upstream(msg) if msg.contains("boom")));
}

#[tokio::test]
async fn reply_without_content_is_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(Value::Null)))
        .mount(&server)
        .await;

    let err = client(&server)
        .complete(ModelId::Gpt41Nano, SYSTEM_PROMPT, "John")
        .await
        .unwrap_err();
    assert_eq!(err, PredictionError::Upstream("No response content".into()));
}
