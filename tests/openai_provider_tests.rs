//! OpenAI HTTP providers against a local mock server.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use atelier::chat::ChatStatus;
use atelier::config::AtelierConfig;
use atelier::error::AtelierError;
use atelier::models::OpenAiModel;
use atelier::provider::{
    ImageProvider, ModelProvider, OpenAiImageProvider, OpenAiProvider, ProviderRequest,
    ToolDefinition,
};
use atelier::refine::ImageRefinement;
use atelier::types::*;
use atelier::util::retry::RetryPolicy;

fn test_retry_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(1),
        multiplier: 1.0,
    }
}

fn chat_text(text: &str) -> serde_json::Value {
    json!({
        "choices": [{
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15 }
    })
}

fn chat_tool_call(name: &str, arguments: &str) -> serde_json::Value {
    json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_abc",
                    "type": "function",
                    "function": { "name": name, "arguments": arguments }
                }]
            },
            "finish_reason": "tool_calls"
        }]
    })
}

fn user_request(text: &str) -> ProviderRequest {
    ProviderRequest {
        messages: vec![ModelMessage::user(text)],
        settings: GenerationSettings::default(),
        tools: None,
    }
}

#[tokio::test]
async fn chat_completion_returns_text_and_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({ "model": "gpt-4o" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_text("Nice cat.")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(OpenAiModel::Gpt4o, "test-key".into(), Some(server.uri()));
    let response = provider.generate_text(&user_request("hi")).await.unwrap();

    assert_eq!(response.text, "Nice cat.");
    assert_eq!(response.usage.total_tokens, 15);
}

#[tokio::test]
async fn tool_calls_are_parsed_and_tools_advertised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "tools": [{ "type": "function", "function": { "name": "generate_image" } }]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_tool_call("generate_image", r#"{"prompt":"blue cat"}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider =
        OpenAiProvider::new(OpenAiModel::Gpt35Turbo, "test-key".into(), Some(server.uri()));
    let mut request = user_request("draw");
    request.tools = Some(vec![ToolDefinition {
        name: "generate_image".into(),
        description: "Generate image from prompt using DALL-E.".into(),
        parameters: json!({ "type": "object", "properties": { "prompt": { "type": "string" } } }),
    }]);

    let response = provider.generate_text(&request).await.unwrap();

    assert_eq!(response.tool_calls.len(), 1);
    assert_eq!(response.tool_calls[0].id, "call_abc");
    assert_eq!(response.tool_calls[0].arguments, json!({ "prompt": "blue cat" }));
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key provided" }
        })))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(OpenAiModel::Gpt4o, "bad".into(), Some(server.uri()));
    let err = provider.generate_text(&user_request("hi")).await.unwrap_err();

    assert!(
        matches!(err, AtelierError::Authentication(ref message) if message == "Incorrect API key provided")
    );
}

#[tokio::test]
async fn failures_are_not_retried_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(OpenAiModel::Gpt4o, "test-key".into(), Some(server.uri()));
    let err = provider.generate_text(&user_request("hi")).await.unwrap_err();

    assert!(matches!(err, AtelierError::Api { status: 500, .. }));
}

#[tokio::test]
async fn opt_in_retry_recovers_from_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "slow down" }
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_text("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(OpenAiModel::Gpt4o, "test-key".into(), Some(server.uri()))
        .with_retry_policy(test_retry_policy(3));
    let response = provider.generate_text(&user_request("hi")).await.unwrap();

    assert_eq!(response.text, "ok");
}

#[tokio::test]
async fn image_generation_sends_dalle_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "dall-e-3",
            "prompt": "blue cat chasing a mouse",
            "n": 1,
            "size": "1024x1024",
            "style": "vivid",
            "quality": "standard"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1,
            "data": [{
                "url": "https://images.example/cat.png",
                "revised_prompt": "A blue British shorthair chasing a mouse"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiImageProvider::new_with_base_url("test-key".into(), server.uri())
        .with_retry_policy(test_retry_policy(1));
    let images = provider
        .generate_images(&ImageGenerationRequest::new(
            "blue cat chasing a mouse",
            ImageOptions::default(),
        ))
        .await
        .unwrap();

    assert_eq!(images.len(), 1);
    assert_eq!(images[0].url, "https://images.example/cat.png");
    assert_eq!(
        images[0].revised_prompt.as_deref(),
        Some("A blue British shorthair chasing a mouse")
    );
}

#[tokio::test]
async fn b64_images_become_data_urls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .and(body_partial_json(json!({ "response_format": "b64_json" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "b64_json": "aGVsbG8=" }]
        })))
        .mount(&server)
        .await;

    let provider = OpenAiImageProvider::new_with_base_url("test-key".into(), server.uri());
    let options = ImageOptions {
        response_format: ImageResponseFormat::B64Json,
        ..ImageOptions::default()
    };
    let images = provider
        .generate_images(&ImageGenerationRequest::new("cat", options))
        .await
        .unwrap();

    assert_eq!(images[0].url, "data:image/png;base64,aGVsbG8=");
}

#[tokio::test]
async fn empty_image_list_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let provider = OpenAiImageProvider::new_with_base_url("test-key".into(), server.uri());
    let err = provider
        .generate_images(&ImageGenerationRequest::new("cat", ImageOptions::default()))
        .await
        .unwrap_err();

    assert!(matches!(err, AtelierError::InvalidState(_)));
}

#[tokio::test]
async fn blank_prompt_is_rejected_before_any_request() {
    let provider = OpenAiImageProvider::new_with_base_url("test-key".into(), "http://127.0.0.1:9");
    let err = provider
        .generate_images(&ImageGenerationRequest::new("  ", ImageOptions::default()))
        .await
        .unwrap_err();

    assert!(matches!(err, AtelierError::InvalidArgument(_)));
}

#[tokio::test]
async fn full_run_against_mock_openai() {
    let server = MockServer::start().await;
    let image_url = format!("{}/files/cat.png", server.uri());

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "model": "gpt-3.5-turbo" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_tool_call("generate_image", r#"{"prompt":"blue cat chasing a mouse"}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "model": "gpt-4o" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_text("[APPROVE]")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "url": image_url }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/cat.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"\x89PNG fake".to_vec())
                .insert_header("content-type", "image/png"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = AtelierConfig::default().with_api_key("test-key");
    config.base_url = Some(server.uri());
    config.image_path = dir.path().join("background.png");

    let outcome = ImageRefinement::from_config(&config)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.status, ChatStatus::Approved);
    assert_eq!(outcome.rounds, 2);
    assert_eq!(outcome.last_image.unwrap().url, image_url);
    assert_eq!(std::fs::read(&config.image_path).unwrap(), b"\x89PNG fake");
}
