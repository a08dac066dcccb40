mod common;

use serde_json::json;
use sidekick_common::SidekickError;
use sidekick_llm::image::ImageSource;
use sidekick_llm::openai::OpenAiClient;
use sidekick_llm::traits::{LlmClient, Prompt};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion_body(text: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "gpt-4o-2024-08-06",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21 }
    })
}

fn client_for(server: &MockServer) -> OpenAiClient {
    OpenAiClient::with_base_url("sk-test".into(), "gpt-4o".into(), &server.uri())
        .expect("mock server URL should parse")
}

#[tokio::test]
async fn text_prompt_posts_plain_string_content() {
    common::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "messages": [{ "role": "user", "content": "Say Ok" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Ok")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .generate(&Prompt::text("Say Ok"), None, Some(8), Some(0.2))
        .await
        .unwrap();

    assert_eq!(response.text, "Ok");
    assert_eq!(response.model.as_deref(), Some("gpt-4o-2024-08-06"));
    assert_eq!(response.tokens_used, Some(21));
}

#[tokio::test]
async fn image_prompt_posts_a_data_url() {
    common::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": "What is shown?" },
                    { "type": "image_url",
                      "image_url": { "url": "data:image/png;base64,QUJD" } }
                ]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("A test pattern")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let prompt = Prompt::WithImage {
        text: "What is shown?".into(),
        image: ImageSource::Base64 {
            data: "QUJD".into(),
            media_type: "image/png".into(),
        },
    };
    let response = client.generate(&prompt, None, None, None).await.unwrap();
    assert_eq!(response.text, "A test pattern");
}

#[tokio::test]
async fn system_prompt_rides_in_front() {
    common::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                { "role": "system", "content": "Answer in one word." },
                { "role": "user", "content": "Color of the sky?" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Blue")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .generate(
            &Prompt::text("Color of the sky?"),
            Some("Answer in one word."),
            None,
            None,
        )
        .await
        .unwrap();
    assert_eq!(response.text, "Blue");
}

#[tokio::test]
async fn provider_failures_surface_as_provider_errors() {
    common::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error"
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .generate(&Prompt::text("hi"), None, None, None)
        .await
        .unwrap_err();
    match err {
        SidekickError::Provider(message) => assert!(message.contains("Incorrect API key")),
        other => panic!("expected provider error, got {other}"),
    }
}

#[tokio::test]
async fn empty_completions_are_rejected() {
    common::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .generate(&Prompt::text("hi"), None, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SidekickError::Provider(_)));
    assert!(err.to_string().contains("empty completion"));
}

#[tokio::test]
async fn reasoning_models_omit_sampler_knobs() {
    common::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "model": "o1-mini",
            "reasoning_effort": "low"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Done")))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        OpenAiClient::with_base_url("sk-test".into(), "o1-mini".into(), &server.uri()).unwrap();
    client
        .generate(&Prompt::text("think"), None, None, Some(0.9))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("temperature").is_none());
}

#[tokio::test]
async fn health_check_reports_reachability() {
    common::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{ "id": "gpt-4o" }, { "id": "o1-mini" }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.health_check().await.unwrap());
}

#[tokio::test]
async fn health_check_is_false_when_the_endpoint_rejects() {
    common::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(!client.health_check().await.unwrap());
}
