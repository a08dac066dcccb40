mod common;

use serde_json::json;
use sidekick_common::SidekickError;
use sidekick_web::brave::BraveSearchClient;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> BraveSearchClient {
    BraveSearchClient::with_base_url("brave-test".into(), &server.uri())
        .expect("mock server URL should parse")
}

#[tokio::test]
async fn results_map_in_display_order() {
    common::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/res/v1/web/search"))
        .and(header("x-subscription-token", "brave-test"))
        .and(query_param("q", "rust web scraping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "search",
            "web": {
                "results": [
                    {
                        "title": "Scraping in Rust",
                        "url": "https://first.example/post",
                        "description": "A walkthrough."
                    },
                    {
                        "title": "The scraper crate",
                        "url": "https://second.example/docs"
                    }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let hits = client_for(&server)
        .search("rust web scraping", None)
        .await
        .unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].title, "Scraping in Rust");
    assert_eq!(hits[0].url, "https://first.example/post");
    assert_eq!(hits[0].snippet, "A walkthrough.");
    assert_eq!(hits[1].title, "The scraper crate");
    assert_eq!(hits[1].snippet, "");
}

#[tokio::test]
async fn limit_rides_the_query_string_and_is_capped() {
    common::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/res/v1/web/search"))
        .and(query_param("count", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "web": { "results": [] } })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).search("anything", Some(5)).await.unwrap();
    server.reset().await;

    Mock::given(method("GET"))
        .and(path("/res/v1/web/search"))
        .and(query_param("count", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "web": { "results": [] } })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).search("anything", Some(50)).await.unwrap();
}

#[tokio::test]
async fn no_matches_is_an_empty_vec() {
    common::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/res/v1/web/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "search",
            "query": { "original": "xzqy" }
        })))
        .mount(&server)
        .await;

    let hits = client_for(&server).search("xzqy", Some(3)).await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn api_failures_surface_as_provider_errors() {
    common::init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/res/v1/web/search"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": { "message": "subscription token invalid" }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .search("anything", None)
        .await
        .unwrap_err();
    match err {
        SidekickError::Provider(message) => {
            assert!(message.contains("subscription token invalid"))
        }
        other => panic!("expected provider error, got {other}"),
    }
}

#[test]
fn missing_key_is_a_config_error() {
    let settings = sidekick_common::Settings::default();
    let err = BraveSearchClient::from_settings(&settings).unwrap_err();
    assert!(matches!(err, SidekickError::Config(_)));
    assert!(err.to_string().contains("BRAVE_API_KEY"));
}
