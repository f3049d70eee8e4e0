use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use httpmock::prelude::*;
use price_my_car::adapters::http::router;
use price_my_car::app::build_pipeline;
use price_my_car::AppConfig;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn mock_completion<'a>(server: &'a MockServer, content: &str) -> httpmock::Mock<'a> {
    let content = content.to_string();
    server.mock(move |when, then| {
        when.method(POST)
            .path("/chat/completions")
            .header("Authorization", "Bearer sk-test");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "choices": [{"message": {"role": "assistant", "content": content}}]
            }));
    })
}

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig::from_toml_str(&format!(
        r#"
[llm]
api_key = "sk-test"
base_url = "{}"
timeout_seconds = 5
"#,
        server.base_url()
    ))
    .unwrap()
}

async fn post_listing(config: &AppConfig, body: Value) -> (StatusCode, Value) {
    let pipeline = build_pipeline(config).unwrap();
    let response = router(Arc::new(pipeline))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/price-car")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_price_car_success() {
    let server = MockServer::start();
    let api_mock = mock_completion(&server, r#"{"make": "Honda", "model": "Accord"}"#);

    let (status, body) = post_listing(
        &config_for(&server),
        json!({"title": "Selling a 2007 Honda Accord", "description": "It's a reliable car."}),
    )
    .await;

    api_mock.assert();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["make"], "Honda");
    assert_eq!(body["model"], "Accord");
    assert_eq!(body["price"], 4750);
}

#[tokio::test]
async fn test_price_car_llm_fails_to_extract() {
    let server = MockServer::start();
    mock_completion(&server, r#"{"make": null, "model": null}"#);

    let (status, body) = post_listing(
        &config_for(&server),
        json!({"title": "Looking for a friend", "description": "Must be nice"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("Could not extract a valid make and model"));
}

#[tokio::test]
async fn test_price_car_pricing_not_found() {
    let server = MockServer::start();
    mock_completion(&server, r#"{"make": "Tesla", "model": "Model S"}"#);

    let (status, body) = post_listing(
        &config_for(&server),
        json!({"title": "Selling a Tesla", "description": "It's electric!"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("Pricing for make 'Tesla' and model 'Model S' is not available"));
    assert_eq!(body["make"], "Tesla");
    assert_eq!(body["model"], "Model S");
}

#[tokio::test]
async fn test_price_car_garbled_model_output_is_500() {
    let server = MockServer::start();
    mock_completion(&server, "I think this is probably a Honda?");

    let (status, body) = post_listing(
        &config_for(&server),
        json!({"title": "Honda for sale", "description": "Good condition"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "model_output_error");
    assert!(!body.to_string().contains("probably a Honda"));
}

#[tokio::test]
async fn test_price_car_api_outage_is_generic_500() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(503).body("upstream overloaded: shard 7");
    });

    let (status, body) = post_listing(
        &config_for(&server),
        json!({"title": "Ford Focus", "description": "2010, manual"}),
    )
    .await;

    api_mock.assert();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal_error");
    assert!(!body.to_string().contains("shard 7"));
}

#[tokio::test]
async fn test_price_car_empty_title_never_calls_model() {
    let server = MockServer::start();
    let api_mock = mock_completion(&server, r#"{"make": "Honda", "model": "Accord"}"#);

    let (status, body) = post_listing(
        &config_for(&server),
        json!({"title": "", "description": "It's a reliable car."}),
    )
    .await;

    api_mock.assert_hits(0);
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "malformed_input");
    assert_eq!(body["detail"][0]["field"], "title");
}

#[tokio::test]
async fn test_price_car_uses_configured_price_table() {
    let server = MockServer::start();
    mock_completion(&server, r#"{"make": "TESLA", "model": " Model  S "}"#);

    let config = AppConfig::from_toml_str(&format!(
        r#"
[llm]
api_key = "sk-test"
base_url = "{}"

[[pricing.entries]]
make = "Tesla"
model = "Model S"
price = 30000
"#,
        server.base_url()
    ))
    .unwrap();

    let (status, body) = post_listing(
        &config,
        json!({"title": "Selling a Tesla", "description": "It's electric!"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["make"], "TESLA");
    assert_eq!(body["model"], "Model  S");
    assert_eq!(body["price"], 30000);
}
