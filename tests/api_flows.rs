mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use barterbrain::ai::common::GeminiClient;
use barterbrain::db::Database;
use barterbrain::tests::util::init_test_db;
use barterbrain::{api_router, ApiConfig, AppState};
use common::{gemini_for, reply, GENERATE_PATH};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(db: Database, gemini: GeminiClient) -> Router {
    api_router(
        AppState { db, gemini },
        ApiConfig {
            rate_limit_per_second: None,
        },
    )
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn valuation_requires_title_or_description() {
    let app = app(init_test_db().await, GeminiClient::new(None));
    let (status, body) = post(app, "/ai/metadataValuation", json!({ "title": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "provide title or description" }));
}

#[tokio::test]
async fn valuation_returns_model_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains("Product link: https://shop.example/desk."))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply(
            "```json\n{\"value\": 45.0, \"confidence\": 0.8, \"breakdown\": {\"basePrice\": 100, \"ageFactor\": 0.6, \"conditionFactor\": 0.75, \"brandFactor\": 1.0, \"accessoryValue\": 0}, \"explanation\": \"Solid desk.\"}\n```",
        )))
        .mount(&server)
        .await;

    let app = app(init_test_db().await, gemini_for(&server));
    let (status, body) = post(
        app,
        "/ai/metadataValuation",
        json!({ "title": "Desk", "productLink": "https://shop.example/desk" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], json!(45.0));
    assert_eq!(body["breakdown"]["basePrice"], json!(100.0));
    assert_eq!(body["explanation"], "Solid desk.");
}

#[tokio::test]
async fn valuation_reports_malformed_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("not json at all")))
        .mount(&server)
        .await;

    let app = app(init_test_db().await, gemini_for(&server));
    let (status, body) = post(app, "/ai/metadataValuation", json!({ "description": "chair" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Gemini error");
    assert!(body["details"].as_str().unwrap().contains("malformed"));
}

#[tokio::test]
async fn negotiation_validates_items() {
    let app = app(init_test_db().await, GeminiClient::new(None));
    let (status, body) = post(
        app,
        "/ai/negotiationCoach",
        json!({
            "chatTranscript": [{ "message": "hi", "isCurrentUser": true }],
            "userItem": { "title": "Bike" },
            "otherUserItem": {}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "otherUserItem with title is required");
}

#[tokio::test]
async fn negotiation_returns_advice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains("[THEM]: Add $10?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply(
            r#"{"suggestionPhrase":"How about $5?","suggestedCashAdjustment":5,"explanation":"Meet halfway.","negotiationTips":["Stay polite","Cite condition","Offer pickup"]}"#,
        )))
        .mount(&server)
        .await;

    let app = app(init_test_db().await, gemini_for(&server));
    let (status, body) = post(
        app,
        "/ai/negotiationCoach",
        json!({
            "chatTranscript": [
                { "message": "Swap my bike for your desk?", "isCurrentUser": true },
                { "message": "Add $10?", "isCurrentUser": false }
            ],
            "userItem": { "title": "Bike", "estimatedValue": 70 },
            "otherUserItem": { "title": "Desk", "estimatedValue": 80 },
            "currentOffer": { "cashAdjustment": 10, "status": "pending" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggestionPhrase"], "How about $5?");
    assert_eq!(body["suggestedCashAdjustment"], json!(5.0));
    assert_eq!(body["negotiationTips"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn negotiation_without_model_is_server_error() {
    let app = app(init_test_db().await, GeminiClient::new(None));
    let (status, body) = post(
        app,
        "/ai/negotiationCoach",
        json!({
            "chatTranscript": [{ "message": "hi" }],
            "userItem": { "title": "Bike" },
            "otherUserItem": { "title": "Desk" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Negotiation coach error");
}

#[tokio::test]
async fn negotiation_accepts_loosely_typed_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains("- Cash adjustment: $10 (user pays)"))
        .and(body_string_contains("[YOU]: deal?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply(
            r#"{"suggestionPhrase":"Sounds fair!","suggestedCashAdjustment":null,"negotiationTips":null}"#,
        )))
        .mount(&server)
        .await;

    let body = json!({
        "chatTranscript": [
            { "message": "hi", "isCurrentUser": null },
            { "message": "deal?", "isCurrentUser": 1 }
        ],
        "userItem": { "title": "Bike", "condition": 4 },
        "otherUserItem": { "title": "Desk", "description": false },
        "currentOffer": { "cashAdjustment": "10", "status": 1 }
    });

    let (status, reply_body) = post(
        app(init_test_db().await, gemini_for(&server)),
        "/ai/negotiationCoach",
        body.clone(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply_body, json!({ "suggestionPhrase": "Sounds fair!" }));

    let (status, reply_body) = post(
        app(init_test_db().await, GeminiClient::new(None)),
        "/ai/negotiationCoach",
        body,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply_body["error"], "Negotiation coach error");
}

#[tokio::test]
async fn confirm_swap_writes_impact_to_store() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains("environmental expert"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("45.678")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains("saved 45.68 kg CO₂ and $60"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply(
            "Swapping your laptop kept 45.68 kg of CO₂\nout of the air!",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let db = init_test_db().await;
    db.put_swap(
        "swap-1",
        &json!({
            "estimatedNewCost": 120,
            "itemName": "laptop",
            "proposerItemValue": 50,
            "proposerCash": 10,
            "status": "accepted"
        }),
    )
    .await
    .unwrap();

    let app = app(db.clone(), gemini_for(&server));
    let (status, body) = post(app, "/swaps/confirm", json!({ "swapId": "swap-1" })).await;
    assert_eq!(status, StatusCode::OK);
    let impact = "Swapping your laptop kept 45.68 kg of CO₂ out of the air!";
    assert_eq!(
        body,
        json!({ "success": true, "swapId": "swap-1", "sustainabilityImpact": impact })
    );

    let stored = db.get_swap("swap-1").await.unwrap().unwrap();
    assert_eq!(stored["sustainabilityImpact"], impact);
    assert_eq!(stored["status"], "accepted");
}

#[tokio::test]
async fn confirm_inline_swap_without_model_uses_fallbacks() {
    let app = app(init_test_db().await, GeminiClient::new(None));
    let (status, body) = post(
        app,
        "/swaps/confirm",
        json!({ "swap": { "newItem": { "estimatedValue": 250, "title": "desk" }, "offerValue": 150 } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "swapId": null,
            "sustainabilityImpact": "You saved about 20 kg CO₂ and $100 by swapping instead of buying new."
        })
    );
}

#[tokio::test]
async fn confirm_without_cost_stores_null() {
    let db = init_test_db().await;
    db.put_swap("swap-2", &json!({ "itemName": "table" }))
        .await
        .unwrap();

    let app = app(db.clone(), GeminiClient::new(None));
    let (status, body) = post(app, "/swaps/confirm", json!({ "swapId": "swap-2" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["sustainabilityImpact"], Value::Null);

    let stored = db.get_swap("swap-2").await.unwrap().unwrap();
    assert_eq!(stored["sustainabilityImpact"], Value::Null);
    assert!(stored.as_object().unwrap().contains_key("sustainabilityImpact"));
}

#[tokio::test]
async fn confirm_unknown_swap_reports_failure() {
    let app = app(init_test_db().await, GeminiClient::new(None));
    let (status, body) = post(
        app,
        "/swaps/confirm",
        json!({ "swapId": "missing", "swap": { "estimatedNewCost": 10 } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["sustainabilityImpact"], Value::Null);
    assert!(body["error"].as_str().unwrap().contains("swaps/missing"));
}
