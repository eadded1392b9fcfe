//! End-to-end tests for the storefront HTTP API.
//!
//! Every test boots its own storefront, so they can run in parallel.

#![allow(clippy::unwrap_used)]

use donut_market_integration_tests::{
    GOOD_CODE, MockCompanion, Relay, TestApp, spawn_mock_discord, ticket_body,
};
use reqwest::{StatusCode, header};
use serde_json::{Value, json};

async fn file_drop_app() -> TestApp {
    let discord = spawn_mock_discord().await;
    TestApp::spawn(Relay::FileDrop, &format!("http://{discord}")).await
}

// =============================================================================
// Health & Static Pages
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = file_drop_app().await;

    let response = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_storefront_pages_are_served() {
    let app = file_drop_app().await;

    for path in ["/", "/replica.html", "/stores", "/login.html", "/policy"] {
        let response = app.client.get(app.url(path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"), "{path}: {content_type}");
    }

    let script = app.client.get(app.url("/js/script.js")).send().await.unwrap();
    assert_eq!(script.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = file_drop_app().await;

    let response = app.client.get(app.url("/nope")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "success": false, "error": "Route not found" }));
}

// =============================================================================
// Tickets
// =============================================================================

#[tokio::test]
async fn test_create_ticket_rejects_missing_fields() {
    let app = file_drop_app().await;

    let mut body = ticket_body("TX-400");
    body.as_object_mut().unwrap().remove("buyer");

    let response = app
        .client
        .post(app.url("/api/create-ticket"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Missing required fields");
    assert!(std::fs::read_dir(app.tickets.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_create_ticket_file_drop_writes_ticket() {
    let app = file_drop_app().await;

    let response = app
        .client
        .post(app.url("/api/create-ticket"))
        .json(&ticket_body("TX-1001"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Ticket created successfully");
    assert_eq!(body["transactionId"], "TX-1001");

    let written = std::fs::read_to_string(app.tickets.path().join("ticket_TX-1001.json")).unwrap();
    let ticket: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(ticket["buyer"], "Steve");
    assert_eq!(ticket["items"][0]["amount"], "100M");
}

#[tokio::test]
async fn test_create_ticket_reaches_companion() {
    let discord = spawn_mock_discord().await;
    let (companion, bot_url) = MockCompanion::spawn().await;
    let app = TestApp::spawn(Relay::Webhook(bot_url), &format!("http://{discord}")).await;

    let response = app
        .client
        .post(app.url("/api/create-ticket"))
        .json(&ticket_body("TX-2002"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Ticket created successfully");
    assert_eq!(body["ticketData"]["channel"], "ticket-0001");

    let received = companion.received().await;
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["transactionId"], "TX-2002");
    assert_eq!(received[0]["discord"], "steve#0001");
}

#[tokio::test]
async fn test_create_ticket_missing_field_never_reaches_companion() {
    let discord = spawn_mock_discord().await;
    let (companion, bot_url) = MockCompanion::spawn().await;
    let app = TestApp::spawn(Relay::Webhook(bot_url), &format!("http://{discord}")).await;

    let mut body = ticket_body("TX-2003");
    body["items"] = Value::Null;

    let response = app
        .client
        .post(app.url("/api/create-ticket"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "success": false, "error": "Missing required fields" }));
    assert!(companion.received().await.is_empty());
}

#[tokio::test]
async fn test_create_ticket_forwards_unusual_values_unchanged() {
    let discord = spawn_mock_discord().await;
    let (companion, bot_url) = MockCompanion::spawn().await;
    let app = TestApp::spawn(Relay::Webhook(bot_url), &format!("http://{discord}")).await;

    let submitted = json!({
        "buyer": "Steve",
        "discord": "steve#0001",
        "transactionId": "ORDER #42",
        "totalAmount": true,
        "items": ["Elytra x1"],
    });

    let response = app
        .client
        .post(app.url("/api/create-ticket"))
        .json(&submitted)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Ticket created successfully");
    assert_eq!(body["transactionId"], "ORDER #42");
    assert_eq!(companion.received().await, vec![submitted]);
}

#[tokio::test]
async fn test_create_ticket_file_drop_failure_still_succeeds() {
    let discord = spawn_mock_discord().await;
    let app = TestApp::spawn(Relay::UnwritableFileDrop, &format!("http://{discord}")).await;

    let response = app
        .client
        .post(app.url("/api/create-ticket"))
        .json(&ticket_body("TX-3004"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Order received successfully");
    assert_eq!(body["error"], "Discord bot webhook unavailable");
    assert!(!app.tickets.path().join("blocked/ticket_TX-3004.json").exists());
}

#[tokio::test]
async fn test_create_ticket_bot_offline_still_succeeds() {
    let discord = spawn_mock_discord().await;
    // Nothing listens on the discard port
    let app = TestApp::spawn(
        Relay::Webhook("http://127.0.0.1:9".to_string()),
        &format!("http://{discord}"),
    )
    .await;

    let response = app
        .client
        .post(app.url("/api/create-ticket"))
        .json(&ticket_body("TX-3003"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Order received successfully");
    assert_eq!(
        body["note"],
        "Discord bot is offline - ticket will be created manually"
    );
}

#[tokio::test]
async fn test_test_ticket_reaches_companion() {
    let discord = spawn_mock_discord().await;
    let (companion, bot_url) = MockCompanion::spawn().await;
    let app = TestApp::spawn(Relay::Webhook(bot_url), &format!("http://{discord}")).await;

    let response = app.client.post(app.url("/api/test-ticket")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let received = companion.received().await;
    assert_eq!(received.len(), 1);
    assert!(received[0]["transactionId"].as_str().unwrap().starts_with("TEST_"));
}

#[tokio::test]
async fn test_order_status_and_purchase_webhook() {
    let app = file_drop_app().await;

    let order: Value = app
        .client
        .get(app.url("/api/order/TX-9"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(order["order"]["transactionId"], "TX-9");
    assert_eq!(order["order"]["status"], "processing");

    let ack: Value = app
        .client
        .post(app.url("/webhook/purchase"))
        .body("delivered")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ack, json!({ "success": true, "message": "Webhook received" }));
}

// =============================================================================
// Discord Login
// =============================================================================

#[tokio::test]
async fn test_login_session_lifecycle() {
    let app = file_drop_app().await;

    let anonymous = app.client.get(app.url("/api/user")).send().await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let callback = app
        .client
        .get(app.url(&format!("/auth/callback?code={GOOD_CODE}")))
        .send()
        .await
        .unwrap();
    assert_eq!(callback.status(), StatusCode::FOUND);
    let location = callback.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("/auth/success?user="), "{location}");

    let me = app.client.get(app.url("/api/user")).send().await.unwrap();
    assert_eq!(me.status(), StatusCode::OK);
    let me: Value = me.json().await.unwrap();
    assert_eq!(me["user"]["username"], "Nelly#0");
    assert_eq!(me["user"]["email"], "nelly@example.com");
    assert!(me["user"].get("accessToken").is_none());
    assert!(me["user"].get("access_token").is_none());

    let logout = app.client.post(app.url("/api/logout")).send().await.unwrap();
    assert_eq!(logout.status(), StatusCode::OK);

    let after = app.client.get(app.url("/api/user")).send().await.unwrap();
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejected_code_redirects_with_error() {
    let app = file_drop_app().await;

    let callback = app
        .client
        .get(app.url("/auth/callback?code=bad"))
        .send()
        .await
        .unwrap();
    assert_eq!(callback.status(), StatusCode::FOUND);
    assert_eq!(
        callback.headers()[header::LOCATION],
        "/login.html?error=oauth_failed"
    );

    let me = app.client.get(app.url("/api/user")).send().await.unwrap();
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Stores
// =============================================================================

#[tokio::test]
async fn test_all_stores_skips_invalid_files() {
    let app = file_drop_app().await;
    app.write_store("config.json", r#"{"name": "DonutMarket"}"#);
    app.write_store("spawners.json", r#"{"storeId": "spawner-depot", "name": "Spawners"}"#);
    app.write_store("broken.json", "{ nope");
    app.write_store("notes.txt", "not a store");

    let response = app.client.get(app.url("/api/all-stores")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stores: Vec<Value> = response.json().await.unwrap();
    assert_eq!(stores.len(), 2);
    let ids: Vec<_> = stores.iter().map(|s| s["storeId"].clone()).collect();
    assert!(ids.contains(&json!("config")));
    assert!(ids.contains(&json!("spawner-depot")));
}

#[tokio::test]
async fn test_store_config_missing_is_500() {
    let app = file_drop_app().await;

    let response = app.client.get(app.url("/api/store-config")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Failed to load store configuration" }));
}
