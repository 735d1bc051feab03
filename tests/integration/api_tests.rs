//! API integration tests against a running server

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an organizer token
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_live_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_live_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_live_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_live_save_event_and_scan() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // A single all-day window covering today
    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
    let response = client
        .put(format!("{}/event", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "event_name": "Live Test",
            "start_date": today,
            "end_date": today,
            "start_time": "00:00",
            "end_time": "00:00",
            "max_attendees": 100
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["windows"].as_array().map(Vec::len), Some(1));

    client
        .post(format!("{}/scanner/resume", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    let response = client
        .post(format!("{}/scan", BASE_URL))
        .json(&json!({ "data": "ONGC1001" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["accepted"], true);
    assert_eq!(body["decision"]["outcome"], "admitted");
}

#[tokio::test]
#[ignore]
async fn test_live_dashboard() {
    let client = Client::new();

    let response = client
        .get(format!("{}/dashboard", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["days"].is_array());
    assert!(body["total_admitted"].is_number());
}
