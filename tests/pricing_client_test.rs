use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use nordplug::config::PricingSettings;
use nordplug::error::NordplugError;
use nordplug::pricing::{NordPoolClient, PricingClient};
use serde_json::json;
use std::collections::HashMap;

async fn prices(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
    match q.get("country").map(String::as_str) {
        Some("ee") => {
            let mut today = vec![40.0; 24];
            today[0] = 12.5;
            Json(json!({
                "2024-01-16": vec![30.0; 24],
                "2024-01-17": today,
            }))
            .into_response()
        }
        Some("lv") => Json(json!({
            "2024-01-17": vec![40.0; 24],
            "2024-01-18": null,
            "2024-01-19": "pending",
        }))
        .into_response(),
        Some("xx") => Json(json!({ "2024-01-17": vec![40.0; 23] })).into_response(),
        Some("html") => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        _ => (StatusCode::BAD_REQUEST, "Unknown country").into_response(),
    }
}

async fn spawn_server() -> String {
    let router = Router::new().route("/api/prices", get(prices));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/api/prices", addr)
}

fn client(url: String) -> NordPoolClient {
    NordPoolClient::new(&PricingSettings {
        api_url: url,
        timeout_secs: 5,
        ..Default::default()
    })
    .unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

#[tokio::test]
async fn fetches_requested_day() {
    let c = client(spawn_server().await);
    let series = c.fetch_daily_prices("ee", day(17)).await.unwrap();
    assert_eq!(series.as_slice().len(), 24);
    assert_eq!(series.price_at(0), Some(12.5));
    assert_eq!(series.price_at(1), Some(40.0));

    let yesterday = c.fetch_daily_prices("ee", day(16)).await.unwrap();
    assert_eq!(yesterday.price_at(0), Some(30.0));
}

#[tokio::test]
async fn non_success_status_carries_body() {
    let c = client(spawn_server().await);
    let err = c.fetch_daily_prices("zz", day(17)).await.unwrap_err();
    match err {
        NordplugError::PriceFetch { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("Unknown country"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn missing_date_lists_available_dates() {
    let c = client(spawn_server().await);
    let err = c.fetch_daily_prices("ee", day(18)).await.unwrap_err();
    let msg = err.to_string();
    assert!(matches!(err, NordplugError::DateNotAvailable { .. }));
    assert!(msg.contains("2024-01-16, 2024-01-17"), "{msg}");
}

#[tokio::test]
async fn placeholder_in_other_days_does_not_block_today() {
    let c = client(spawn_server().await);
    let series = c.fetch_daily_prices("lv", day(17)).await.unwrap();
    assert_eq!(series.price_at(12), Some(40.0));

    let err = c.fetch_daily_prices("lv", day(18)).await.unwrap_err();
    assert!(matches!(err, NordplugError::Serialization { .. }));

    let err = c.fetch_daily_prices("lv", day(20)).await.unwrap_err();
    assert!(err.to_string().contains("2024-01-17, 2024-01-18, 2024-01-19"));
}

#[tokio::test]
async fn wrong_length_day_is_rejected() {
    let c = client(spawn_server().await);
    let err = c.fetch_daily_prices("xx", day(17)).await.unwrap_err();
    assert!(matches!(err, NordplugError::InvalidPriceSeries { len: 23 }));
}

#[tokio::test]
async fn non_json_body_is_a_serialization_error() {
    let c = client(spawn_server().await);
    let err = c.fetch_daily_prices("html", day(17)).await.unwrap_err();
    assert!(matches!(err, NordplugError::Serialization { .. }));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_network_error() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let c = client(format!("http://{}/api/prices", addr));
    let err = c.fetch_daily_prices("ee", day(17)).await.unwrap_err();
    assert!(matches!(err, NordplugError::Network { .. }));
}

#[test]
fn trailing_slash_is_trimmed() {
    let c = client("http://localhost:1/api/prices/".into());
    assert_eq!(c.base_url(), "http://localhost:1/api/prices");
}
