//! Integration tests for HttpSink against a local HTTP server

use axum::{
    extract::{RawQuery, State},
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode},
    Router,
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use stocktake_domain::{Delivery, InventoryRecord, RecordSink};
use stocktake_sheet::{DeliveryMode, Encoding, HttpMethod, HttpSink, SinkError};
use tokio::net::TcpListener;

/// One request as the fake endpoint saw it
#[derive(Debug, Clone)]
struct Seen {
    method: Method,
    query: Option<String>,
    content_type: Option<String>,
    body: String,
}

#[derive(Clone)]
struct FakeSheet {
    status: StatusCode,
    delay: Duration,
    seen: Arc<Mutex<Vec<Seen>>>,
}

async fn handle(
    State(fake): State<FakeSheet>,
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: String,
) -> (StatusCode, &'static str) {
    fake.seen.lock().unwrap().push(Seen {
        method,
        query,
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    tokio::time::sleep(fake.delay).await;
    (fake.status, "ok")
}

/// Start a fake logging endpoint and return its URL
async fn spawn_sheet(status: StatusCode, delay: Duration) -> (String, Arc<Mutex<Vec<Seen>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let fake = FakeSheet {
        status,
        delay,
        seen: Arc::clone(&seen),
    };
    let app = Router::new().fallback(handle).with_state(fake);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/exec", addr), seen)
}

fn hammers() -> InventoryRecord {
    InventoryRecord::new("hammers", "tools", 5.0, "garage").unwrap()
}

async fn submit_awaited(encoding: Encoding, method: HttpMethod) -> Seen {
    let (url, seen) = spawn_sheet(StatusCode::OK, Duration::ZERO).await;
    let sink = HttpSink::new(&url)
        .unwrap()
        .with_encoding(encoding)
        .with_method(method)
        .with_delivery(DeliveryMode::Awaited);

    let delivery = sink.submit(&hammers()).await.unwrap();
    assert_eq!(delivery, Delivery::Settled);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1, "exactly one request per submission");
    seen[0].clone()
}

#[tokio::test]
async fn test_query_encoding() {
    let seen = submit_awaited(Encoding::Query, HttpMethod::Post).await;

    assert_eq!(seen.method, Method::POST);
    assert_eq!(
        seen.query.as_deref(),
        Some("itemName=hammers&category=tools&quantity=5&location=garage")
    );
    assert!(seen.body.is_empty());
}

#[tokio::test]
async fn test_get_method() {
    let seen = submit_awaited(Encoding::Form, HttpMethod::Get).await;

    assert_eq!(seen.method, Method::GET);
    assert!(seen.query.unwrap().contains("location=garage"));
}

#[tokio::test]
async fn test_form_encoding() {
    let seen = submit_awaited(Encoding::Form, HttpMethod::Post).await;

    assert_eq!(seen.content_type.as_deref(), Some("application/x-www-form-urlencoded"));
    assert_eq!(seen.body, "itemName=hammers&category=tools&quantity=5&location=garage");
    assert_eq!(seen.query, None);
}

#[tokio::test]
async fn test_json_encoding() {
    let seen = submit_awaited(Encoding::Json, HttpMethod::Post).await;

    assert_eq!(seen.content_type.as_deref(), Some("application/json"));
    let body: serde_json::Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"itemName": "hammers", "category": "tools", "quantity": 5, "location": "garage"})
    );
    assert!(seen.body.contains(r#""quantity":5"#) && !seen.body.contains("5.0"));
}

#[tokio::test]
async fn test_text_encoding() {
    let seen = submit_awaited(Encoding::Text, HttpMethod::Post).await;

    assert!(seen.content_type.unwrap().starts_with("text/plain"));
    let body: serde_json::Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(body["itemName"], "hammers");
}

#[tokio::test]
async fn test_awaited_ignores_error_status() {
    let (url, seen) = spawn_sheet(StatusCode::INTERNAL_SERVER_ERROR, Duration::ZERO).await;
    let sink = HttpSink::new(&url).unwrap().with_delivery(DeliveryMode::Awaited);

    // The answer is opaque: a 500 still counts as settled
    assert_eq!(sink.submit(&hammers()).await.unwrap(), Delivery::Settled);
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_fire_and_forget_does_not_wait() {
    let (url, seen) = spawn_sheet(StatusCode::OK, Duration::from_secs(2)).await;
    let sink = HttpSink::new(&url).unwrap();

    let started = Instant::now();
    let delivery = sink.submit(&hammers()).await.unwrap();
    assert_eq!(delivery, Delivery::Dispatched);
    assert!(started.elapsed() < Duration::from_secs(1));

    // The request still goes out in the background
    let remaining = sink.drain(Duration::from_secs(10)).await;
    assert_eq!(remaining, 0);
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/exec", listener.local_addr().unwrap());
    drop(listener);

    // Fire-and-forget cannot observe the failure
    let sink = HttpSink::new(&url).unwrap();
    assert_eq!(sink.submit(&hammers()).await.unwrap(), Delivery::Dispatched);
    sink.drain(Duration::from_secs(5)).await;

    // Awaited delivery can tell the request never left
    let sink = sink.with_delivery(DeliveryMode::Awaited);
    assert!(matches!(sink.submit(&hammers()).await, Err(SinkError::Transport(_))));
}
