use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::NaiveDate;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tripcraft_core::{validate, TripDraft, TripRequest};
use tripcraft_gateway::{GatewayConfig, SubmissionFailed, TripGateway, WebhookGateway};

#[derive(Clone)]
struct Webhook {
    status: StatusCode,
    received: Arc<Mutex<Vec<serde_json::Value>>>,
}

async fn receive(State(hook): State<Webhook>, Json(body): Json<serde_json::Value>) -> StatusCode {
    hook.received.lock().unwrap().push(body);
    hook.status
}

async fn spawn_webhook(status: StatusCode) -> (SocketAddr, Arc<Mutex<Vec<serde_json::Value>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/webhook/ai-trip-advisor", post(receive))
        .with_state(Webhook {
            status,
            received: received.clone(),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, received)
}

fn gateway_for(addr: SocketAddr) -> WebhookGateway {
    let config = GatewayConfig::new(format!("http://{}/webhook/ai-trip-advisor", addr));
    WebhookGateway::new(&config).expect("gateway should build")
}

fn paris_trip() -> TripRequest {
    validate(&TripDraft {
        origin: "NY".into(),
        destination: "Paris".into(),
        departure_date: NaiveDate::from_ymd_opt(2025, 6, 1),
        return_date: NaiveDate::from_ymd_opt(2025, 6, 10),
        activities: "Museums".into(),
        traveler_count: "2".into(),
        email: "a@b.com".into(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_accepted_submission_posts_form_body() {
    let (addr, received) = spawn_webhook(StatusCode::OK).await;
    let gateway = gateway_for(addr);

    gateway.submit(&paris_trip()).await.expect("submission should succeed");

    let bodies = received.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["Departure Date"], "2025-06-01");
    assert_eq!(bodies[0]["Return Date"], "2025-06-10");
    assert_eq!(bodies[0]["Number of Travelers"], 2);
    assert_eq!(bodies[0]["Email"], "a@b.com");
}

#[tokio::test]
async fn test_any_2xx_counts_as_accepted() {
    let (addr, _) = spawn_webhook(StatusCode::ACCEPTED).await;
    assert!(gateway_for(addr).submit(&paris_trip()).await.is_ok());
}

#[tokio::test]
async fn test_server_error_is_a_rejection() {
    let (addr, received) = spawn_webhook(StatusCode::INTERNAL_SERVER_ERROR).await;

    let result = gateway_for(addr).submit(&paris_trip()).await;

    assert_eq!(result, Err(SubmissionFailed::Rejected { status: 500 }));
    // Single attempt, no retry
    assert_eq!(received.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = gateway_for(addr).submit(&paris_trip()).await;

    assert!(matches!(result, Err(SubmissionFailed::Transport { .. })));
}

#[tokio::test]
async fn test_stalled_webhook_times_out_as_transport_failure() {
    let app = Router::new().route(
        "/webhook/ai-trip-advisor",
        post(|| async {
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
            StatusCode::OK
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let mut config = GatewayConfig::new(format!("http://{}/webhook/ai-trip-advisor", addr));
    config.timeout_secs = 1;
    let gateway = WebhookGateway::new(&config).unwrap();

    let start = std::time::Instant::now();
    let result = gateway.submit(&paris_trip()).await;

    assert!(matches!(result, Err(SubmissionFailed::Transport { .. })));
    assert!(start.elapsed() < std::time::Duration::from_secs(10));
}
