use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;
use tripcraft_api::{app, state::CLOSED_DIALOG_TTL, AppState};
use tripcraft_gateway::{MockGateway, SubmissionFailed};
use tripcraft_session::{Notice, NoticeKind, Notifier, SUCCESS_DWELL};

#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}

fn router_with(gateway: Arc<MockGateway>) -> Router {
    app(AppState::new(gateway))
}

fn paris_trip() -> Value {
    json!({
        "Origin": "NY",
        "Destination": "Paris",
        "Departure Date": "2025-06-01",
        "Return Date": "2025-06-10",
        "Activities": "Museums",
        "Number of Travelers": 2,
        "Email": "a@b.com"
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_dialog(app: &Router) -> String {
    let (status, body) = send(app, Method::POST, "/v1/dialogs", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["dialog_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = router_with(Arc::new(MockGateway::succeeding()));
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_dialog_opens_idle_session() {
    let app = router_with(Arc::new(MockGateway::succeeding()));
    let (status, body) = send(&app, Method::POST, "/v1/dialogs", None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["view"]["open"], true);
    assert_eq!(body["view"]["phase"], "IDLE");
    assert_eq!(body["view"]["primary_action"]["label"], "Craft My Itinerary");
    assert_eq!(body["view"]["draft"]["Number of Travelers"], "1");
    assert!(body["view"]["session_id"].is_string());
}

#[tokio::test]
async fn test_unknown_dialog_is_not_found() {
    let app = router_with(Arc::new(MockGateway::succeeding()));
    let uri = format!("/v1/dialogs/{}", uuid::Uuid::new_v4());

    let (status, body) = send(&app, Method::GET, &uri, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_dialog_details_carry_calendar_bounds() {
    let app = router_with(Arc::new(MockGateway::succeeding()));
    let id = create_dialog(&app).await;

    let (_, _) = send(
        &app,
        Method::PUT,
        &format!("/v1/dialogs/{}/fields", id),
        Some(json!({ "field": "Departure Date", "value": "2099-03-14" })),
    )
    .await;
    let (status, body) = send(&app, Method::GET, &format!("/v1/dialogs/{}", id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["calendar"]["return_from"], "2099-03-14");
    assert!(body["calendar"]["departure_from"].is_string());
}

#[tokio::test]
async fn test_field_edit_updates_draft() {
    let app = router_with(Arc::new(MockGateway::succeeding()));
    let id = create_dialog(&app).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/v1/dialogs/{}/fields", id),
        Some(json!({ "field": "Number of Travelers", "value": 4 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"]["draft"]["Number of Travelers"], "4");
}

#[tokio::test]
async fn test_invalid_submission_reports_field_errors() {
    let gateway = Arc::new(MockGateway::succeeding());
    let app = router_with(gateway.clone());
    let id = create_dialog(&app).await;

    let mut trip = paris_trip();
    trip["Origin"] = json!("N");
    trip["Email"] = json!("not-an-email");
    let (status, body) = send(&app, Method::POST, &format!("/v1/dialogs/{}/submit", id), Some(trip)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field_errors"]["Origin"], "Origin must be at least 2 characters.");
    assert!(body["field_errors"]["Email"].is_string());
    assert_eq!(gateway.call_count(), 0);

    let (_, details) = send(&app, Method::GET, &format!("/v1/dialogs/{}", id), None).await;
    assert_eq!(details["view"]["phase"], "IDLE");
    assert!(details["view"]["field_errors"]["Origin"].is_string());
}

#[tokio::test(start_paused = true)]
async fn test_successful_submission_then_teardown() {
    let gateway = Arc::new(MockGateway::succeeding());
    let app = router_with(gateway.clone());
    let id = create_dialog(&app).await;

    let start = tokio::time::Instant::now();
    let (status, body) = send(&app, Method::POST, &format!("/v1/dialogs/{}/submit", id), Some(paris_trip())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(start.elapsed() >= Duration::from_secs(10));
    assert_eq!(body["view"]["phase"], "SUCCESS");
    assert_eq!(body["view"]["overlay"]["kind"], "success");
    assert_eq!(gateway.call_count(), 1);

    tokio::time::sleep(SUCCESS_DWELL + Duration::from_millis(50)).await;

    let (_, details) = send(&app, Method::GET, &format!("/v1/dialogs/{}", id), None).await;
    assert_eq!(details["view"]["open"], false);
    assert_eq!(details["view"]["phase"], "IDLE");
    assert_eq!(details["view"]["draft"]["Origin"], "");
}

#[tokio::test(start_paused = true)]
async fn test_gateway_failure_is_bad_gateway() {
    let gateway = MockGateway::failing(SubmissionFailed::Rejected { status: 500 });
    let app = router_with(Arc::new(gateway));
    let id = create_dialog(&app).await;

    let (status, body) = send(&app, Method::POST, &format!("/v1/dialogs/{}/submit", id), Some(paris_trip())).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["failure"]["kind"], "rejected");
    assert_eq!(body["failure"]["status"], 500);

    let (_, details) = send(&app, Method::GET, &format!("/v1/dialogs/{}", id), None).await;
    assert_eq!(details["view"]["phase"], "ERROR");
    assert_eq!(details["view"]["open"], true);
    assert_eq!(details["view"]["draft"]["Destination"], "Paris");
}

#[tokio::test]
async fn test_submit_on_dismissed_dialog_conflicts() {
    let app = router_with(Arc::new(MockGateway::succeeding()));
    let id = create_dialog(&app).await;

    let (status, body) = send(&app, Method::POST, &format!("/v1/dialogs/{}/dismiss", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"]["open"], false);

    let (status, _) = send(&app, Method::POST, &format!("/v1/dialogs/{}/submit", id), Some(paris_trip())).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, Method::POST, &format!("/v1/dialogs/{}/open", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"]["open"], true);
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_during_submission_is_gone() {
    let gateway = MockGateway::succeeding().with_latency(Duration::from_secs(3));
    let app = router_with(Arc::new(gateway));
    let id = create_dialog(&app).await;

    let submitting = tokio::spawn({
        let app = app.clone();
        let uri = format!("/v1/dialogs/{}/submit", id);
        async move { send(&app, Method::POST, &uri, Some(paris_trip())).await }
    });
    tokio::time::sleep(Duration::from_secs(1)).await;

    let (status, _) = send(&app, Method::POST, &format!("/v1/dialogs/{}/dismiss", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = submitting.await.unwrap();
    assert_eq!(status, StatusCode::GONE);
    assert!(body["error"].as_str().unwrap().contains("dismissed"));
}

#[tokio::test]
async fn test_event_stream_is_sse() {
    let app = router_with(Arc::new(MockGateway::succeeding()));
    let id = create_dialog(&app).await;

    let request = Request::builder()
        .uri(format!("/v1/dialogs/{}/events", id))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );
}

#[tokio::test(start_paused = true)]
async fn test_closed_dialogs_are_evicted() {
    let app = router_with(Arc::new(MockGateway::succeeding()));
    let dismissed = create_dialog(&app).await;
    let succeeded = create_dialog(&app).await;
    let open = create_dialog(&app).await;

    send(&app, Method::POST, &format!("/v1/dialogs/{}/dismiss", dismissed), None).await;
    let (status, _) = send(&app, Method::POST, &format!("/v1/dialogs/{}/submit", succeeded), Some(paris_trip())).await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(SUCCESS_DWELL + CLOSED_DIALOG_TTL + Duration::from_secs(1)).await;

    let (status, _) = send(&app, Method::GET, &format!("/v1/dialogs/{}", dismissed), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, &format!("/v1/dialogs/{}", succeeded), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, &format!("/v1/dialogs/{}", open), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_past_departure_pick_is_refused() {
    let app = router_with(Arc::new(MockGateway::succeeding()));
    let id = create_dialog(&app).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/v1/dialogs/{}/fields", id),
        Some(json!({ "field": "Departure Date", "value": "2000-01-01" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field_errors"]["Departure Date"], "That date is not available.");

    let (_, details) = send(&app, Method::GET, &format!("/v1/dialogs/{}", id), None).await;
    assert!(details["view"]["draft"]["Departure Date"].is_null());
}

#[tokio::test]
async fn test_return_pick_before_departure_is_refused() {
    let app = router_with(Arc::new(MockGateway::succeeding()));
    let id = create_dialog(&app).await;
    let uri = format!("/v1/dialogs/{}/fields", id);

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({ "field": "Departure Date", "value": "2099-06-10" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "field": "Return Date", "value": "2099-06-01" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"]["Return Date"].is_string());
}

#[tokio::test(start_paused = true)]
async fn test_failure_notice_reaches_the_notifier() {
    let notifier = Arc::new(RecordingNotifier::default());
    let gateway = MockGateway::failing(SubmissionFailed::Transport {
        message: "connection reset".into(),
    });
    let app = app(AppState::new(Arc::new(gateway)).with_notifier(notifier.clone()));
    let id = create_dialog(&app).await;

    let (status, _) = send(&app, Method::POST, &format!("/v1/dialogs/{}/submit", id), Some(paris_trip())).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let notices = notifier.notices.lock().unwrap().clone();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Error);
    assert_eq!(notices[0].title, "Something went wrong.");
}
