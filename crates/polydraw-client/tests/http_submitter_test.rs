//! HTTP submitter tests against an in-process backend.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use polydraw_client::HttpSubmitter;
use polydraw_core::memory::{RecordingNavigator, RecordingNotifier};
use polydraw_core::models::{DrawnShape, LatLng};
use polydraw_core::ports::{Navigator, PolygonPayload, PolygonSubmitter, Submission};
use polydraw_core::{ConfirmOutcome, PolygonWidget, SubmitError, WidgetConfig};
use serde_json::{json, Value};

#[derive(Default)]
struct Received {
    requests: Mutex<Vec<(Option<String>, Value)>>,
}

async fn draw_polygon(
    State(received): State<Arc<Received>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let content_type =
        headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()).map(str::to_string);
    received.requests.lock().unwrap().push((content_type, body));
    Json(json!({"message": "Polygon processed successfully", "crs": "EPSG:4326"}))
}

async fn rejecting() -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({"error": "No polygon coordinates provided"})))
}

async fn not_json() -> &'static str {
    "<html>ok</html>"
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!({}))
}

async fn spawn_backend() -> (SocketAddr, Arc<Received>) {
    let received = Arc::new(Received::default());
    let app = Router::new()
        .route("/draw_polygon", post(draw_polygon))
        .route("/rejecting", post(rejecting))
        .route("/not_json", post(not_json))
        .route("/slow", post(slow))
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, received)
}

fn submitter(addr: SocketAddr) -> HttpSubmitter {
    HttpSubmitter::new(format!("http://{}", addr), Duration::from_secs(5)).unwrap()
}

fn submission(path: &str) -> Submission {
    Submission {
        path: path.to_string(),
        payload: PolygonPayload {
            polygon_coords: vec![vec![
                vec![0.0, 0.0],
                vec![0.0, 1.0],
                vec![1.0, 1.0],
                vec![1.0, 0.0],
                vec![0.0, 0.0],
            ]],
        },
    }
}

#[tokio::test]
async fn test_widget_confirm_posts_once_and_navigates() {
    let (addr, received) = spawn_backend().await;
    let notifier = RecordingNotifier::new();
    let navigator = RecordingNavigator::starting_at("/draw_polygon");
    let mut widget = PolygonWidget::new(
        WidgetConfig::default(),
        Arc::new(notifier.clone()),
        Arc::new(navigator.clone()),
    );

    widget
        .on_created(DrawnShape::polygon(vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(1.0, 0.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(0.0, 1.0),
        ]))
        .unwrap();

    let outcome = widget.confirm(&submitter(addr)).await.unwrap();

    assert_eq!(outcome, ConfirmOutcome::Navigated { location: "/result".to_string() });
    assert_eq!(navigator.current_location(), "/result");
    assert!(notifier.alerts().is_empty());

    let requests = received.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0.as_deref(), Some("application/json"));
    assert_eq!(
        requests[0].1,
        json!({"polygon_coords": [[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]]})
    );
}

#[tokio::test]
async fn test_response_json_is_returned() {
    let (addr, _) = spawn_backend().await;
    let response = submitter(addr).submit(&submission("/draw_polygon")).await.unwrap();
    assert_eq!(response["crs"], "EPSG:4326");
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let (addr, _) = spawn_backend().await;
    let err = submitter(addr).submit(&submission("/rejecting")).await.unwrap_err();

    match err {
        SubmitError::Status { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("No polygon coordinates provided"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_body_is_an_error() {
    let (addr, _) = spawn_backend().await;
    let err = submitter(addr).submit(&submission("/not_json")).await.unwrap_err();
    assert!(matches!(err, SubmitError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_unknown_route_is_an_error() {
    let (addr, _) = spawn_backend().await;
    let err = submitter(addr).submit(&submission("/missing")).await.unwrap_err();
    assert!(matches!(err, SubmitError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_timeout_is_a_transport_error() {
    let (addr, _) = spawn_backend().await;
    let impatient =
        HttpSubmitter::new(format!("http://{}", addr), Duration::from_millis(200)).unwrap();

    let err = impatient.submit(&submission("/slow")).await.unwrap_err();
    assert!(matches!(err, SubmitError::Transport(ref msg) if msg.contains("no response")));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = submitter(addr).submit(&submission("/draw_polygon")).await.unwrap_err();
    assert!(matches!(err, SubmitError::Transport(_)));
}
