//! HTTP round trips against a throwaway local listener.

use ideasim_core::{
    adapter::ReportAdapter,
    backend::{RemoteBackend, SimulationBackend},
    client::ApiClient,
    config::{ApiConfig, GeneratorConfig},
    dashboard::{Dashboard, HistoryState, HistoryView, SubmitOutcome, SUBMIT_FAILED_ALERT},
    error::SimError,
};
use serde_json::json;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Serve exactly one HTTP response, returning the base URL and a handle
/// yielding the raw request text.
async fn serve_once(status_line: &'static str, body: String) -> (String, JoinHandle<String>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.expect("read");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&request[..end]).to_lowercase();
                let content_length = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= end + 4 + content_length {
                    break;
                }
            }
        }

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.expect("write");
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).into_owned()
    });

    (format!("http://{addr}"), handle)
}

fn remote_backend(base_url: &str) -> Arc<RemoteBackend> {
    let client = ApiClient::new(ApiConfig::new(base_url).unwrap());
    Arc::new(RemoteBackend::new(client, ReportAdapter::new(GeneratorConfig::builtin())))
}

fn service_body() -> String {
    json!({
        "adoption_probability": 78,
        "churn_risk": 0.12,
        "referral_likelihood": 0.35,
        "regional_heat": { "Lagos": "high", "Abuja": "medium" },
        "adoption_curve": [1000, 2500, 4200, 6800, 9500, 12000],
        "retention_curve": [0.95, 0.92, 0.88, 0.85, 0.82, 0.80],
        "revenue_projection": { "month_1": 50000, "month_3": 200000, "month_6": 650000, "month_12": 1400000 },
        "customer_segments": { "students": 0.25, "working_class": 0.5, "entrepreneurs": 0.25 },
        "summary": "Promising."
    })
    .to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn simulate_posts_the_scenario_and_adapts_the_answer() {
    let (base, request) = serve_once("200 OK", service_body()).await;
    let backend = remote_backend(&base);

    let report = backend.simulate("Launch a fintech app").await.unwrap();
    let request = request.await.unwrap();

    assert!(request.starts_with("POST /api/simulate "), "request was: {request}");
    assert!(request.contains(r#"{"scenario":"Launch a fintech app"}"#));

    assert_eq!(report.query, "Launch a fintech app");
    assert_eq!(report.key_metrics.unwrap().adoption_probability.as_percent(), 78);
    assert_eq!(report.heatmap.regions.len(), 2);
    assert_eq!(report.charts.market_share_total(), 100);
}

#[tokio::test]
async fn non_success_status_is_a_single_generic_error() {
    let (base, _request) = serve_once("500 Internal Server Error", "{}".into()).await;
    let client = ApiClient::new(ApiConfig::new(base).unwrap());

    let err = client.simulate("anything").await.unwrap_err();
    assert!(matches!(err, SimError::Status { status: 500 }), "got {err}");
}

#[tokio::test]
async fn failed_remote_submission_shows_one_alert() {
    let (base, _request) = serve_once("503 Service Unavailable", "{}".into()).await;
    let mut dashboard = Dashboard::new(remote_backend(&base));

    dashboard.set_query("Create a food delivery service in Abuja");
    assert_eq!(dashboard.submit().await, SubmitOutcome::Failed);
    assert_eq!(dashboard.alert(), Some(SUBMIT_FAILED_ALERT));
    assert!(!dashboard.is_simulating());
    assert_eq!(dashboard.query(), "");
}

#[tokio::test]
async fn invalid_payload_counts_as_failure() {
    let body = json!({ "adoption_probability": 0.5 }).to_string();
    let (base, _request) = serve_once("200 OK", body).await;
    let mut dashboard = Dashboard::new(remote_backend(&base));

    dashboard.set_query("anything");
    assert_eq!(dashboard.submit().await, SubmitOutcome::Failed);
    assert!(dashboard.current().is_none());
}

#[tokio::test]
async fn history_is_fetched_with_get() {
    let body = json!([
        {
            "_id": "66b2",
            "scenario": "Open a gym",
            "timestamp": "2026-10-18T07:15:00.250000",
            "metrics": { "adoption_probability": 0.6 },
            "regional_heat": { "Lagos": "high" },
            "customer_segments": { "students": 0.5, "working_class": 0.3, "entrepreneurs": 0.2 }
        },
        { "id": "2", "query": "Sell solar kits", "category": "Energy" }
    ])
    .to_string();
    let (base, request) = serve_once("200 OK", body).await;
    let mut view = HistoryView::new(remote_backend(&base));

    view.load().await;
    let request = request.await.unwrap();
    assert!(request.starts_with("GET /api/history "), "request was: {request}");

    assert_eq!(view.records().len(), 2);
    assert_eq!(view.records()[0].query_text(), "Open a gym");
    assert_eq!(view.records()[1].category.as_deref(), Some("Energy"));

    let detail = view.select(0).unwrap();
    assert_eq!(detail.id.as_deref(), Some("66b2"));
    assert!(detail.timestamp.is_some());
    assert_eq!(detail.regional_heat.as_ref().unwrap().len(), 1);
    assert_eq!(detail.customer_segments.as_ref().unwrap().to_percentages()[0].1, 50);
}

#[tokio::test]
async fn unreachable_history_is_reported_as_unavailable() {
    // Bind then drop to get a port nothing is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut view = HistoryView::new(remote_backend(&format!("http://{addr}")));
    let state = view.load().await;
    assert!(matches!(state, HistoryState::Unavailable { .. }), "got {state:?}");
}
