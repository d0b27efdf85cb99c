//! Submission and history view-state behavior.

use async_trait::async_trait;
use ideasim_core::{
    backend::{MockBackend, SimulationBackend},
    config::GeneratorConfig,
    dashboard::{
        Dashboard, HistoryState, HistoryView, SubmitOutcome, EXAMPLE_QUERIES, SUBMIT_FAILED_ALERT,
    },
    error::{SimError, SimResult},
    generator::MockGenerator,
    history::{history_fixture, HistoryRecord},
    report::SimulationReport,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Backend that counts calls and can be told to fail.
struct ScriptedBackend {
    generator:     std::sync::Mutex<MockGenerator>,
    fail_simulate: bool,
    history:       Option<Vec<HistoryRecord>>,
    calls:         AtomicUsize,
}

impl ScriptedBackend {
    fn new(fail_simulate: bool, history: Option<Vec<HistoryRecord>>) -> Arc<Self> {
        Arc::new(Self {
            generator: std::sync::Mutex::new(MockGenerator::seeded(GeneratorConfig::builtin(), 5)),
            fail_simulate,
            history,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SimulationBackend for ScriptedBackend {
    fn name(&self) -> &'static str { "scripted" }

    async fn simulate(&self, query: &str) -> SimResult<SimulationReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_simulate {
            return Err(SimError::Status { status: 502 });
        }
        Ok(self.generator.lock().unwrap().generate(query))
    }

    async fn history(&self) -> SimResult<Vec<HistoryRecord>> {
        self.history
            .clone()
            .ok_or(SimError::Status { status: 503 })
    }
}

// ── Submission ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn blank_queries_never_reach_the_backend() {
    let backend = ScriptedBackend::new(false, None);
    let mut dashboard = Dashboard::new(backend.clone());

    for query in ["", "   ", "\t\n"] {
        dashboard.set_query(query);
        assert!(!dashboard.can_submit());
        assert_eq!(dashboard.submit().await, SubmitOutcome::Blocked);
    }
    assert_eq!(backend.calls(), 0, "backend must not be invoked for blank input");
    assert!(dashboard.current().is_none());
    assert!(dashboard.alert().is_none());
}

#[tokio::test]
async fn successful_submission_replaces_the_report_and_clears_input() {
    let backend = ScriptedBackend::new(false, None);
    let mut dashboard = Dashboard::new(backend.clone());

    dashboard.set_query("Launch a fintech app for small businesses in Nigeria");
    assert_eq!(dashboard.submit().await, SubmitOutcome::Completed);
    let first_id = dashboard.current().unwrap().id.clone();
    assert!(dashboard.current().unwrap().summary.contains("fintech"));
    assert_eq!(dashboard.query(), "");
    assert!(!dashboard.is_simulating());

    dashboard.set_query("Create a food delivery service in Abuja");
    assert_eq!(dashboard.submit().await, SubmitOutcome::Completed);
    let second = dashboard.current().unwrap();
    assert_ne!(second.id, first_id);
    assert_eq!(second.query, "Create a food delivery service in Abuja");
    assert_eq!(backend.calls(), 2);
}

#[tokio::test]
async fn failed_submission_alerts_once_and_resets_input() {
    let backend = ScriptedBackend::new(true, None);
    let mut dashboard = Dashboard::new(backend.clone());

    dashboard.set_query("Build an AI tutoring platform");
    assert_eq!(dashboard.submit().await, SubmitOutcome::Failed);

    assert_eq!(dashboard.alert(), Some(SUBMIT_FAILED_ALERT));
    assert!(!dashboard.is_simulating(), "loading indicator must clear");
    assert_eq!(dashboard.query(), "", "query clears even on failure");
    assert!(dashboard.current().is_none());

    assert_eq!(dashboard.take_alert().as_deref(), Some(SUBMIT_FAILED_ALERT));
    assert!(dashboard.alert().is_none(), "alert is shown once");
}

#[tokio::test]
async fn example_queries_fill_the_input() {
    let backend = ScriptedBackend::new(false, None);
    let mut dashboard = Dashboard::new(backend);

    assert!(dashboard.use_example(1));
    assert_eq!(dashboard.query(), EXAMPLE_QUERIES[1]);
    assert!(!dashboard.use_example(EXAMPLE_QUERIES.len()));
    assert_eq!(dashboard.query(), EXAMPLE_QUERIES[1]);
}

#[tokio::test]
async fn state_snapshot_serializes_for_the_ui() {
    let backend = ScriptedBackend::new(false, None);
    let mut dashboard = Dashboard::new(backend);
    dashboard.set_query("fintech for market traders");
    dashboard.submit().await;

    let json = serde_json::to_value(dashboard.state()).unwrap();
    assert_eq!(json["query"], "");
    assert_eq!(json["is_simulating"], false);
    assert!(json["alert"].is_null());
    assert_eq!(json["report"]["charts"]["adoption_curve"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn mock_backend_runs_end_to_end() {
    let backend = Arc::new(MockBackend::new(MockGenerator::new(GeneratorConfig::builtin())));
    let mut dashboard = Dashboard::new(backend.clone());

    dashboard.set_query("Launch a fintech app for small businesses in Nigeria");
    assert_eq!(dashboard.submit().await, SubmitOutcome::Completed);
    let report = dashboard.current().unwrap();
    assert_eq!(report.charts.market_share.len(), 4);
    assert_eq!(report.charts.adoption_curve[0].month, "Jan");

    let mut history = HistoryView::new(backend);
    history.load().await;
    assert_eq!(history.records(), history_fixture());
}

// ── History ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn history_distinguishes_empty_from_unavailable() {
    let mut empty = HistoryView::new(ScriptedBackend::new(false, Some(Vec::new())));
    assert_eq!(empty.load().await, &HistoryState::Empty);
    assert!(empty.records().is_empty());

    let mut failing = HistoryView::new(ScriptedBackend::new(false, None));
    let state = failing.load().await.clone();
    assert!(matches!(state, HistoryState::Unavailable { ref reason } if reason.contains("503")),
        "got {state:?}");
    assert!(failing.records().is_empty(), "failed fetch still lists nothing");
}

#[tokio::test]
async fn history_selection_opens_and_closes_detail() {
    let records = history_fixture().to_vec();
    let mut view = HistoryView::new(ScriptedBackend::new(false, Some(records.clone())));
    view.load().await;

    assert_eq!(view.records().len(), 5);
    assert_eq!(view.select(2), Some(&records[2]));
    assert_eq!(view.selected().and_then(|r| r.category.as_deref()), Some("EdTech"));

    assert!(view.select(99).is_some(), "out-of-range selection keeps the current one");
    view.close();
    assert!(view.selected().is_none());
}

#[tokio::test]
async fn reloading_history_clears_the_selection() {
    let mut view = HistoryView::new(ScriptedBackend::new(false, Some(history_fixture().to_vec())));
    view.load().await;
    view.select(0);
    view.load().await;
    assert!(view.selected().is_none());
}
