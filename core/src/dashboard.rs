//! View-state controllers for the simulation form and the history list.
//!
//! The rendering surface reads state from these and forwards user input
//! to them. Each result replaces the previous view state wholesale.

use crate::{
    backend::SimulationBackend,
    history::HistoryRecord,
    report::SimulationReport,
};
use serde::Serialize;
use std::sync::Arc;

/// Sample hypotheses offered under the input box.
pub const EXAMPLE_QUERIES: [&str; 3] = [
    "Launch a fintech app for small businesses in Nigeria",
    "Create a food delivery service in Abuja",
    "Build an AI tutoring platform for secondary schools",
];

/// The one alert shown when a submission fails, whatever the cause.
pub const SUBMIT_FAILED_ALERT: &str = "Simulation failed. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing to submit; the backend was not called.
    Blocked,
    Completed,
    Failed,
}

/// Serializable snapshot handed to the rendering surface.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardState<'a> {
    pub query:         &'a str,
    pub is_simulating: bool,
    pub alert:         Option<&'a str>,
    pub report:        Option<&'a SimulationReport>,
}

pub struct Dashboard {
    backend:       Arc<dyn SimulationBackend>,
    query:         String,
    is_simulating: bool,
    current:       Option<SimulationReport>,
    alert:         Option<String>,
}

impl Dashboard {
    pub fn new(backend: Arc<dyn SimulationBackend>) -> Self {
        Self {
            backend,
            query: String::new(),
            is_simulating: false,
            current: None,
            alert: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Input is disabled while a simulation is running.
    pub fn set_query(&mut self, query: impl Into<String>) {
        if !self.is_simulating {
            self.query = query.into();
        }
    }

    /// Fill the input with one of EXAMPLE_QUERIES.
    pub fn use_example(&mut self, index: usize) -> bool {
        match EXAMPLE_QUERIES.get(index) {
            Some(example) if !self.is_simulating => {
                self.query = (*example).to_string();
                true
            }
            _ => false,
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.is_simulating && !self.query.trim().is_empty()
    }

    pub fn is_simulating(&self) -> bool {
        self.is_simulating
    }

    pub fn current(&self) -> Option<&SimulationReport> {
        self.current.as_ref()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Dismiss the pending alert, returning it.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    pub fn state(&self) -> DashboardState<'_> {
        DashboardState {
            query:         &self.query,
            is_simulating: self.is_simulating,
            alert:         self.alert.as_deref(),
            report:        self.current.as_ref(),
        }
    }

    /// Run the current query. The query field is cleared whether the
    /// backend succeeds or fails; on failure the previous report stays.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.can_submit() {
            return SubmitOutcome::Blocked;
        }

        let query = self.query.clone();
        self.is_simulating = true;
        self.alert = None;

        let result = self.backend.simulate(&query).await;

        self.is_simulating = false;
        self.query.clear();

        match result {
            Ok(report) => {
                log::info!("simulation {} completed via {}", report.id, self.backend.name());
                self.current = Some(report);
                SubmitOutcome::Completed
            }
            Err(e) => {
                log::error!("simulation via {} failed: {e}", self.backend.name());
                self.alert = Some(SUBMIT_FAILED_ALERT.to_string());
                SubmitOutcome::Failed
            }
        }
    }
}

// ── History ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HistoryState {
    Loading,
    Loaded { records: Vec<HistoryRecord> },
    /// The source answered with no records.
    Empty,
    /// The source could not be read; shown apart from Empty.
    Unavailable { reason: String },
}

pub struct HistoryView {
    backend:  Arc<dyn SimulationBackend>,
    state:    HistoryState,
    selected: Option<usize>,
}

impl HistoryView {
    pub fn new(backend: Arc<dyn SimulationBackend>) -> Self {
        Self {
            backend,
            state: HistoryState::Loading,
            selected: None,
        }
    }

    /// Fetch afresh; the previous list is discarded.
    pub async fn load(&mut self) -> &HistoryState {
        self.state = HistoryState::Loading;
        self.selected = None;

        self.state = match self.backend.history().await {
            Ok(records) if records.is_empty() => HistoryState::Empty,
            Ok(records) => HistoryState::Loaded { records },
            Err(e) => {
                log::warn!("history via {} unavailable: {e}", self.backend.name());
                HistoryState::Unavailable { reason: e.to_string() }
            }
        };
        &self.state
    }

    pub fn state(&self) -> &HistoryState {
        &self.state
    }

    /// Records to list; empty unless loaded.
    pub fn records(&self) -> &[HistoryRecord] {
        match &self.state {
            HistoryState::Loaded { records } => records,
            _ => &[],
        }
    }

    /// Open the detail view for one record.
    pub fn select(&mut self, index: usize) -> Option<&HistoryRecord> {
        if index < self.records().len() {
            self.selected = Some(index);
        }
        self.selected()
    }

    pub fn selected(&self) -> Option<&HistoryRecord> {
        self.selected.and_then(|i| self.records().get(i))
    }

    pub fn close(&mut self) {
        self.selected = None;
    }
}
