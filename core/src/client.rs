//! HTTP client for the remote simulation service.
//!
//! One request per call: no retry, no timeout, no cancellation.

use crate::{
    config::ApiConfig,
    contract::{SimulateRequest, SimulationMetrics},
    error::{SimError, SimResult},
    history::HistoryRecord,
};
use reqwest::Client;

pub const SIMULATE_PATH: &str = "/api/simulate";
pub const HISTORY_PATH: &str = "/api/history";

pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Submit a scenario and return the validated metrics, with the
    /// scenario merged in as `query`.
    pub async fn simulate(&self, scenario: &str) -> SimResult<SimulationMetrics> {
        let url = self.config.endpoint(SIMULATE_PATH);
        log::debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .json(&SimulateRequest { scenario })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SimError::Status { status: status.as_u16() });
        }

        let body = response.text().await?;
        parse_simulation(&body, scenario)
    }

    pub async fn history(&self) -> SimResult<Vec<HistoryRecord>> {
        let url = self.config.endpoint(HISTORY_PATH);
        log::debug!("GET {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SimError::Status { status: status.as_u16() });
        }

        let body = response.text().await?;
        parse_history(&body)
    }
}

/// Parse and validate a `/api/simulate` response body.
pub fn parse_simulation(body: &str, query: &str) -> SimResult<SimulationMetrics> {
    let metrics: SimulationMetrics = serde_json::from_str(body)?;
    let metrics = metrics.with_query(query);
    metrics.validate()?;
    Ok(metrics)
}

/// Parse a `/api/history` response body. Elements that cannot be read
/// as a record are skipped with a warning.
pub fn parse_history(body: &str) -> SimResult<Vec<HistoryRecord>> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(body)?;
    let total = raw.len();

    let records: Vec<HistoryRecord> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("skipping history entry {i}: {e}");
                None
            }
        })
        .collect();

    if records.len() < total {
        log::warn!("read {} of {total} history entries", records.len());
    }
    Ok(records)
}
