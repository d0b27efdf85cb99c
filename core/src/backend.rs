//! Where simulation results come from.
//!
//! RULE: View controllers talk to a SimulationBackend only. They never
//! see service metrics; every backend hands back display reports.

use crate::{
    adapter::ReportAdapter,
    client::ApiClient,
    error::SimResult,
    generator::MockGenerator,
    history::{history_fixture, HistoryRecord},
    report::SimulationReport,
};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

#[async_trait]
pub trait SimulationBackend: Send + Sync {
    /// Stable name for logs.
    fn name(&self) -> &'static str;

    async fn simulate(&self, query: &str) -> SimResult<SimulationReport>;

    async fn history(&self) -> SimResult<Vec<HistoryRecord>>;
}

/// Local generator plus the built-in history fixture.
pub struct MockBackend {
    generator: Mutex<MockGenerator>,
    latency:   Duration,
}

impl MockBackend {
    pub fn new(generator: MockGenerator) -> Self {
        Self {
            generator: Mutex::new(generator),
            latency:   Duration::ZERO,
        }
    }

    /// Artificial delay before each result, to mimic a network call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl SimulationBackend for MockBackend {
    fn name(&self) -> &'static str { "mock" }

    async fn simulate(&self, query: &str) -> SimResult<SimulationReport> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let report = {
            let mut generator = self
                .generator
                .lock()
                .map_err(|_| anyhow::anyhow!("mock generator lock poisoned"))?;
            generator.generate(query)
        };
        Ok(report)
    }

    async fn history(&self) -> SimResult<Vec<HistoryRecord>> {
        Ok(history_fixture().to_vec())
    }
}

/// The remote service, adapted to display reports.
pub struct RemoteBackend {
    client:  ApiClient,
    adapter: ReportAdapter,
}

impl RemoteBackend {
    pub fn new(client: ApiClient, adapter: ReportAdapter) -> Self {
        Self { client, adapter }
    }
}

#[async_trait]
impl SimulationBackend for RemoteBackend {
    fn name(&self) -> &'static str { "remote" }

    async fn simulate(&self, query: &str) -> SimResult<SimulationReport> {
        let metrics = self.client.simulate(query).await?;
        Ok(self.adapter.to_report(&metrics))
    }

    async fn history(&self) -> SimResult<Vec<HistoryRecord>> {
        self.client.history().await
    }
}
