//! Display-oriented simulation report.
//!
//! RULE: Every rendering widget consumes these shapes and nothing else.
//! Results from the remote service are adapted into a SimulationReport
//! by adapter.rs before they reach view state.

use crate::{
    contract::{HeatLevel, Probability},
    types::{Naira, Percent, SimulationId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub id:          SimulationId,
    pub query:       String,
    pub timestamp:   DateTime<Utc>,
    pub heatmap:     HeatmapData,
    pub charts:      ChartData,
    pub segments:    Vec<UserSegment>,
    pub summary:     String,
    /// Present when the report was adapted from service metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_metrics: Option<KeyMetrics>,
}

impl SimulationReport {
    /// (region, heat) pairs for the summary panel, in heatmap order.
    pub fn regional_heat(&self) -> Vec<(&str, HeatLevel)> {
        self.heatmap
            .regions
            .iter()
            .map(|r| (r.name.as_str(), r.level()))
            .collect()
    }
}

// ── Heatmap ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapData {
    pub regions: Vec<RegionHeat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionHeat {
    pub name:       String,
    pub adoption:   Percent,
    pub resistance: Percent,
    pub color:      String,
}

/// Adoption at or above this is shown as high heat.
pub const HIGH_HEAT_ADOPTION: Percent = 70;
/// Adoption at or above this (and below high) is shown as medium heat.
pub const MEDIUM_HEAT_ADOPTION: Percent = 50;
/// Adoption above this shows an upward trend arrow.
pub const TRENDING_UP_ADOPTION: Percent = 60;

impl RegionHeat {
    pub fn level(&self) -> HeatLevel {
        if self.adoption >= HIGH_HEAT_ADOPTION {
            HeatLevel::High
        } else if self.adoption >= MEDIUM_HEAT_ADOPTION {
            HeatLevel::Medium
        } else {
            HeatLevel::Low
        }
    }

    /// Trend arrow shown next to the region name.
    pub fn trending_up(&self) -> bool {
        self.adoption > TRENDING_UP_ADOPTION
    }
}

// ── Charts ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub adoption_curve:     Vec<AdoptionPoint>,
    pub revenue_projection: Vec<RevenuePoint>,
    pub market_share:       Vec<MarketShareSlice>,
}

impl ChartData {
    pub fn market_share_total(&self) -> Percent {
        self.market_share.iter().map(|s| s.value).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdoptionPoint {
    pub month: String,
    pub users: f64,
    /// Churn rate in percent.
    pub churn: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub month:   String,
    pub revenue: Naira,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub costs:   Option<Naira>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketShareSlice {
    pub segment: String,
    pub value:   Percent,
    pub color:   String,
}

// ── Segments ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSegment {
    pub id:           String,
    pub name:         String,
    /// Share of the addressable market, in percent.
    pub size:         Percent,
    pub demographics: Demographics,
    pub behavior:     SegmentBehavior,
    pub color:        String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub age_range: String,
    pub income:    String,
    pub location:  String,
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentBehavior {
    pub adoption_rate: Percent,
    pub avg_spend:     u32,
    pub retention:     Percent,
}

// ── Key metrics ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub adoption_probability: Probability,
    pub churn_risk:           Probability,
    pub referral_likelihood:  Probability,
}
