//! Wire contract of the remote simulation service.
//!
//! Probabilities are FRACTIONS in [0, 1]. The service has been seen
//! answering in percentages, so a wire value in (1, 100] is read as a
//! percentage and scaled down; anything else outside [0, 1] is rejected.

use crate::{
    error::{SimError, SimResult},
    types::Percent,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Minimum number of monthly points on the adoption/retention curves.
pub const MIN_CURVE_MONTHS: usize = 5;
/// Allowed drift of the customer segment fractions away from 1.0.
pub const SEGMENT_SUM_TOLERANCE: f64 = 0.05;

// ── Probability ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Probability(f64);

impl Probability {
    pub const ZERO: Probability = Probability(0.0);
    pub const ONE: Probability = Probability(1.0);

    /// Strict constructor: only finite values in [0, 1].
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && (0.0..=1.0).contains(&value)).then_some(Self(value))
    }

    /// Lenient constructor for values read off the wire.
    pub fn from_wire(value: f64) -> Result<Self, String> {
        if let Some(p) = Self::new(value) {
            return Ok(p);
        }
        if value.is_finite() && value > 1.0 && value <= 100.0 {
            log::warn!("probability {value} read as a percentage");
            return Ok(Self(value / 100.0));
        }
        Err(format!("probability out of range: {value}"))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn as_percent(self) -> Percent {
        (self.0 * 100.0).round() as Percent
    }

    /// 1 − p.
    pub fn complement(self) -> Self {
        Self(1.0 - self.0)
    }
}

impl<'de> Deserialize<'de> for Probability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Self::from_wire(raw).map_err(serde::de::Error::custom)
    }
}

// ── Region heat ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatLevel {
    High,
    Medium,
    Low,
}

impl HeatLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::High   => "high",
            Self::Medium => "medium",
            Self::Low    => "low",
        }
    }
}

// ── Segments ───────────────────────────────────────────────────────

/// The three sub-populations the service reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractSegment {
    Students,
    WorkingClass,
    Entrepreneurs,
}

impl ContractSegment {
    pub const ALL: [ContractSegment; 3] = [
        ContractSegment::Students,
        ContractSegment::WorkingClass,
        ContractSegment::Entrepreneurs,
    ];

    /// Wire key, as used in `customer_segments`.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Students      => "students",
            Self::WorkingClass  => "working_class",
            Self::Entrepreneurs => "entrepreneurs",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Students      => "Students",
            Self::WorkingClass  => "Working Class",
            Self::Entrepreneurs => "Entrepreneurs",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSegments {
    pub students:      f64,
    pub working_class: f64,
    pub entrepreneurs: f64,
}

impl CustomerSegments {
    pub fn share(&self, segment: ContractSegment) -> f64 {
        match segment {
            ContractSegment::Students      => self.students,
            ContractSegment::WorkingClass  => self.working_class,
            ContractSegment::Entrepreneurs => self.entrepreneurs,
        }
    }

    pub fn total(&self) -> f64 {
        self.students + self.working_class + self.entrepreneurs
    }

    /// Whole percentages summing to exactly 100 (largest remainder).
    /// All zeros when the fractions sum to zero.
    pub fn to_percentages(&self) -> [(ContractSegment, Percent); 3] {
        let total = self.total();
        let mut out = ContractSegment::ALL.map(|s| (s, 0));
        if total <= 0.0 || !total.is_finite() {
            return out;
        }

        let exact = ContractSegment::ALL.map(|s| self.share(s).max(0.0) / total * 100.0);
        let mut assigned: Percent = 0;
        for (slot, value) in out.iter_mut().zip(exact.iter()) {
            slot.1 = value.floor() as Percent;
            assigned += slot.1;
        }

        let mut order: Vec<usize> = (0..exact.len()).collect();
        order.sort_by(|&a, &b| {
            let fa = exact[a] - exact[a].floor();
            let fb = exact[b] - exact[b].floor();
            fb.partial_cmp(&fa).unwrap_or(std::cmp::Ordering::Equal)
        });
        for &i in order.iter().cycle().take(100u32.saturating_sub(assigned) as usize) {
            out[i].1 += 1;
        }
        out
    }
}

// ── Revenue ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueProjection {
    pub month_1:  f64,
    pub month_3:  f64,
    pub month_6:  f64,
    pub month_12: f64,
}

impl RevenueProjection {
    /// (month number, revenue) in chronological order.
    pub fn points(&self) -> [(u32, f64); 4] {
        [
            (1, self.month_1),
            (3, self.month_3),
            (6, self.month_6),
            (12, self.month_12),
        ]
    }
}

/// The service sends either a numeric score or a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndustryFit {
    Score(f64),
    Label(String),
}

// ── Metrics ────────────────────────────────────────────────────────

/// A simulation result as the service returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Not sent by the service; merged in by the caller.
    #[serde(default)]
    pub query: String,
    pub adoption_probability: Probability,
    pub churn_risk:           Probability,
    pub referral_likelihood:  Probability,
    #[serde(default)]
    pub regional_heat:        BTreeMap<String, HeatLevel>,
    pub adoption_curve:       Vec<f64>,
    /// Retained fraction per month, index-aligned with `adoption_curve`.
    pub retention_curve:      Vec<Probability>,
    pub revenue_projection:   RevenueProjection,
    pub customer_segments:    CustomerSegments,
    #[serde(default)]
    pub satisfaction_score:   Option<f64>,
    #[serde(default)]
    pub break_even_point_months: Option<f64>,
    #[serde(default)]
    pub industry_fit:         Option<IndustryFit>,
    #[serde(default)]
    pub summary:              String,
}

impl SimulationMetrics {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Check the invariants the display adapters rely on.
    pub fn validate(&self) -> SimResult<()> {
        if self.adoption_curve.len() < MIN_CURVE_MONTHS {
            return Err(SimError::invalid_response(format!(
                "adoption_curve has {} points, need at least {MIN_CURVE_MONTHS}",
                self.adoption_curve.len()
            )));
        }
        if self.adoption_curve.len() != self.retention_curve.len() {
            return Err(SimError::invalid_response(format!(
                "adoption_curve ({}) and retention_curve ({}) lengths differ",
                self.adoption_curve.len(),
                self.retention_curve.len()
            )));
        }
        if let Some(bad) = self.adoption_curve.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(SimError::invalid_response(format!("adoption_curve value {bad}")));
        }

        for segment in ContractSegment::ALL {
            let share = self.customer_segments.share(segment);
            if !share.is_finite() || share < 0.0 {
                return Err(SimError::invalid_response(format!(
                    "customer segment {} has share {share}",
                    segment.label()
                )));
            }
        }
        let total = self.customer_segments.total();
        if (total - 1.0).abs() > SEGMENT_SUM_TOLERANCE {
            return Err(SimError::invalid_response(format!(
                "customer segments sum to {total:.3}, expected ~1"
            )));
        }

        for (month, revenue) in self.revenue_projection.points() {
            if !revenue.is_finite() || revenue < 0.0 {
                return Err(SimError::invalid_response(format!(
                    "revenue for month {month} is {revenue}"
                )));
            }
        }

        if self.regional_heat.keys().any(|name| name.trim().is_empty()) {
            return Err(SimError::invalid_response("regional_heat has an unnamed region"));
        }
        Ok(())
    }
}

/// Request body of `POST /api/simulate`.
#[derive(Debug, Clone, Serialize)]
pub struct SimulateRequest<'a> {
    pub scenario: &'a str,
}
