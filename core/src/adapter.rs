//! Service metrics → display report.

use crate::{
    config::GeneratorConfig,
    contract::{ContractSegment, HeatLevel, Probability, SimulationMetrics},
    report::{
        AdoptionPoint, ChartData, HeatmapData, KeyMetrics, MarketShareSlice, RegionHeat,
        RevenuePoint, SegmentBehavior, SimulationReport, UserSegment,
    },
    types::{month_label, Percent},
};
use chrono::{DateTime, Utc};

/// Numeric stand-ins for a coarse heat label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatDisplay {
    pub adoption:   Percent,
    pub resistance: Percent,
    pub color:      &'static str,
}

pub fn heat_display(level: HeatLevel) -> HeatDisplay {
    match level {
        HeatLevel::High   => HeatDisplay { adoption: 80, resistance: 15, color: "green" },
        HeatLevel::Medium => HeatDisplay { adoption: 60, resistance: 25, color: "blue" },
        HeatLevel::Low    => HeatDisplay { adoption: 35, resistance: 45, color: "orange" },
    }
}

/// Market-share colors, in ContractSegment::ALL order.
const SEGMENT_COLORS: [&str; 3] = ["#10B981", "#3B82F6", "#F59E0B"];

pub struct ReportAdapter {
    config: GeneratorConfig,
}

impl ReportAdapter {
    /// `config` supplies the demographic fixtures for segment cards.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn to_report(&self, metrics: &SimulationMetrics) -> SimulationReport {
        self.to_report_at(metrics, uuid::Uuid::new_v4().to_string(), Utc::now())
    }

    pub fn to_report_at(
        &self,
        metrics: &SimulationMetrics,
        id: String,
        now: DateTime<Utc>,
    ) -> SimulationReport {
        SimulationReport {
            id,
            query: metrics.query.clone(),
            timestamp: now,
            heatmap: heatmap(metrics),
            charts: ChartData {
                adoption_curve:     adoption_points(metrics),
                revenue_projection: revenue_points(metrics),
                market_share:       market_share(metrics),
            },
            segments: self.segment_cards(metrics),
            summary: metrics.summary.clone(),
            key_metrics: Some(KeyMetrics {
                adoption_probability: metrics.adoption_probability,
                churn_risk:           metrics.churn_risk,
                referral_likelihood:  metrics.referral_likelihood,
            }),
        }
    }

    fn segment_cards(&self, metrics: &SimulationMetrics) -> Vec<UserSegment> {
        let retention: Probability = metrics.churn_risk.complement();
        metrics
            .customer_segments
            .to_percentages()
            .into_iter()
            .map(|(segment, size)| match self.config.segment_for(segment) {
                Some(profile) => UserSegment {
                    id:           profile.id.clone(),
                    name:         profile.name.clone(),
                    size,
                    demographics: profile.demographics.clone(),
                    behavior: SegmentBehavior {
                        adoption_rate: metrics.adoption_probability.as_percent(),
                        avg_spend:     profile.avg_spend.midpoint(),
                        retention:     retention.as_percent(),
                    },
                    color: profile.color.clone(),
                },
                None => bare_card(segment, size, metrics),
            })
            .collect()
    }
}

fn bare_card(segment: ContractSegment, size: Percent, metrics: &SimulationMetrics) -> UserSegment {
    log::warn!("no demographic fixture for segment {}", segment.label());
    UserSegment {
        id:   segment.key().to_string(),
        name: segment.label().to_string(),
        size,
        demographics: crate::report::Demographics {
            age_range: String::new(),
            income:    String::new(),
            location:  String::new(),
            interests: Vec::new(),
        },
        behavior: SegmentBehavior {
            adoption_rate: metrics.adoption_probability.as_percent(),
            avg_spend:     0,
            retention:     metrics.churn_risk.complement().as_percent(),
        },
        color: "gray".into(),
    }
}

fn heatmap(metrics: &SimulationMetrics) -> HeatmapData {
    HeatmapData {
        regions: metrics
            .regional_heat
            .iter()
            .map(|(name, level)| {
                let display = heat_display(*level);
                RegionHeat {
                    name:       name.clone(),
                    adoption:   display.adoption,
                    resistance: display.resistance,
                    color:      display.color.to_string(),
                }
            })
            .collect(),
    }
}

fn adoption_points(metrics: &SimulationMetrics) -> Vec<AdoptionPoint> {
    metrics
        .adoption_curve
        .iter()
        .zip(&metrics.retention_curve)
        .enumerate()
        .map(|(i, (users, retained))| AdoptionPoint {
            month: month_label(i).to_string(),
            users: *users,
            churn: f64::from(retained.complement().as_percent()),
        })
        .collect()
}

fn revenue_points(metrics: &SimulationMetrics) -> Vec<RevenuePoint> {
    metrics
        .revenue_projection
        .points()
        .into_iter()
        .map(|(month, revenue)| RevenuePoint {
            month: format!("Month {month}"),
            revenue,
            costs: None,
        })
        .collect()
}

fn market_share(metrics: &SimulationMetrics) -> Vec<MarketShareSlice> {
    metrics
        .customer_segments
        .to_percentages()
        .into_iter()
        .zip(SEGMENT_COLORS)
        .map(|((segment, value), color)| MarketShareSlice {
            segment: segment.label().to_string(),
            value,
            color: color.to_string(),
        })
        .collect()
}
