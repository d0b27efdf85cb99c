//! Mock simulation generator.
//!
//! Region and segment numbers are uniform draws from the fixture
//! ranges; the curves and market share are copied from the fixture
//! unchanged, so they have the same shape on every call. Only the
//! summary text and the random draws depend on the call.

use crate::{
    config::GeneratorConfig,
    contract::{
        ContractSegment, CustomerSegments, IndustryFit, Probability, RevenueProjection,
        SimulationMetrics,
    },
    report::{HeatmapData, RegionHeat, SegmentBehavior, SimulationReport, UserSegment},
    rng::{RngBank, StreamRng, StreamSlot},
    summary,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub struct MockGenerator {
    config: GeneratorConfig,
    bank:   RngBank,
    calls:  u64,
}

impl MockGenerator {
    /// Generator seeded from the platform RNG.
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_bank(config, RngBank::unseeded())
    }

    /// Reproducible generator: the same seed yields the same sequence
    /// of results.
    pub fn seeded(config: GeneratorConfig, seed: u64) -> Self {
        Self::with_bank(config, RngBank::new(seed))
    }

    fn with_bank(config: GeneratorConfig, bank: RngBank) -> Self {
        Self { config, bank, calls: 0 }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn master_seed(&self) -> u64 {
        self.bank.master_seed()
    }

    pub fn generate(&mut self, query: &str) -> SimulationReport {
        self.generate_at(query, Utc::now())
    }

    pub fn generate_at(&mut self, query: &str, now: DateTime<Utc>) -> SimulationReport {
        let call = self.next_call();

        let mut id_rng = self.bank.for_stream_at_call(StreamSlot::Id, call);
        let id = uuid::Builder::from_random_bytes(id_rng.next_bytes16())
            .into_uuid()
            .to_string();

        let mut region_rng = self.bank.for_stream_at_call(StreamSlot::Region, call);
        let regions = self.draw_regions(&mut region_rng);

        let mut segment_rng = self.bank.for_stream_at_call(StreamSlot::Segment, call);
        let segments = self
            .config
            .segments
            .iter()
            .map(|profile| UserSegment {
                id:           profile.id.clone(),
                name:         profile.name.clone(),
                size:         profile.size,
                demographics: profile.demographics.clone(),
                behavior: SegmentBehavior {
                    adoption_rate: draw(&mut segment_rng, profile.adoption_rate),
                    avg_spend:     draw(&mut segment_rng, profile.avg_spend),
                    retention:     draw(&mut segment_rng, profile.retention),
                },
                color: profile.color.clone(),
            })
            .collect();

        log::debug!("call={call} generated mock report {id}");

        SimulationReport {
            id,
            query: query.to_string(),
            timestamp: now,
            heatmap: HeatmapData { regions },
            charts: self.config.curves.clone(),
            segments,
            summary: summary::synthesize(query),
            key_metrics: None,
        }
    }

    /// A service-shaped result built from the same fixtures, so the
    /// mock can stand in for the remote service end to end.
    pub fn generate_metrics(&mut self, query: &str) -> SimulationMetrics {
        let call = self.next_call();
        let mut rng = self.bank.for_stream_at_call(StreamSlot::Metrics, call);

        let regions = self.draw_regions(&mut rng);
        let regional_heat: BTreeMap<_, _> = regions
            .iter()
            .map(|r| (r.name.clone(), r.level()))
            .collect();
        let mean_adoption = regions.iter().map(|r| f64::from(r.adoption)).sum::<f64>()
            / regions.len().max(1) as f64;

        let curves = &self.config.curves;
        let adoption_curve: Vec<f64> = curves.adoption_curve.iter().map(|p| p.users).collect();
        let retention_curve: Vec<Probability> = curves
            .adoption_curve
            .iter()
            .map(|p| fraction(1.0 - p.churn / 100.0))
            .collect();
        let final_churn = curves.adoption_curve.last().map_or(0.0, |p| p.churn / 100.0);

        let revenue: Vec<f64> = curves.revenue_projection.iter().map(|p| p.revenue).collect();
        let break_even = curves
            .revenue_projection
            .iter()
            .position(|p| p.costs.is_some_and(|c| p.revenue >= c))
            .map(|i| (i + 1) as f64);

        let mut shares = [0.0; 3];
        for (slot, segment) in shares.iter_mut().zip(ContractSegment::ALL) {
            *slot = self
                .config
                .segment_for(segment)
                .map_or(0.0, |profile| f64::from(profile.size));
        }
        let share_total: f64 = shares.iter().sum();
        let share = |i: usize| if share_total > 0.0 { shares[i] / share_total } else { 0.0 };

        let retention_draws: Vec<f64> = self
            .config
            .segments
            .iter()
            .map(|profile| f64::from(draw(&mut rng, profile.retention)))
            .collect();
        let satisfaction = retention_draws.iter().sum::<f64>()
            / retention_draws.len().max(1) as f64
            / 100.0;

        log::debug!("call={call} generated mock metrics for {} regions", regions.len());

        SimulationMetrics {
            query: query.to_string(),
            adoption_probability: fraction(mean_adoption / 100.0),
            churn_risk: fraction(final_churn),
            referral_likelihood: fraction(round2(0.2 + 0.3 * rng.next_f64())),
            regional_heat,
            adoption_curve,
            retention_curve,
            revenue_projection: RevenueProjection {
                month_1:  revenue_at(&revenue, 1),
                month_3:  revenue_at(&revenue, 3),
                month_6:  revenue_at(&revenue, 6),
                month_12: revenue_at(&revenue, 12),
            },
            customer_segments: CustomerSegments {
                students:      share(0),
                working_class: share(1),
                entrepreneurs: share(2),
            },
            satisfaction_score: Some(round2(satisfaction)),
            break_even_point_months: break_even,
            industry_fit: Some(IndustryFit::Label(summary::category_for(query).to_string())),
            summary: summary::synthesize(query),
        }
    }

    fn draw_regions(&self, rng: &mut StreamRng) -> Vec<RegionHeat> {
        self.config
            .regions
            .iter()
            .map(|profile| RegionHeat {
                name:       profile.name.clone(),
                adoption:   draw(rng, profile.adoption),
                resistance: draw(rng, profile.resistance),
                color:      profile.color.clone(),
            })
            .collect()
    }

    fn next_call(&mut self) -> u64 {
        let call = self.calls;
        self.calls += 1;
        call
    }
}

fn draw(rng: &mut StreamRng, range: crate::config::UniformRange) -> u32 {
    rng.uniform_from(range.base, range.span)
}

fn fraction(value: f64) -> Probability {
    Probability::new(value.clamp(0.0, 1.0)).unwrap_or(Probability::ZERO)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Revenue for a 1-based month, extrapolating linearly past the curve.
fn revenue_at(revenue: &[f64], month: usize) -> f64 {
    match revenue {
        [] => 0.0,
        [only] => *only,
        _ if month <= revenue.len() => revenue[month.max(1) - 1],
        _ => {
            let last = revenue[revenue.len() - 1];
            let step = last - revenue[revenue.len() - 2];
            (last + step * (month - revenue.len()) as f64).max(0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revenue_extrapolates_past_the_curve() {
        let revenue = [10.0, 20.0, 30.0];
        assert_eq!(revenue_at(&revenue, 1), 10.0);
        assert_eq!(revenue_at(&revenue, 3), 30.0);
        assert_eq!(revenue_at(&revenue, 6), 60.0);
        assert_eq!(revenue_at(&[], 12), 0.0);
    }

    #[test]
    fn mock_metrics_pass_contract_validation() {
        let mut generator = MockGenerator::seeded(GeneratorConfig::builtin(), 99);
        let metrics = generator.generate_metrics("Launch a fintech app");
        metrics.validate().unwrap();
        assert_eq!(metrics.break_even_point_months, Some(3.0));
        assert_eq!(metrics.regional_heat.len(), 4);
        assert_eq!(
            metrics.industry_fit,
            Some(IndustryFit::Label("FinTech".into()))
        );
    }
}
