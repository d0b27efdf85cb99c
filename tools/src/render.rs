//! Plain-text rendering of reports and history for the terminal.

use ideasim_core::{
    dashboard::HistoryState,
    history::{HistoryMetrics, HistoryRecord},
    report::SimulationReport,
};

const BAR_WIDTH: usize = 20;

fn bar(percent: u32) -> String {
    let filled = (percent.min(100) as usize * BAR_WIDTH) / 100;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

pub fn print_report(report: &SimulationReport) {
    println!("=== SIMULATION {} ===", report.id);
    println!("  query:     \"{}\"", report.query);
    println!("  timestamp: {}", report.timestamp.to_rfc3339());

    if let Some(metrics) = &report.key_metrics {
        println!();
        println!("=== KEY METRICS ===");
        println!("  adoption probability: {}%", metrics.adoption_probability.as_percent());
        println!("  churn risk:           {}%", metrics.churn_risk.as_percent());
        println!("  referral likelihood:  {}%", metrics.referral_likelihood.as_percent());
    }

    println!();
    println!("=== HEATMAP ===");
    for region in &report.heatmap.regions {
        println!(
            "  {:<14} {} adoption {} {:>3}% | resistance {} {:>3}% [{}]",
            region.name,
            if region.trending_up() { "^" } else { "v" },
            bar(region.adoption),
            region.adoption,
            bar(region.resistance),
            region.resistance,
            region.level().label(),
        );
    }

    println!();
    println!("=== ADOPTION vs CHURN ===");
    for point in &report.charts.adoption_curve {
        println!("  {:<4} users {:>9.0} | churn {:>5.1}%", point.month, point.users, point.churn);
    }

    println!();
    println!("=== REVENUE PROJECTION ===");
    for point in &report.charts.revenue_projection {
        match point.costs {
            Some(costs) => println!(
                "  {:<8} revenue ₦{:>10.0} | costs ₦{:>10.0}",
                point.month, point.revenue, costs
            ),
            None => println!("  {:<8} revenue ₦{:>10.0}", point.month, point.revenue),
        }
    }

    println!();
    println!("=== MARKET SHARE ===");
    for slice in &report.charts.market_share {
        println!("  {:<20} {:>3}% {}", slice.segment, slice.value, bar(slice.value));
    }

    println!();
    println!("=== USER SEGMENTS ===");
    for segment in &report.segments {
        println!("  {} ({}% of market)", segment.name, segment.size);
        println!(
            "    age {} | income {} | {}",
            segment.demographics.age_range, segment.demographics.income, segment.demographics.location
        );
        if !segment.demographics.interests.is_empty() {
            println!("    interests: {}", segment.demographics.interests.join(", "));
        }
        println!(
            "    adoption {}% | avg spend ₦{} | retention {}%",
            segment.behavior.adoption_rate, segment.behavior.avg_spend, segment.behavior.retention
        );
    }

    println!();
    println!("=== SUMMARY ===");
    for (region, heat) in report.regional_heat() {
        println!("  {region}: {}", heat.label());
    }
    println!("  {}", report.summary);
}

pub fn print_history(state: &HistoryState) {
    println!("=== SIMULATION HISTORY ===");
    match state {
        HistoryState::Loading => println!("  (loading)"),
        HistoryState::Empty => println!("  No simulations yet."),
        HistoryState::Unavailable { reason } => {
            println!("  History is unavailable right now: {reason}")
        }
        HistoryState::Loaded { records } => {
            for record in records {
                print_history_record(record);
            }
        }
    }
}

fn print_history_record(record: &HistoryRecord) {
    let date = record
        .timestamp
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let category = record.category.as_deref().unwrap_or("");
    println!("  [{date}] {category:<14} {}", record.query_text());

    match &record.metrics {
        Some(HistoryMetrics::Fixture { adoption, target_users, projected_revenue }) => println!(
            "      adoption {adoption}% | target {target_users} | revenue {projected_revenue}"
        ),
        Some(HistoryMetrics::Service { adoption_probability, churn_risk, referral_likelihood }) => {
            let pct = |p: &Option<ideasim_core::contract::Probability>| {
                p.map(|p| format!("{}%", p.as_percent())).unwrap_or_default()
            };
            println!(
                "      adoption {} | churn {} | referral {}",
                pct(adoption_probability),
                pct(churn_risk),
                pct(referral_likelihood)
            );
        }
        None => {}
    }
    if let Some(summary) = &record.summary {
        println!("      {summary}");
    }
}

/// Detail view for one selected history record.
pub fn print_history_detail(record: &HistoryRecord) {
    println!("=== SIMULATION DETAIL ===");
    print_history_record(record);

    if let Some(revenue) = &record.revenue_projection {
        println!("  Revenue projection:");
        for (month, amount) in revenue.points() {
            println!("    Month {month:<3} ₦{amount:>14.0}");
        }
    }
    if let Some(segments) = &record.customer_segments {
        println!("  Customer segments:");
        for (segment, pct) in segments.to_percentages() {
            println!("    {:<14} {pct:>3}%", segment.label());
        }
    }
    if let Some(heat) = &record.regional_heat {
        println!("  Regional heat:");
        for (region, level) in heat {
            println!("    {region:<14} {}", level.label());
        }
    }
}
