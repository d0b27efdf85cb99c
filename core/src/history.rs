//! Past simulations: record shape and the built-in fixture.
//!
//! Records come from two sources with different metric shapes, so
//! every field is optional at the boundary and `metrics` is a union.

use crate::contract::{CustomerSegments, HeatLevel, Probability, RevenueProjection};
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// One past simulation. Any field that is missing or has the wrong type
/// reads as `None`; only a non-object element is unreadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawHistoryRecord")]
pub struct HistoryRecord {
    pub id:        Option<String>,
    pub query:     Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub category:  Option<String>,
    pub metrics:   Option<HistoryMetrics>,
    pub summary:   Option<String>,
    /// Detail-view fields sent by the history endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_projection: Option<RevenueProjection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_segments:  Option<CustomerSegments>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regional_heat:      Option<BTreeMap<String, HeatLevel>>,
}

impl HistoryRecord {
    /// The query text, blank when the record carries none.
    pub fn query_text(&self) -> &str {
        self.query.as_deref().unwrap_or("")
    }

    /// Headline adoption figure in percent, whichever shape the metrics take.
    pub fn adoption_percent(&self) -> Option<u32> {
        match self.metrics.as_ref()? {
            HistoryMetrics::Fixture { adoption, .. } => Some(*adoption),
            HistoryMetrics::Service { adoption_probability, .. } => {
                adoption_probability.map(|p| p.as_percent())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryMetrics {
    /// Shape of the built-in fixture.
    Fixture {
        adoption: u32,
        #[serde(rename = "targetUsers")]
        target_users: String,
        #[serde(rename = "projectedRevenue")]
        projected_revenue: String,
    },
    /// Shape returned by the history endpoint.
    Service {
        #[serde(default, deserialize_with = "lenient_probability")]
        adoption_probability: Option<Probability>,
        #[serde(default, deserialize_with = "lenient_probability")]
        churn_risk:           Option<Probability>,
        #[serde(default, deserialize_with = "lenient_probability")]
        referral_likelihood:  Option<Probability>,
    },
}

/// Wire form of a record: every field untyped, resolved field by field.
/// The service keys its records by `_id`; older rows carry `scenario`.
#[derive(Deserialize)]
struct RawHistoryRecord {
    #[serde(default, rename = "_id")]
    object_id: Value,
    #[serde(default)]
    id:        Value,
    #[serde(default)]
    query:     Value,
    #[serde(default)]
    scenario:  Value,
    #[serde(default)]
    timestamp: Value,
    #[serde(default)]
    category:  Value,
    #[serde(default)]
    metrics:   Value,
    #[serde(default)]
    summary:   Value,
    #[serde(default)]
    revenue_projection: Value,
    #[serde(default)]
    customer_segments:  Value,
    #[serde(default)]
    regional_heat:      Value,
}

impl From<RawHistoryRecord> for HistoryRecord {
    fn from(raw: RawHistoryRecord) -> Self {
        Self {
            id:        identifier(raw.object_id).or_else(|| identifier(raw.id)),
            query:     text(raw.query).or_else(|| text(raw.scenario)),
            timestamp: timestamp(raw.timestamp),
            category:  text(raw.category),
            metrics:   typed(raw.metrics),
            summary:   text(raw.summary),
            revenue_projection: typed(raw.revenue_projection),
            customer_segments:  typed(raw.customer_segments),
            regional_heat:      heat_levels(raw.regional_heat),
        }
    }
}

fn text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        _ => None,
    }
}

/// String ids as-is, integer ids in decimal.
fn identifier(value: Value) -> Option<String> {
    match value {
        Value::Number(n) if n.is_u64() || n.is_i64() => Some(n.to_string()),
        other => text(other),
    }
}

fn typed<T: serde::de::DeserializeOwned>(value: Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    serde_json::from_value(value).ok()
}

/// RFC 3339, an offset-less ISO timestamp (read as UTC), or epoch
/// milliseconds. Anything else reads as absent.
fn timestamp(value: Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| Utc.from_utc_datetime(&naive))
            }),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

/// Regions with an unrecognised label are dropped; label case is ignored.
fn heat_levels(value: Value) -> Option<BTreeMap<String, HeatLevel>> {
    let Value::Object(entries) = value else {
        return None;
    };
    let levels = entries
        .into_iter()
        .filter_map(|(region, level)| {
            let label = level.as_str()?.to_lowercase();
            let level = serde_json::from_value(Value::String(label)).ok()?;
            Some((region, level))
        })
        .collect();
    Some(levels)
}

/// Out-of-range or non-numeric values read as absent.
fn lenient_probability<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Probability>, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    Ok(raw.as_f64().and_then(|v| Probability::from_wire(v).ok()))
}

// ── Fixture ────────────────────────────────────────────────────────

/// Days before "now" of each fixture record, newest first.
pub const FIXTURE_AGES_DAYS: [i64; 5] = [2, 5, 7, 10, 14];

static FIXTURE: OnceLock<Vec<HistoryRecord>> = OnceLock::new();

/// The built-in history list. Timestamps are fixed at first access,
/// so every call returns the same records.
pub fn history_fixture() -> &'static [HistoryRecord] {
    FIXTURE.get_or_init(|| history_fixture_at(Utc::now()))
}

/// The built-in history list relative to an explicit clock.
pub fn history_fixture_at(now: DateTime<Utc>) -> Vec<HistoryRecord> {
    let rows: [(&str, &str, u32, &str, &str, &str); 5] = [
        (
            "Launch a fintech app for small businesses in Nigeria",
            "FinTech",
            78,
            "2.5M SMEs",
            "₦850M",
            "Strong market opportunity with high adoption potential among urban SME owners. \
             Key challenges include regulatory compliance and customer acquisition costs.",
        ),
        (
            "Create a food delivery service in Abuja",
            "Food Tech",
            65,
            "800K residents",
            "₦320M",
            "Moderate market potential with strong demand in affluent neighborhoods. \
             Competition from existing players presents challenges but opportunities exist \
             in underserved areas.",
        ),
        (
            "Build an AI tutoring platform for secondary schools",
            "EdTech",
            72,
            "12M students",
            "₦1.2B",
            "High market potential driven by educational digitization trends. Strong adoption \
             expected among tech-savvy students and progressive schools.",
        ),
        (
            "Launch a ride-sharing service for university campuses",
            "Transportation",
            84,
            "3.2M students",
            "₦680M",
            "Excellent market fit with high adoption rates among university students. Limited \
             competition in campus-specific transportation creates significant opportunity.",
        ),
        (
            "Create a digital marketplace for local artisans",
            "E-Commerce",
            56,
            "1.8M artisans",
            "₦420M",
            "Moderate adoption potential hampered by digital literacy challenges. Strong \
             opportunity exists with proper training and support infrastructure.",
        ),
    ];

    rows.iter()
        .zip(FIXTURE_AGES_DAYS)
        .enumerate()
        .map(|(i, (&(query, category, adoption, users, revenue, summary), age))| HistoryRecord {
            id:        Some((i + 1).to_string()),
            query:     Some(query.to_string()),
            timestamp: Some(now - Duration::days(age)),
            category:  Some(category.to_string()),
            metrics:   Some(HistoryMetrics::Fixture {
                adoption,
                target_users: users.to_string(),
                projected_revenue: revenue.to_string(),
            }),
            summary:   Some(summary.to_string()),
            revenue_projection: None,
            customer_segments:  None,
            regional_heat:      None,
        })
        .collect()
}
