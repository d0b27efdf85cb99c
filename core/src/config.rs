use crate::{
    contract::ContractSegment,
    error::{SimError, SimResult},
    report::{AdoptionPoint, ChartData, Demographics, MarketShareSlice, RevenuePoint},
    types::Percent,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ── Fixture tables ─────────────────────────────────────────────────

/// Integer draw in [base, base + span).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniformRange {
    pub base: u32,
    pub span: u32,
}

impl UniformRange {
    pub const fn new(base: u32, span: u32) -> Self {
        Self { base, span }
    }

    /// Exclusive upper bound, or None when it does not fit in a u32.
    pub fn end(&self) -> Option<u32> {
        self.base.checked_add(self.span)
    }

    pub fn contains(&self, value: u32) -> bool {
        value >= self.base && value - self.base < self.span
    }

    pub fn midpoint(&self) -> u32 {
        self.base.saturating_add(self.span / 2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionProfile {
    pub name:       String,
    pub adoption:   UniformRange,
    pub resistance: UniformRange,
    pub color:      String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentProfile {
    pub id:            String,
    pub name:          String,
    pub size:          Percent,
    pub demographics:  Demographics,
    pub adoption_rate: UniformRange,
    pub avg_spend:     UniformRange,
    pub retention:     UniformRange,
    pub color:         String,
    /// Which service-reported segment this card stands for, if any.
    #[serde(default)]
    pub contract_segment: Option<ContractSegment>,
}

#[derive(Debug, Clone, Deserialize)]
struct RegionsFile {
    regions: Vec<RegionProfile>,
}

#[derive(Debug, Clone, Deserialize)]
struct SegmentsFile {
    segments: Vec<SegmentProfile>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub regions:  Vec<RegionProfile>,
    pub segments: Vec<SegmentProfile>,
    /// Copied into every generated report unchanged.
    pub curves:   ChartData,
}

impl GeneratorConfig {
    /// Load from a data/ directory holding regions.json, segments.json
    /// and curves.json. Without one, use GeneratorConfig::builtin().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/regions.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let regions: RegionsFile = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;

        let segments_path = format!("{data_dir}/segments.json");
        let segments_content = std::fs::read_to_string(&segments_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {segments_path}: {e}"))?;
        let segments: SegmentsFile = serde_json::from_str(&segments_content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {segments_path}: {e}"))?;

        let curves_path = format!("{data_dir}/curves.json");
        let curves_content = std::fs::read_to_string(&curves_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {curves_path}: {e}"))?;
        let curves: ChartData = serde_json::from_str(&curves_content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {curves_path}: {e}"))?;

        let config = Self {
            regions: regions.regions,
            segments: segments.segments,
            curves,
        };
        config.validate()?;
        log::debug!(
            "loaded generator config from {data_dir}: {} regions, {} segments",
            config.regions.len(),
            config.segments.len()
        );
        Ok(config)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.regions.is_empty() {
            return Err(SimError::invalid_config("no regions"));
        }
        let mut names = HashSet::new();
        for region in &self.regions {
            if region.name.trim().is_empty() || !names.insert(region.name.as_str()) {
                return Err(SimError::invalid_config(format!(
                    "region name {:?} is empty or duplicated",
                    region.name
                )));
            }
            check_percent_range(&region.name, "adoption", region.adoption)?;
            check_percent_range(&region.name, "resistance", region.resistance)?;
        }

        for segment in &self.segments {
            if segment.size > 100 {
                return Err(SimError::invalid_config(format!(
                    "segment {} size {} exceeds 100",
                    segment.id, segment.size
                )));
            }
            check_percent_range(&segment.id, "adoption_rate", segment.adoption_rate)?;
            check_percent_range(&segment.id, "retention", segment.retention)?;
            if segment.avg_spend.span == 0 || segment.avg_spend.end().is_none() {
                return Err(SimError::invalid_config(format!(
                    "segment {} avg_spend range {}+[0,{}) is empty or overflows",
                    segment.id, segment.avg_spend.base, segment.avg_spend.span
                )));
            }
        }

        if self.curves.adoption_curve.is_empty() || self.curves.revenue_projection.is_empty() {
            return Err(SimError::invalid_config("curves must not be empty"));
        }
        let share: u64 = self.curves.market_share.iter().map(|s| u64::from(s.value)).sum();
        if share != 100 {
            return Err(SimError::invalid_config(format!(
                "market share sums to {share}, expected 100"
            )));
        }
        Ok(())
    }

    pub fn segment_for(&self, segment: ContractSegment) -> Option<&SegmentProfile> {
        self.segments
            .iter()
            .find(|s| s.contract_segment == Some(segment))
    }

    /// Built-in fixture tables.
    pub fn builtin() -> Self {
        Self {
            regions: vec![
                region("Lagos", (60, 40), (10, 20), "green"),
                region("Abuja", (50, 30), (15, 25), "blue"),
                region("Kano", (45, 35), (20, 30), "purple"),
                region("Port Harcourt", (55, 25), (15, 20), "orange"),
            ],
            segments: vec![
                SegmentProfile {
                    id: "1".into(),
                    name: "Tech-Savvy Millennials".into(),
                    size: 35,
                    demographics: demographics(
                        "25-35",
                        "₦200k-500k",
                        "Urban centers",
                        &["Technology", "Finance", "Entrepreneurship", "Social Media"],
                    ),
                    adoption_rate: UniformRange::new(70, 20),
                    avg_spend: UniformRange::new(15_000, 10_000),
                    retention: UniformRange::new(75, 15),
                    color: "blue".into(),
                    contract_segment: Some(ContractSegment::WorkingClass),
                },
                SegmentProfile {
                    id: "2".into(),
                    name: "University Students".into(),
                    size: 28,
                    demographics: demographics(
                        "18-25",
                        "₦50k-150k",
                        "University towns",
                        &["Education", "Gaming", "Social Media", "Budget Tools"],
                    ),
                    adoption_rate: UniformRange::new(60, 25),
                    avg_spend: UniformRange::new(5_000, 5_000),
                    retention: UniformRange::new(65, 20),
                    color: "green".into(),
                    contract_segment: Some(ContractSegment::Students),
                },
                SegmentProfile {
                    id: "3".into(),
                    name: "Small Business Owners".into(),
                    size: 22,
                    demographics: demographics(
                        "30-45",
                        "₦300k-1M",
                        "Commercial areas",
                        &["Business", "Finance", "Networking", "Growth"],
                    ),
                    adoption_rate: UniformRange::new(65, 15),
                    avg_spend: UniformRange::new(25_000, 20_000),
                    retention: UniformRange::new(80, 10),
                    color: "purple".into(),
                    contract_segment: Some(ContractSegment::Entrepreneurs),
                },
                SegmentProfile {
                    id: "4".into(),
                    name: "Rural Entrepreneurs".into(),
                    size: 15,
                    demographics: demographics(
                        "25-40",
                        "₦100k-300k",
                        "Rural communities",
                        &["Agriculture", "Trading", "Mobile Money", "Community"],
                    ),
                    adoption_rate: UniformRange::new(40, 30),
                    avg_spend: UniformRange::new(8_000, 8_000),
                    retention: UniformRange::new(60, 25),
                    color: "orange".into(),
                    contract_segment: None,
                },
            ],
            curves: ChartData {
                adoption_curve: [
                    ("Jan", 1_000.0, 5.0),
                    ("Feb", 2_500.0, 8.0),
                    ("Mar", 4_200.0, 12.0),
                    ("Apr", 6_800.0, 15.0),
                    ("May", 9_500.0, 18.0),
                    ("Jun", 12_000.0, 20.0),
                ]
                .into_iter()
                .map(|(month, users, churn)| AdoptionPoint { month: month.into(), users, churn })
                .collect(),
                revenue_projection: [
                    ("Jan", 50_000.0, 80_000.0),
                    ("Feb", 120_000.0, 150_000.0),
                    ("Mar", 200_000.0, 180_000.0),
                    ("Apr", 320_000.0, 220_000.0),
                    ("May", 480_000.0, 280_000.0),
                    ("Jun", 650_000.0, 320_000.0),
                ]
                .into_iter()
                .map(|(month, revenue, costs)| RevenuePoint {
                    month: month.into(),
                    revenue,
                    costs: Some(costs),
                })
                .collect(),
                market_share: [
                    ("Young Professionals", 35, "#3B82F6"),
                    ("Students", 28, "#10B981"),
                    ("SME Owners", 22, "#F59E0B"),
                    ("Others", 15, "#8B5CF6"),
                ]
                .into_iter()
                .map(|(segment, value, color)| MarketShareSlice {
                    segment: segment.into(),
                    value,
                    color: color.into(),
                })
                .collect(),
            },
        }
    }
}

fn check_percent_range(owner: &str, field: &str, range: UniformRange) -> SimResult<()> {
    if range.span == 0 || range.end().map_or(true, |end| end > 100) {
        return Err(SimError::invalid_config(format!(
            "{owner}.{field} range {}+[0,{}) must be non-empty and stay within 0..100",
            range.base, range.span
        )));
    }
    Ok(())
}

fn region(name: &str, adoption: (u32, u32), resistance: (u32, u32), color: &str) -> RegionProfile {
    RegionProfile {
        name: name.into(),
        adoption: UniformRange::new(adoption.0, adoption.1),
        resistance: UniformRange::new(resistance.0, resistance.1),
        color: color.into(),
    }
}

fn demographics(age_range: &str, income: &str, location: &str, interests: &[&str]) -> Demographics {
    Demographics {
        age_range: age_range.into(),
        income: income.into(),
        location: location.into(),
        interests: interests.iter().map(|i| i.to_string()).collect(),
    }
}

// ── Service endpoint ───────────────────────────────────────────────

/// Environment variable holding the simulation service base URL.
pub const API_BASE_ENV: &str = "API_BASE_URL";

/// Immutable endpoint configuration, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> SimResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(SimError::ApiNotConfigured);
        }
        Ok(Self { base_url })
    }

    pub fn from_env() -> SimResult<Self> {
        let base_url = std::env::var(API_BASE_ENV).map_err(|_| SimError::ApiNotConfigured)?;
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an `/api/...` path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
