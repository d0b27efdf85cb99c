//! Shared primitive types used across the workspace.

/// Identifier of a single simulation result.
pub type SimulationId = String;

/// A whole-number percentage in 0..=100, as the display widgets consume it.
pub type Percent = u32;

/// Monetary amount in naira.
pub type Naira = f64;

/// Short month labels used on every monthly curve.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun",
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Label for the zero-based month index, wrapping after December.
pub fn month_label(index: usize) -> &'static str {
    MONTH_LABELS[index % MONTH_LABELS.len()]
}
