//! Dashboard reporting and analytics
//!
//! The reporting core is read-only over the record store and split into
//! pure stages: the range resolver validates a symbolic date window, the
//! db layer fetches the raw record sets for that window, and the builders
//! in [`dashboard`] / [`chef`] roll them up into payloads that the CSV and
//! PDF renderers serialize. [`dispatch`] drives the scheduled email job.

pub mod chef;
pub mod csv;
pub mod dashboard;
pub mod dispatch;
pub mod food_ids;
pub mod pdf;
pub mod range;

use serde::Serialize;

pub use dashboard::{DashboardPayload, DashboardSource, build_dashboard_payload};
pub use dispatch::{DispatchOutcome, run_once};
pub use food_ids::parse_food_ids;
pub use range::ReportRange;

/// Month labels for the yearly revenue axis, January first.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Resolved range block echoed at the top of every payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeBlock {
    pub key: String,
    pub label: String,
    pub start_date: String,
    pub end_date: String,
}

impl RangeBlock {
    pub fn from_range(range: &ReportRange) -> Self {
        Self {
            key: range.key.clone(),
            label: range.label.clone(),
            start_date: range.start_date.to_string(),
            end_date: range.end_date.to_string(),
        }
    }
}

/// Calendar-year revenue series, Jan..Dec, zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyRevenue {
    pub year: i32,
    pub labels: Vec<String>,
    pub revenue_per_month: Vec<f64>,
}

/// Round a monetary sum to 2 decimal places.
///
/// Applied only when a value is placed into an output payload; raw sums
/// stay unrounded through aggregation so rounding error does not compound.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.005), 1.0); // 1.005 is stored below 1.005 in binary
        assert_eq!(round2(2.675000001), 2.68);
        assert_eq!(round2(10.0 / 3.0), 3.33);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(-1.235), -1.24);
    }

    #[test]
    fn test_month_labels() {
        assert_eq!(MONTH_LABELS.len(), 12);
        assert_eq!(MONTH_LABELS[0], "Jan");
        assert_eq!(MONTH_LABELS[11], "Dec");
    }
}
