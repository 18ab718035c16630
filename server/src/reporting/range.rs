//! Symbolic date-range resolution
//!
//! Turns a range selector (`today`, `7d`, `30d`, `month`, `custom`) plus
//! optional explicit bounds into a concrete inclusive date window. This is
//! the reporting core's only validation boundary: once a [`ReportRange`]
//! exists, downstream stages trust it.

use chrono::{Datelike, Duration, NaiveDate};
use shared::error::{AppError, AppResult};

/// Longest window a single report may cover, inclusive of both endpoints.
const MAX_DAY_SPAN: i64 = 366;

/// A resolved, validated report window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRange {
    /// Normalized range key
    pub key: String,
    /// Human-readable label
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Inclusive day count: `(end_date - start_date) + 1`
    pub day_span: i64,
}

fn range_label(key: &str) -> &'static str {
    match key {
        "today" => "Today",
        "7d" => "Last 7 Days",
        "30d" => "Last 30 Days",
        "month" => "This Month",
        _ => "Custom Range",
    }
}

fn safe_date_parse(value: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value?.trim(), "%Y-%m-%d").ok()
}

impl ReportRange {
    /// Resolve a symbolic range against the caller-supplied current date.
    ///
    /// `range_key` defaults to `30d`. `custom` requires both bounds as
    /// `YYYY-MM-DD`. Fails with [`shared::error::ErrorCode::ReportRangeInvalid`]
    /// on an unknown key, missing/unparseable custom bounds, an inverted
    /// window, or a span over 366 days.
    pub fn resolve(
        range_key: Option<&str>,
        start_raw: Option<&str>,
        end_raw: Option<&str>,
        today: NaiveDate,
    ) -> AppResult<Self> {
        let normalized = range_key.unwrap_or("30d").trim().to_lowercase();
        let normalized = if normalized.is_empty() {
            "30d".to_string()
        } else {
            normalized
        };

        let (start_date, end_date) = match normalized.as_str() {
            "today" => (today, today),
            "7d" => (today - Duration::days(6), today),
            "30d" => (today - Duration::days(29), today),
            "month" => (today.with_day(1).unwrap_or(today), today),
            "custom" => {
                let start = safe_date_parse(start_raw);
                let end = safe_date_parse(end_raw);
                match (start, end) {
                    (Some(start), Some(end)) => (start, end),
                    _ => {
                        return Err(AppError::invalid_range(
                            "For custom range, start_date and end_date are required (YYYY-MM-DD).",
                        ));
                    }
                }
            }
            _ => {
                return Err(AppError::invalid_range(
                    "Invalid range. Use: today, 7d, 30d, month, custom.",
                ));
            }
        };

        if start_date > end_date {
            return Err(AppError::invalid_range(
                "start_date cannot be after end_date.",
            ));
        }

        let day_span = (end_date - start_date).num_days() + 1;
        if day_span > MAX_DAY_SPAN {
            return Err(AppError::invalid_range(
                "Date range is too large. Please use 366 days or fewer.",
            ));
        }

        Ok(Self {
            label: range_label(&normalized).to_string(),
            key: normalized,
            start_date,
            end_date,
            day_span,
        })
    }

    /// Every date in the window, start to end inclusive.
    pub fn date_axis(&self) -> Vec<NaiveDate> {
        (0..self.day_span)
            .map(|offset| self.start_date + Duration::days(offset))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    #[test]
    fn test_resolve_today() {
        let range = ReportRange::resolve(Some("today"), None, None, today()).unwrap();
        assert_eq!(range.start_date, today());
        assert_eq!(range.end_date, today());
        assert_eq!(range.day_span, 1);
        assert_eq!(range.label, "Today");
    }

    #[test]
    fn test_resolve_7d() {
        let range = ReportRange::resolve(Some("7d"), None, None, today()).unwrap();
        assert_eq!(range.start_date, NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
        assert_eq!(range.end_date, today());
        assert_eq!(range.day_span, 7);
    }

    #[test]
    fn test_resolve_30d_is_default() {
        let explicit = ReportRange::resolve(Some("30d"), None, None, today()).unwrap();
        let defaulted = ReportRange::resolve(None, None, None, today()).unwrap();
        assert_eq!(explicit, defaulted);
        assert_eq!(explicit.day_span, 30);
        assert_eq!(
            explicit.start_date,
            NaiveDate::from_ymd_opt(2025, 2, 14).unwrap()
        );
    }

    #[test]
    fn test_resolve_month() {
        let range = ReportRange::resolve(Some("month"), None, None, today()).unwrap();
        assert_eq!(range.start_date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(range.end_date, today());
        assert_eq!(range.day_span, 15);
        assert_eq!(range.label, "This Month");
    }

    #[test]
    fn test_resolve_normalizes_key() {
        let range = ReportRange::resolve(Some("  TODAY "), None, None, today()).unwrap();
        assert_eq!(range.key, "today");
    }

    #[test]
    fn test_resolve_custom() {
        let range = ReportRange::resolve(
            Some("custom"),
            Some("2025-01-01"),
            Some("2025-01-31"),
            today(),
        )
        .unwrap();
        assert_eq!(range.day_span, 31);
        assert_eq!(range.label, "Custom Range");
    }

    #[test]
    fn test_custom_requires_both_bounds() {
        for (start, end) in [
            (None, None),
            (Some("2025-01-01"), None),
            (None, Some("2025-01-31")),
            (Some("not-a-date"), Some("2025-01-31")),
        ] {
            let err = ReportRange::resolve(Some("custom"), start, end, today()).unwrap_err();
            assert_eq!(err.code, ErrorCode::ReportRangeInvalid);
        }
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = ReportRange::resolve(Some("90d"), None, None, today()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ReportRangeInvalid);
    }

    #[test]
    fn test_inverted_window_rejected() {
        let err = ReportRange::resolve(
            Some("custom"),
            Some("2025-02-01"),
            Some("2025-01-01"),
            today(),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReportRangeInvalid);
        assert_eq!(err.message, "start_date cannot be after end_date.");
    }

    #[test]
    fn test_oversized_window_rejected() {
        // 367 days inclusive
        let err = ReportRange::resolve(
            Some("custom"),
            Some("2024-01-01"),
            Some("2025-01-01"),
            today(),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReportRangeInvalid);

        // Exactly 366 days is still allowed (leap year window)
        let range = ReportRange::resolve(
            Some("custom"),
            Some("2024-01-01"),
            Some("2024-12-31"),
            today(),
        )
        .unwrap();
        assert_eq!(range.day_span, 366);
    }

    #[test]
    fn test_day_span_matches_axis_for_all_keys() {
        for key in ["today", "7d", "30d", "month"] {
            let range = ReportRange::resolve(Some(key), None, None, today()).unwrap();
            let axis = range.date_axis();
            assert_eq!(axis.len() as i64, range.day_span);
            assert_eq!(axis.first(), Some(&range.start_date));
            assert_eq!(axis.last(), Some(&range.end_date));
            assert_eq!(
                range.day_span,
                (range.end_date - range.start_date).num_days() + 1
            );
        }
    }
}
