//! Loosely typed food-id extraction
//!
//! The `food_items` field on orders and campaigns predates any schema
//! discipline: it may hold a JSON array of ids, a JSON object keyed by id,
//! or a plain comma-separated list. This parser recovers the referenced
//! ids with an ordered fallback chain and never fails — a malformed JSON
//! payload falls through to comma splitting rather than erroring.

use serde_json::Value;

/// Extract referenced food ids from a raw `food_items` value.
///
/// Order of appearance is preserved and duplicates are kept: callers that
/// attribute per-referenced-id count each occurrence.
pub fn parse_food_ids(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    if raw.starts_with('[') || raw.starts_with('{') {
        if let Ok(parsed) = serde_json::from_str::<Value>(raw) {
            match parsed {
                Value::Array(items) => {
                    return items
                        .iter()
                        .map(element_to_id)
                        .filter(|id| !id.is_empty())
                        .collect();
                }
                // Object form maps food id -> quantity; the ids are the keys.
                Value::Object(map) => {
                    return map
                        .keys()
                        .map(|key| key.trim().to_string())
                        .filter(|id| !id.is_empty())
                        .collect();
                }
                _ => {}
            }
        }
    }

    raw.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(String::from)
        .collect()
}

fn element_to_id(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}
