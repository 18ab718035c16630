//! Bar chart drawing commands
//!
//! Emits raw PDF content-stream operators: `re`/`f` filled bars over a
//! stroked frame with three interior guide lines, y-axis value labels at
//! quarter steps, and a bounded number of x-axis tick labels so long
//! series stay legible.

use std::collections::BTreeSet;

use super::encoding::escape_text;
use crate::reporting::round2;

/// Chart geometry and data for one bar chart.
pub struct BarChart<'a> {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub values: &'a [f64],
    /// Fill color as RGB fractions
    pub color: (f64, f64, f64),
    pub x_labels: &'a [String],
    pub max_x_ticks: usize,
}

/// Downsample a series to at most `max_points` by chunk-averaging.
///
/// Chunk boundaries are rounded, so points map unevenly when the length
/// is not a multiple of the target count; each chunk is labeled with its
/// last source label.
pub fn downsample_with_labels(
    values: &[f64],
    labels: &[String],
    max_points: usize,
) -> (Vec<f64>, Vec<String>) {
    if values.len() <= max_points {
        let labels = labels.iter().take(values.len()).cloned().collect();
        return (values.to_vec(), labels);
    }

    let chunk_size = values.len() as f64 / max_points as f64;
    let mut sampled_values = Vec::with_capacity(max_points);
    let mut sampled_labels = Vec::with_capacity(max_points);
    for idx in 0..max_points {
        let start = (idx as f64 * chunk_size).round() as usize;
        let end = (((idx + 1) as f64 * chunk_size).round() as usize).max(start + 1);
        let segment = &values[start.min(values.len())..end.min(values.len())];
        let average = if segment.is_empty() {
            0.0
        } else {
            segment.iter().sum::<f64>() / segment.len() as f64
        };
        sampled_values.push(average);

        let label_index = (end - 1).min(labels.len().saturating_sub(1));
        sampled_labels.push(labels.get(label_index).cloned().unwrap_or_default());
    }
    (sampled_values, sampled_labels)
}

/// Evenly spaced tick positions, always including both endpoints.
fn tick_indices(count: usize, max_ticks: usize) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }
    if count <= max_ticks {
        return (0..count).collect();
    }
    let steps = (max_ticks - 1).max(1);
    let last = count - 1;
    let mut picked = BTreeSet::new();
    for idx in 0..max_ticks {
        picked.insert(((idx * last) as f64 / steps as f64).round() as usize);
    }
    picked.into_iter().collect()
}

/// Format an axis value with K/M suffixes above 1e3/1e6.
fn format_axis_value(value: f64) -> String {
    let absolute = value.abs();
    if absolute >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if absolute >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

/// Shorten an x label: ISO dates drop the year, anything else is clipped.
fn short_x_label(label: &str) -> String {
    let bytes = label.as_bytes();
    if bytes.len() >= 10 && bytes[4] == b'-' && bytes[7] == b'-' {
        return label[5..].to_string();
    }
    label.chars().take(8).collect()
}

/// Emit the drawing commands for one bar chart.
pub fn bar_chart_commands(chart: &BarChart) -> Vec<String> {
    let BarChart {
        x,
        y,
        width,
        height,
        ..
    } = *chart;

    let mut commands = Vec::new();
    commands.push(format!(
        "BT /F1 10 Tf {x:.2} {:.2} Td ({}) Tj ET",
        y + height + 12.0,
        escape_text(&chart.title)
    ));

    // Chart frame
    commands.push("0.76 0.81 0.88 RG".to_string());
    commands.push("0.8 w".to_string());
    commands.push(format!("{x:.2} {y:.2} {width:.2} {height:.2} re S"));

    // Horizontal guides
    commands.push("0.88 0.90 0.95 RG".to_string());
    for idx in 1..4 {
        let guide_y = y + (height * idx as f64 / 4.0);
        commands.push(format!(
            "{x:.2} {guide_y:.2} m {:.2} {guide_y:.2} l S",
            x + width
        ));
    }

    let max_value = chart
        .values
        .iter()
        .copied()
        .fold(1.0_f64, |max, value| max.max(value));
    let count = chart.values.len().max(1);
    let gap = (width * 0.01).max(1.8);
    let total_gap = gap * (count + 1) as f64;
    let bar_width = ((width - total_gap) / count as f64).max(1.0);

    let (r, g, b) = chart.color;
    commands.push(format!("{r:.3} {g:.3} {b:.3} rg"));
    for (idx, value) in chart.values.iter().enumerate() {
        let bar_height = (value / max_value) * (height - 8.0);
        let bar_x = x + gap + idx as f64 * (bar_width + gap);
        let bar_y = y + 2.0;
        commands.push(format!(
            "{bar_x:.2} {bar_y:.2} {bar_width:.2} {bar_height:.2} re f"
        ));
    }

    // Y-axis value labels at 0/25/50/75/100% of max
    commands.push("0.16 0.19 0.25 rg".to_string());
    for idx in 0..5 {
        let ratio = idx as f64 / 4.0;
        let y_value = max_value * ratio;
        let y_pos = y + (height * ratio) - 3.0;
        let label_x = x - 30.0;
        commands.push(format!(
            "BT /F1 7 Tf {label_x:.2} {y_pos:.2} Td ({}) Tj ET",
            escape_text(&format_axis_value(y_value))
        ));
    }

    // X-axis labels, only at tick positions to avoid overlap
    let fallback_labels: Vec<String> = (chart.x_labels.len()..count)
        .map(|idx| (idx + 1).to_string())
        .collect();
    for idx in tick_indices(count, chart.max_x_ticks) {
        let label = chart
            .x_labels
            .get(idx)
            .cloned()
            .unwrap_or_else(|| fallback_labels[idx - chart.x_labels.len()].clone());
        let bar_x = x + gap + idx as f64 * (bar_width + gap);
        let label_x = bar_x + (bar_width / 2.0) - 10.0;
        let label_y = y - 11.0;
        commands.push(format!(
            "BT /F1 7 Tf {label_x:.2} {label_y:.2} Td ({}) Tj ET",
            escape_text(&short_x_label(&label))
        ));
    }

    commands.push(format!(
        "BT /F1 8 Tf {:.2} {:.2} Td (Max: {}) Tj ET",
        x + width - 120.0,
        y + height + 1.0,
        escape_text(&round2(max_value).to_string())
    ));
    commands
}
