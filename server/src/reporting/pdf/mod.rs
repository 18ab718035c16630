//! Hand-assembled PDF report rendering
//!
//! Emits a minimal, self-contained PDF 1.4 document with no external
//! encoding or compression library: one Catalog, one Pages node, one
//! shared Helvetica font, then a page + content-stream object pair per
//! page. Text pages carry the payload as word-wrapped lines; a final page
//! draws three bar charts. Object byte offsets are recorded while writing
//! so the cross-reference table and trailer are byte-exact.

mod chart;
mod encoding;

pub use chart::{BarChart, bar_chart_commands, downsample_with_labels};
pub use encoding::{encode_latin1, escape_text};

use super::dashboard::DashboardPayload;

/// US Letter media box
const MEDIA_BOX: &str = "0 0 612 792";
/// Wrap width for text pages, in characters
const WRAP_WIDTH: usize = 95;
/// Lines per text page
const LINES_PER_PAGE: usize = 46;
/// Charts downsample long series to at most this many bars
const MAX_CHART_POINTS: usize = 30;

struct Page {
    lines: Vec<String>,
    chart_commands: Vec<String>,
}

/// Render the dashboard payload as PDF bytes.
pub fn render_pdf(payload: &DashboardPayload) -> Vec<u8> {
    let mut wrapped = Vec::new();
    for line in payload_lines(payload) {
        if line.is_empty() {
            wrapped.push(String::new());
            continue;
        }
        wrapped.extend(wrap_line(&line, WRAP_WIDTH));
    }

    let mut pages: Vec<Page> = paginate(wrapped)
        .into_iter()
        .map(|lines| Page {
            lines,
            chart_commands: Vec::new(),
        })
        .collect();

    pages.push(visual_page(payload));

    build_document(&pages)
}

// ============================================================================
// Text content
// ============================================================================

fn payload_lines(payload: &DashboardPayload) -> Vec<String> {
    let range = &payload.range;
    let summary = &payload.summary;
    let daily = &payload.last_30_days;
    let yearly = &payload.yearly_revenue;
    let top = &payload.top_performers;

    let mut lines = vec![
        "Food Now - Admin Dashboard Report".to_string(),
        format!(
            "Range: {} ({} to {})",
            range.label, range.start_date, range.end_date
        ),
        String::new(),
        "Summary".to_string(),
        format!("Total Users: {}", summary.total_users),
        format!("Total Chefs: {}", summary.total_chefs),
        format!("Campaigns (Range): {}", summary.campaigns_in_range),
        format!("Recharge/Revenue (Range): {}", summary.recharge_in_range),
        format!("Orders (Range): {}", summary.orders_in_range),
        String::new(),
        "Daily Trends".to_string(),
    ];

    for (idx, label) in daily.labels.iter().enumerate() {
        lines.push(format!(
            "{} | campaigns: {} | recharge: {} | orders: {}",
            label,
            daily.campaigns_per_day.get(idx).copied().unwrap_or(0),
            daily.recharge_per_day.get(idx).copied().unwrap_or(0.0),
            daily.orders_per_day.get(idx).copied().unwrap_or(0),
        ));
    }

    lines.push(String::new());
    lines.push(format!("Monthly Revenue ({})", yearly.year));
    for (idx, month) in yearly.labels.iter().enumerate() {
        lines.push(format!(
            "{}: {}",
            month,
            yearly.revenue_per_month.get(idx).copied().unwrap_or(0.0)
        ));
    }

    lines.push(String::new());
    lines.push("Top Chefs By Revenue".to_string());
    for chef in &top.chefs_by_revenue {
        lines.push(format!("{}: {}", chef.chef, chef.revenue));
    }

    lines.push(String::new());
    lines.push("Top Campaigns By Orders".to_string());
    for campaign in &top.campaigns_by_orders {
        lines.push(format!(
            "{} | chef: {} | orders: {}",
            campaign.title, campaign.chef, campaign.total_orders
        ));
    }

    lines.push(String::new());
    lines.push("Top Foods By Quantity Sold".to_string());
    for food in &top.foods_by_quantity {
        lines.push(format!("{}: {}", food.name, food.quantity_sold));
    }

    lines
}

/// Greedy word wrap; words longer than the width are hard-split.
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let mut wrapped = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let mut word = word;
        while word.chars().count() > width {
            if !current.is_empty() {
                wrapped.push(std::mem::take(&mut current));
            }
            let split_at = word
                .char_indices()
                .nth(width)
                .map(|(pos, _)| pos)
                .unwrap_or(word.len());
            wrapped.push(word[..split_at].to_string());
            word = &word[split_at..];
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            wrapped.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        wrapped.push(current);
    }
    if wrapped.is_empty() {
        wrapped.push(String::new());
    }
    wrapped
}

fn paginate(lines: Vec<String>) -> Vec<Vec<String>> {
    let mut pages: Vec<Vec<String>> = lines
        .chunks(LINES_PER_PAGE)
        .map(|chunk| chunk.to_vec())
        .collect();
    if pages.is_empty() {
        pages.push(vec!["Admin dashboard report has no data.".to_string()]);
    }
    pages
}

fn text_commands(lines: &[String]) -> Vec<String> {
    let mut commands = vec![
        "BT".to_string(),
        "/F1 10 Tf".to_string(),
        "50 760 Td".to_string(),
        "14 TL".to_string(),
    ];
    for (idx, line) in lines.iter().enumerate() {
        commands.push(format!("({}) Tj", escape_text(line)));
        if idx < lines.len() - 1 {
            commands.push("T*".to_string());
        }
    }
    commands.push("ET".to_string());
    commands
}

// ============================================================================
// Chart page
// ============================================================================

fn visual_page(payload: &DashboardPayload) -> Page {
    let daily = &payload.last_30_days;
    let yearly = &payload.yearly_revenue;

    let (orders_series, orders_labels) = downsample_with_labels(
        &daily
            .orders_per_day
            .iter()
            .map(|v| *v as f64)
            .collect::<Vec<f64>>(),
        &daily.labels,
        MAX_CHART_POINTS,
    );
    let (campaigns_series, campaigns_labels) = downsample_with_labels(
        &daily
            .campaigns_per_day
            .iter()
            .map(|v| *v as f64)
            .collect::<Vec<f64>>(),
        &daily.labels,
        MAX_CHART_POINTS,
    );

    let mut commands = Vec::new();
    commands.extend(bar_chart_commands(&BarChart {
        x: 50.0,
        y: 430.0,
        width: 510.0,
        height: 260.0,
        title: format!("Monthly Revenue ({})", yearly.year),
        values: &yearly.revenue_per_month,
        color: (0.11, 0.66, 0.33),
        x_labels: &yearly.labels,
        max_x_ticks: 12,
    }));
    commands.extend(bar_chart_commands(&BarChart {
        x: 50.0,
        y: 120.0,
        width: 245.0,
        height: 220.0,
        title: format!("Orders ({})", payload.range.label),
        values: &orders_series,
        color: (0.15, 0.44, 0.88),
        x_labels: &orders_labels,
        max_x_ticks: 6,
    }));
    commands.extend(bar_chart_commands(&BarChart {
        x: 315.0,
        y: 120.0,
        width: 245.0,
        height: 220.0,
        title: format!("Campaigns ({})", payload.range.label),
        values: &campaigns_series,
        color: (0.90, 0.35, 0.11),
        x_labels: &campaigns_labels,
        max_x_ticks: 6,
    }));

    Page {
        lines: vec!["Visual Summary Charts".to_string(), String::new()],
        chart_commands: commands,
    }
}

// ============================================================================
// Document assembly
// ============================================================================

/// Concatenate the object arena into a document: header, numbered objects
/// with recorded byte offsets, xref table, trailer.
fn build_document(pages: &[Page]) -> Vec<u8> {
    let object_count = 3 + 2 * pages.len();
    let mut objects: Vec<Vec<u8>> = vec![Vec::new(); object_count];

    let page_object_numbers: Vec<usize> = (0..pages.len()).map(|idx| 4 + idx * 2).collect();
    let kids = page_object_numbers
        .iter()
        .map(|num| format!("{num} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");

    objects[0] = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();
    objects[1] = format!(
        "<< /Type /Pages /Kids [{kids}] /Count {} >>",
        pages.len()
    )
    .into_bytes();
    objects[2] = b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_vec();

    for (idx, page) in pages.iter().enumerate() {
        let page_obj = 4 + idx * 2;
        let content_obj = page_obj + 1;

        let mut commands = text_commands(&page.lines);
        commands.extend(page.chart_commands.iter().cloned());
        let stream_data = encode_latin1(&commands.join("\n"));

        let mut content = format!("<< /Length {} >>\nstream\n", stream_data.len()).into_bytes();
        content.extend_from_slice(&stream_data);
        content.extend_from_slice(b"\nendstream");
        objects[content_obj - 1] = content;

        objects[page_obj - 1] = format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [{MEDIA_BOX}] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {content_obj} 0 R >>"
        )
        .into_bytes();
    }

    let mut buffer: Vec<u8> = Vec::new();
    buffer.extend_from_slice(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n");

    let mut offsets = Vec::with_capacity(object_count);
    for (idx, object) in objects.iter().enumerate() {
        offsets.push(buffer.len());
        buffer.extend_from_slice(format!("{} 0 obj\n", idx + 1).as_bytes());
        buffer.extend_from_slice(object);
        buffer.extend_from_slice(b"\nendobj\n");
    }

    let xref_pos = buffer.len();
    buffer.extend_from_slice(format!("xref\n0 {}\n", object_count + 1).as_bytes());
    buffer.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        buffer.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    buffer.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_pos}\n%%EOF",
            object_count + 1
        )
        .as_bytes(),
    );
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::dashboard::{DashboardSource, build_dashboard_payload};
    use crate::reporting::range::ReportRange;
    use chrono::NaiveDate;

    fn payload_for(key: &str) -> DashboardPayload {
        let range = ReportRange::resolve(
            Some(key),
            None,
            None,
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
        )
        .unwrap();
        build_dashboard_payload(&range, &DashboardSource::default())
    }

    fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .filter(|window| *window == needle)
            .count()
    }

    #[test]
    fn test_signature_and_trailer() {
        let bytes = render_pdf(&payload_for("7d"));
        assert!(bytes.starts_with(b"%PDF-1.4\n"));
        assert!(bytes.ends_with(b"%%EOF"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Root 1 0 R"));
        assert!(text.contains("xref"));
    }

    #[test]
    fn test_object_count_matches_trailer_size() {
        // The 7d zero-data payload fits one text page, plus the chart page.
        let bytes = render_pdf(&payload_for("7d"));
        let text = String::from_utf8_lossy(&bytes);

        let obj_count = count_occurrences(&bytes, b"\nendobj\n");
        let size_marker = format!("/Size {}", obj_count + 1);
        assert!(text.contains(&size_marker), "missing {size_marker}");
    }

    #[test]
    fn test_content_streams_match_page_count() {
        // One text page + one chart page for a 7-day window
        let bytes = render_pdf(&payload_for("7d"));
        assert_eq!(count_occurrences(&bytes, b"\nendstream"), 2);
        assert_eq!(count_occurrences(&bytes, b"\nendobj\n"), 7);

        // A 30-day window adds daily-trend lines: two text pages + charts
        let bytes = render_pdf(&payload_for("30d"));
        assert_eq!(count_occurrences(&bytes, b"\nendstream"), 3);
        assert_eq!(count_occurrences(&bytes, b"\nendobj\n"), 9);
    }

    /// Byte-position search; the lossy string view cannot be used for
    /// offsets because the binary header bytes expand under replacement.
    fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack
            .windows(needle.len())
            .position(|window| window == needle)
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let bytes = render_pdf(&payload_for("7d"));

        // "startxref" also ends in "xref", so anchor on the preceding newline
        let xref_pos = find_bytes(&bytes, b"\nxref\n").unwrap() + 1;

        let startxref_at = find_bytes(&bytes, b"startxref\n").unwrap() + "startxref\n".len();
        let startxref: usize = String::from_utf8_lossy(&bytes[startxref_at..])
            .lines()
            .next()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(startxref, xref_pos);

        // Each recorded offset must land on "<n> 0 obj"
        let table = String::from_utf8_lossy(&bytes[xref_pos..]).into_owned();
        for (idx, line) in table.lines().skip(3).enumerate() {
            if !line.ends_with("n ") {
                break;
            }
            let offset: usize = line[..10].parse().unwrap();
            let expected = format!("{} 0 obj", idx + 1);
            assert!(
                bytes[offset..].starts_with(expected.as_bytes()),
                "object {} offset {} mismatched",
                idx + 1,
                offset
            );
        }
    }

    #[test]
    fn test_stream_lengths_are_exact() {
        let bytes = render_pdf(&payload_for("7d"));
        let text = String::from_utf8_lossy(&bytes);

        let mut search_from = 0;
        while let Some(rel) = text[search_from..].find("/Length ") {
            let abs = search_from + rel + "/Length ".len();
            let declared: usize = text[abs..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
                .parse()
                .unwrap();
            let stream_start = abs + text[abs..].find("stream\n").unwrap() + "stream\n".len();
            let stream_end = stream_start + text[stream_start..].find("\nendstream").unwrap();
            assert_eq!(stream_end - stream_start, declared);
            search_from = stream_end;
        }
    }

    #[test]
    fn test_charts_present_on_final_page() {
        let bytes = render_pdf(&payload_for("7d"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("Visual Summary Charts"));
        assert!(text.contains("(Monthly Revenue \\(2025\\)) Tj"));
        assert!(text.contains("(Orders \\(Last 7 Days\\)) Tj"));
        assert!(text.contains("(Campaigns \\(Last 7 Days\\)) Tj"));
    }

    #[test]
    fn test_wrap_line() {
        assert_eq!(wrap_line("short", 95), vec!["short"]);
        assert_eq!(wrap_line("", 95), vec![""]);

        let long = "word ".repeat(40);
        let wrapped = wrap_line(&long, 20);
        assert!(wrapped.iter().all(|line| line.chars().count() <= 20));
        assert_eq!(wrapped.join(" ").trim(), long.trim());

        let unbroken = "x".repeat(50);
        let wrapped = wrap_line(&unbroken, 20);
        assert_eq!(wrapped.len(), 3);
        assert_eq!(wrapped[0].len(), 20);
        assert_eq!(wrapped[2].len(), 10);
    }

    #[test]
    fn test_paginate_splits_on_page_size() {
        let lines: Vec<String> = (0..100).map(|idx| idx.to_string()).collect();
        let pages = paginate(lines);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].len(), 46);
        assert_eq!(pages[2].len(), 8);

        let empty = paginate(Vec::new());
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0][0], "Admin dashboard report has no data.");
    }
}
