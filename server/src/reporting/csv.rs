//! CSV report rendering
//!
//! Serializes a [`DashboardPayload`] into a flat tabular report with a
//! fixed section order: header block, Summary, Daily Trends, Monthly
//! Revenue, Top Chefs, Top Campaigns, Top Foods. A blank row separates
//! sections; short series are padded with zeros rather than truncating
//! the date axis.

use shared::error::{AppError, AppResult};

use super::dashboard::DashboardPayload;

type Writer = csv::Writer<Vec<u8>>;

fn row(writer: &mut Writer, fields: &[String]) -> Result<(), csv::Error> {
    writer.write_record(fields)
}

fn kv(writer: &mut Writer, key: &str, value: impl ToString) -> Result<(), csv::Error> {
    writer.write_record([key, value.to_string().as_str()])
}

fn blank_row(writer: &mut Writer) -> Result<(), csv::Error> {
    writer.write_record([""])
}

/// Render the dashboard payload as CSV bytes.
pub fn render_csv(payload: &DashboardPayload) -> AppResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    write_sections(&mut writer, payload)
        .map_err(|e| AppError::render_failed(format!("CSV write failed: {e}")))?;

    writer
        .into_inner()
        .map_err(|e| AppError::render_failed(format!("CSV flush failed: {e}")))
}

fn write_sections(writer: &mut Writer, payload: &DashboardPayload) -> Result<(), csv::Error> {
    let range = &payload.range;
    let summary = &payload.summary;
    let daily = &payload.last_30_days;
    let yearly = &payload.yearly_revenue;
    let top = &payload.top_performers;

    writer.write_record(["Admin Dashboard Report"])?;
    kv(writer, "Range Label", &range.label)?;
    kv(writer, "Start Date", &range.start_date)?;
    kv(writer, "End Date", &range.end_date)?;
    blank_row(writer)?;

    writer.write_record(["Summary"])?;
    writer.write_record(["Metric", "Value"])?;
    kv(writer, "Total Users", summary.total_users)?;
    kv(writer, "Total Chefs", summary.total_chefs)?;
    kv(writer, "Campaigns (Range)", summary.campaigns_in_range)?;
    kv(writer, "Recharge/Revenue (Range)", summary.recharge_in_range)?;
    kv(writer, "Orders (Range)", summary.orders_in_range)?;
    blank_row(writer)?;

    writer.write_record(["Daily Trends"])?;
    writer.write_record(["Date", "Campaigns", "Recharge", "Orders"])?;
    for (idx, label) in daily.labels.iter().enumerate() {
        row(
            writer,
            &[
                label.clone(),
                daily
                    .campaigns_per_day
                    .get(idx)
                    .copied()
                    .unwrap_or(0)
                    .to_string(),
                daily
                    .recharge_per_day
                    .get(idx)
                    .copied()
                    .unwrap_or(0.0)
                    .to_string(),
                daily
                    .orders_per_day
                    .get(idx)
                    .copied()
                    .unwrap_or(0)
                    .to_string(),
            ],
        )?;
    }
    blank_row(writer)?;

    row(writer, &[format!("Monthly Revenue ({})", yearly.year)])?;
    writer.write_record(["Month", "Revenue"])?;
    for (idx, month) in yearly.labels.iter().enumerate() {
        kv(
            writer,
            month,
            yearly.revenue_per_month.get(idx).copied().unwrap_or(0.0),
        )?;
    }
    blank_row(writer)?;

    writer.write_record(["Top Chefs By Revenue"])?;
    writer.write_record(["Chef", "Revenue"])?;
    for chef in &top.chefs_by_revenue {
        kv(writer, &chef.chef, chef.revenue)?;
    }
    blank_row(writer)?;

    writer.write_record(["Top Campaigns By Orders"])?;
    writer.write_record(["Campaign", "Chef", "Orders"])?;
    for campaign in &top.campaigns_by_orders {
        row(
            writer,
            &[
                campaign.title.clone(),
                campaign.chef.clone(),
                campaign.total_orders.to_string(),
            ],
        )?;
    }
    blank_row(writer)?;

    writer.write_record(["Top Foods By Quantity Sold"])?;
    writer.write_record(["Food", "Quantity Sold"])?;
    for food in &top.foods_by_quantity {
        kv(writer, &food.name, food.quantity_sold)?;
    }

    Ok(())
}
