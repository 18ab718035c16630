//! Admin dashboard queries
//!
//! Fetches the raw record sets the dashboard builder aggregates: counts,
//! date-bucketed group-bys, per-chef and per-month transaction sums, the
//! top-campaigns ordering, and the food-name lookup. Each call reads
//! whatever snapshot the store yields; no cross-query transaction is
//! taken.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use sqlx::SqlitePool;

use crate::reporting::dashboard::{
    CampaignStanding, ChefAmount, DashboardSource, DayAmount, DayCount, MonthAmount, OrderItemsRow,
};
use crate::reporting::range::ReportRange;

async fn count_users_with_role(pool: &SqlitePool, role: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = ?")
        .bind(role)
        .fetch_one(pool)
        .await
}

async fn count_all_users(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}

async fn count_chefs(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM chefs")
        .fetch_one(pool)
        .await
}

async fn count_in_range(
    pool: &SqlitePool,
    table_time: (&str, &str),
    start: NaiveDate,
    end: NaiveDate,
) -> Result<i64, sqlx::Error> {
    let (table, time_column) = table_time;
    let sql = format!(
        "SELECT COUNT(*) FROM {table} \
         WHERE date({time_column}) >= date(?) AND date({time_column}) <= date(?)"
    );
    sqlx::query_scalar(&sql)
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await
}

async fn sum_amount_in_range(
    pool: &SqlitePool,
    table: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<f64, sqlx::Error> {
    let sql = format!(
        "SELECT COALESCE(SUM(amount), 0.0) FROM {table} \
         WHERE date(transaction_time) >= date(?) AND date(transaction_time) <= date(?)"
    );
    sqlx::query_scalar(&sql)
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await
}

async fn counts_per_day(
    pool: &SqlitePool,
    table_time: (&str, &str),
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DayCount>, sqlx::Error> {
    let (table, time_column) = table_time;
    let sql = format!(
        "SELECT date({time_column}) AS day, COUNT(*) AS total FROM {table} \
         WHERE date({time_column}) >= date(?) AND date({time_column}) <= date(?) \
         GROUP BY day ORDER BY day"
    );
    sqlx::query_as(&sql).bind(start).bind(end).fetch_all(pool).await
}

async fn amounts_per_day(
    pool: &SqlitePool,
    table: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DayAmount>, sqlx::Error> {
    let sql = format!(
        "SELECT date(transaction_time) AS day, SUM(amount) AS total FROM {table} \
         WHERE date(transaction_time) >= date(?) AND date(transaction_time) <= date(?) \
         GROUP BY day ORDER BY day"
    );
    sqlx::query_as(&sql).bind(start).bind(end).fetch_all(pool).await
}

async fn amounts_by_chef(
    pool: &SqlitePool,
    table: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<ChefAmount>, sqlx::Error> {
    // GROUP BY uses the default BINARY collation: chef names are grouped
    // case-sensitively, exactly as stored.
    let sql = format!(
        "SELECT chef, SUM(amount) AS total FROM {table} \
         WHERE date(transaction_time) >= date(?) AND date(transaction_time) <= date(?) \
         GROUP BY chef"
    );
    sqlx::query_as(&sql).bind(start).bind(end).fetch_all(pool).await
}

async fn amounts_by_month(
    pool: &SqlitePool,
    table: &str,
    year_start: NaiveDate,
    year_end: NaiveDate,
) -> Result<Vec<MonthAmount>, sqlx::Error> {
    let sql = format!(
        "SELECT CAST(strftime('%m', transaction_time) AS INTEGER) AS month, \
         SUM(amount) AS total FROM {table} \
         WHERE date(transaction_time) >= date(?) AND date(transaction_time) <= date(?) \
         GROUP BY month"
    );
    sqlx::query_as(&sql)
        .bind(year_start)
        .bind(year_end)
        .fetch_all(pool)
        .await
}

/// Top campaigns in range by `(total_orders desc, start_time desc)`, or the
/// system-wide top five when the range has none.
async fn top_campaigns(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<CampaignStanding>, sqlx::Error> {
    let in_range: Vec<CampaignStanding> = sqlx::query_as(
        "SELECT id, title, chef, total_orders FROM campaigns \
         WHERE date(start_time) >= date(?) AND date(start_time) <= date(?) \
         ORDER BY total_orders DESC, start_time DESC LIMIT 5",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    if !in_range.is_empty() {
        return Ok(in_range);
    }

    sqlx::query_as(
        "SELECT id, title, chef, total_orders FROM campaigns \
         ORDER BY total_orders DESC, start_time DESC LIMIT 5",
    )
    .fetch_all(pool)
    .await
}

async fn order_items_in_range(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<OrderItemsRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT food_items, quantity FROM orders \
         WHERE date(order_time) >= date(?) AND date(order_time) <= date(?)",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

async fn food_name_map(pool: &SqlitePool) -> Result<HashMap<String, String>, sqlx::Error> {
    let rows: Vec<(String, String)> = sqlx::query_as("SELECT id, food_name FROM foods")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().collect())
}

/// Fetch every record set the admin dashboard aggregates for this range.
pub async fn fetch_dashboard_source(
    pool: &SqlitePool,
    range: &ReportRange,
) -> Result<DashboardSource, sqlx::Error> {
    let start = range.start_date;
    let end = range.end_date;

    let year = end.year();
    let year_start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(end);
    let year_end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(end);

    Ok(DashboardSource {
        user_role_count: count_users_with_role(pool, "user").await?,
        user_total_count: count_all_users(pool).await?,
        chef_count: count_chefs(pool).await?,
        campaigns_in_range: count_in_range(pool, ("campaigns", "start_time"), start, end).await?,
        orders_in_range: count_in_range(pool, ("orders", "order_time"), start, end).await?,
        pending_recharge_total: sum_amount_in_range(pool, "pending_transactions", start, end)
            .await?,
        completed_recharge_total: sum_amount_in_range(pool, "transaction_history", start, end)
            .await?,
        campaigns_per_day: counts_per_day(pool, ("campaigns", "start_time"), start, end).await?,
        orders_per_day: counts_per_day(pool, ("orders", "order_time"), start, end).await?,
        pending_per_day: amounts_per_day(pool, "pending_transactions", start, end).await?,
        completed_per_day: amounts_per_day(pool, "transaction_history", start, end).await?,
        pending_by_chef: amounts_by_chef(pool, "pending_transactions", start, end).await?,
        completed_by_chef: amounts_by_chef(pool, "transaction_history", start, end).await?,
        top_campaigns: top_campaigns(pool, start, end).await?,
        order_items: order_items_in_range(pool, start, end).await?,
        pending_by_month: amounts_by_month(pool, "pending_transactions", year_start, year_end)
            .await?,
        completed_by_month: amounts_by_month(pool, "transaction_history", year_start, year_end)
            .await?,
        food_names: food_name_map(pool).await?,
    })
}
