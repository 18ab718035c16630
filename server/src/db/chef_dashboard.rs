//! Chef dashboard queries

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::reporting::chef::{
    ChefCampaignStanding, ChefDashboardSource, ChefProfile, FoodRef, OrderRecord,
};
use crate::reporting::dashboard::DayCount;
use crate::reporting::range::ReportRange;

const CHEF_COLUMNS: &str = "chef_username, balance, campaign_points, subscription_status, \
                            total_orders_received, total_campaigns";

/// Find a chef by username: exact match first, then case-insensitive.
pub async fn find_chef(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<ChefProfile>, sqlx::Error> {
    if username.is_empty() {
        return Ok(None);
    }
    let exact: Option<ChefProfile> = sqlx::query_as(&format!(
        "SELECT {CHEF_COLUMNS} FROM chefs WHERE chef_username = ?"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;
    if exact.is_some() {
        return Ok(exact);
    }
    sqlx::query_as(&format!(
        "SELECT {CHEF_COLUMNS} FROM chefs WHERE chef_username = ? COLLATE NOCASE"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// First chef alphabetically, the admin fallback when no chef was requested.
pub async fn first_chef(pool: &SqlitePool) -> Result<Option<ChefProfile>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {CHEF_COLUMNS} FROM chefs ORDER BY chef_username LIMIT 1"
    ))
    .fetch_optional(pool)
    .await
}

async fn campaigns_in_range_count(
    pool: &SqlitePool,
    chef: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM campaigns \
         WHERE chef = ? COLLATE NOCASE \
         AND date(start_time) >= date(?) AND date(start_time) <= date(?)",
    )
    .bind(chef)
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await
}

async fn active_campaigns_count(
    pool: &SqlitePool,
    chef: &str,
    now: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM campaigns \
         WHERE chef = ? COLLATE NOCASE AND status = 'running' \
         AND datetime(start_time) <= datetime(?) \
         AND (end_time IS NULL OR datetime(end_time) >= datetime(?))",
    )
    .bind(chef)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

async fn campaigns_per_day(
    pool: &SqlitePool,
    chef: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DayCount>, sqlx::Error> {
    sqlx::query_as(
        "SELECT date(start_time) AS day, COUNT(*) AS total FROM campaigns \
         WHERE chef = ? COLLATE NOCASE \
         AND date(start_time) >= date(?) AND date(start_time) <= date(?) \
         GROUP BY day ORDER BY day",
    )
    .bind(chef)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

async fn chef_foods(pool: &SqlitePool, chef: &str) -> Result<Vec<FoodRef>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, food_name FROM foods WHERE chef = ? COLLATE NOCASE ORDER BY food_name",
    )
    .bind(chef)
    .fetch_all(pool)
    .await
}

/// All orders in the window. Attribution against the chef's food set
/// happens in the builder; the loosely typed `food_items` field cannot be
/// joined on.
async fn orders_between(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<OrderRecord>, sqlx::Error> {
    sqlx::query_as(
        "SELECT order_time, food_items, food_price, quantity FROM orders \
         WHERE date(order_time) >= date(?) AND date(order_time) <= date(?)",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

async fn top_campaigns_for_chef(
    pool: &SqlitePool,
    chef: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<ChefCampaignStanding>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, title, status, total_orders, quantity_available FROM campaigns \
         WHERE chef = ? COLLATE NOCASE \
         AND date(start_time) >= date(?) AND date(start_time) <= date(?) \
         ORDER BY total_orders DESC, start_time DESC LIMIT 5",
    )
    .bind(chef)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

/// Fetch every record set the chef dashboard aggregates for this range.
pub async fn fetch_chef_dashboard_source(
    pool: &SqlitePool,
    chef_username: &str,
    range: &ReportRange,
    now: DateTime<Utc>,
) -> Result<ChefDashboardSource, sqlx::Error> {
    let start = range.start_date;
    let end = range.end_date;

    let year = end.year();
    let year_start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(end);
    let year_end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(end);

    Ok(ChefDashboardSource {
        campaigns_in_range: campaigns_in_range_count(pool, chef_username, start, end).await?,
        active_campaigns: active_campaigns_count(pool, chef_username, now).await?,
        campaigns_per_day: campaigns_per_day(pool, chef_username, start, end).await?,
        chef_foods: chef_foods(pool, chef_username).await?,
        range_orders: orders_between(pool, start, end).await?,
        top_campaigns: top_campaigns_for_chef(pool, chef_username, start, end).await?,
        yearly_orders: orders_between(pool, year_start, year_end).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::*;
    use chrono::TimeZone;

    fn range() -> ReportRange {
        ReportRange::resolve(
            Some("7d"),
            None,
            None,
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_find_chef_exact_and_case_insensitive() {
        let pool = memory_pool().await;
        insert_chef(&pool, "Aisha", 25.0).await;

        let exact = find_chef(&pool, "Aisha").await.unwrap().unwrap();
        assert_eq!(exact.chef_username, "Aisha");
        assert_eq!(exact.balance, 25.0);

        let relaxed = find_chef(&pool, "aisha").await.unwrap().unwrap();
        assert_eq!(relaxed.chef_username, "Aisha");

        assert!(find_chef(&pool, "nobody").await.unwrap().is_none());
        assert!(find_chef(&pool, "").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_first_chef_alphabetical() {
        let pool = memory_pool().await;
        assert!(first_chef(&pool).await.unwrap().is_none());

        insert_chef(&pool, "zara", 0.0).await;
        insert_chef(&pool, "aisha", 0.0).await;
        let first = first_chef(&pool).await.unwrap().unwrap();
        assert_eq!(first.chef_username, "aisha");
    }

    #[tokio::test]
    async fn test_source_scopes_campaigns_to_chef() {
        let pool = memory_pool().await;
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
        let in_range = Utc.with_ymd_and_hms(2025, 3, 12, 8, 0, 0).unwrap();
        insert_chef(&pool, "aisha", 0.0).await;
        insert_campaign(&pool, "aisha", "Laksa Friday", 3, in_range).await;
        insert_campaign(&pool, "Aisha", "Satay Night", 1, in_range).await;
        insert_campaign(&pool, "bilal", "Roti Run", 7, in_range).await;

        let source = fetch_chef_dashboard_source(&pool, "aisha", &range(), now)
            .await
            .unwrap();
        // Case-insensitive chef match picks up both spellings
        assert_eq!(source.campaigns_in_range, 2);
        assert_eq!(source.active_campaigns, 2);
        assert_eq!(source.top_campaigns.len(), 2);
        assert_eq!(source.top_campaigns[0].title, "Laksa Friday");
        assert_eq!(source.campaigns_per_day.len(), 1);
        assert_eq!(source.campaigns_per_day[0].total, 2);
    }

    #[tokio::test]
    async fn test_active_campaigns_excludes_future_and_ended() {
        let pool = memory_pool().await;
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
        insert_chef(&pool, "aisha", 0.0).await;
        // Started, no end: active
        insert_campaign(
            &pool,
            "aisha",
            "Open",
            0,
            Utc.with_ymd_and_hms(2025, 3, 14, 8, 0, 0).unwrap(),
        )
        .await;
        // Not started yet
        insert_campaign(
            &pool,
            "aisha",
            "Future",
            0,
            Utc.with_ymd_and_hms(2025, 3, 16, 8, 0, 0).unwrap(),
        )
        .await;

        let count = active_campaigns_count(&pool, "aisha", now).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_orders_and_foods_fetched_for_attribution() {
        let pool = memory_pool().await;
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
        insert_chef(&pool, "aisha", 0.0).await;
        let food = insert_food(&pool, "Laksa", "aisha", 6.5).await;
        insert_order(
            &pool,
            &food,
            6.5,
            1,
            Utc.with_ymd_and_hms(2025, 3, 12, 12, 0, 0).unwrap(),
        )
        .await;
        // A January order only shows up in the yearly set
        insert_order(
            &pool,
            &food,
            6.5,
            1,
            Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap(),
        )
        .await;

        let source = fetch_chef_dashboard_source(&pool, "aisha", &range(), now)
            .await
            .unwrap();
        assert_eq!(source.chef_foods.len(), 1);
        assert_eq!(source.chef_foods[0].id, food);
        assert_eq!(source.range_orders.len(), 1);
        assert_eq!(source.yearly_orders.len(), 2);
    }
}
