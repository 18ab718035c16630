//! Report schedule queries

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

/// A scheduled dashboard report subscription
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReportSchedule {
    pub id: i64,
    pub email: String,
    pub frequency: String,
    pub is_active: bool,
    pub next_run_at: Option<DateTime<Utc>>,
    pub last_sent_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

const SCHEDULE_COLUMNS: &str =
    "id, email, frequency, is_active, next_run_at, last_sent_at, updated_at";

fn frequency_offset(frequency: &str) -> Duration {
    if frequency == "monthly" {
        Duration::days(30)
    } else {
        Duration::days(7)
    }
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<ReportSchedule>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {SCHEDULE_COLUMNS} FROM report_schedules ORDER BY email"
    ))
    .fetch_all(pool)
    .await
}

/// Active schedules whose next run time has passed, oldest first.
pub async fn list_due(
    pool: &SqlitePool,
    now: DateTime<Utc>,
) -> Result<Vec<ReportSchedule>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {SCHEDULE_COLUMNS} FROM report_schedules \
         WHERE is_active = 1 AND next_run_at IS NOT NULL \
         AND datetime(next_run_at) <= datetime(?) \
         ORDER BY next_run_at"
    ))
    .bind(now)
    .fetch_all(pool)
    .await
}

async fn find_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<ReportSchedule>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {SCHEDULE_COLUMNS} FROM report_schedules WHERE email = ?"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Create or update the schedule for an email address.
///
/// A new schedule's first run lands one full period from now; on update
/// a still-future `next_run_at` is kept so saving twice does not delay
/// an imminent report.
pub async fn upsert(
    pool: &SqlitePool,
    email: &str,
    frequency: &str,
    is_active: bool,
    now: DateTime<Utc>,
) -> Result<ReportSchedule, sqlx::Error> {
    let offset = frequency_offset(frequency);

    match find_by_email(pool, email).await? {
        None => {
            sqlx::query(
                "INSERT INTO report_schedules \
                 (email, frequency, is_active, next_run_at, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(email)
            .bind(frequency)
            .bind(is_active)
            .bind(now + offset)
            .bind(now)
            .bind(now)
            .execute(pool)
            .await?;
        }
        Some(existing) => {
            let next_run_at = match existing.next_run_at {
                Some(at) if at >= now => at,
                _ => now + offset,
            };
            sqlx::query(
                "UPDATE report_schedules \
                 SET frequency = ?, is_active = ?, next_run_at = ?, updated_at = ? \
                 WHERE id = ?",
            )
            .bind(frequency)
            .bind(is_active)
            .bind(next_run_at)
            .bind(now)
            .bind(existing.id)
            .execute(pool)
            .await?;
        }
    }

    find_by_email(pool, email)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

/// Record a successful delivery and advance the next run time.
pub async fn mark_sent(
    pool: &SqlitePool,
    id: i64,
    sent_at: DateTime<Utc>,
    next_run_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE report_schedules \
         SET last_sent_at = ?, next_run_at = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(sent_at)
    .bind(next_run_at)
    .bind(sent_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;

    fn now() -> DateTime<Utc> {
        "2025-03-15T08:00:00Z".parse().unwrap()
    }

    #[tokio::test]
    async fn test_upsert_creates_with_offset() {
        let pool = memory_pool().await;
        let schedule = upsert(&pool, "ops@campus.edu", "weekly", true, now())
            .await
            .unwrap();
        assert_eq!(schedule.email, "ops@campus.edu");
        assert_eq!(schedule.frequency, "weekly");
        assert!(schedule.is_active);
        assert_eq!(
            schedule.next_run_at.unwrap(),
            now() + Duration::days(7)
        );
        assert!(schedule.last_sent_at.is_none());
    }

    #[tokio::test]
    async fn test_upsert_updates_existing_by_email() {
        let pool = memory_pool().await;
        upsert(&pool, "ops@campus.edu", "weekly", true, now())
            .await
            .unwrap();
        let updated = upsert(&pool, "ops@campus.edu", "monthly", false, now())
            .await
            .unwrap();
        assert_eq!(updated.frequency, "monthly");
        assert!(!updated.is_active);
        // The still-future next_run_at from the first save is kept
        assert_eq!(updated.next_run_at.unwrap(), now() + Duration::days(7));

        let all = list_all(&pool).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_reschedules_overdue_next_run() {
        let pool = memory_pool().await;
        let created = upsert(&pool, "ops@campus.edu", "weekly", true, now())
            .await
            .unwrap();
        // Simulate time passing beyond next_run_at
        let later = created.next_run_at.unwrap() + Duration::days(1);
        let updated = upsert(&pool, "ops@campus.edu", "weekly", true, later)
            .await
            .unwrap();
        assert_eq!(updated.next_run_at.unwrap(), later + Duration::days(7));
    }

    #[tokio::test]
    async fn test_list_due_filters_and_orders() {
        let pool = memory_pool().await;
        upsert(&pool, "due@campus.edu", "weekly", true, now() - Duration::days(8))
            .await
            .unwrap();
        upsert(&pool, "later@campus.edu", "weekly", true, now())
            .await
            .unwrap();
        upsert(&pool, "inactive@campus.edu", "weekly", false, now() - Duration::days(8))
            .await
            .unwrap();

        let due = list_due(&pool, now()).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].email, "due@campus.edu");
    }

    #[tokio::test]
    async fn test_mark_sent_advances_schedule() {
        let pool = memory_pool().await;
        let schedule = upsert(&pool, "ops@campus.edu", "weekly", true, now())
            .await
            .unwrap();
        let sent_at = now() + Duration::days(7);
        mark_sent(&pool, schedule.id, sent_at, sent_at + Duration::days(7))
            .await
            .unwrap();

        let all = list_all(&pool).await.unwrap();
        assert_eq!(all[0].last_sent_at.unwrap(), sent_at);
        assert_eq!(all[0].next_run_at.unwrap(), sent_at + Duration::days(7));
    }
}
