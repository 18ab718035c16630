//! Scheduled report dispatch
//!
//! One pass over the due report schedules: resolve the schedule's range,
//! aggregate, render CSV, and hand the attachment to the mail collaborator.
//! A single recipient's failure is recorded and never blocks the rest of
//! the batch.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use sqlx::SqlitePool;

use crate::db;
use crate::email::{MailAttachment, Mailer};
use crate::error::ServiceResult;

use super::csv::render_csv;
use super::dashboard::build_dashboard_payload;
use super::range::ReportRange;

/// Result of one dispatch pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub sent: u32,
    pub failed: u32,
}

fn schedule_plan(frequency: &str) -> (&'static str, Duration) {
    if frequency == "monthly" {
        ("month", Duration::days(30))
    } else {
        ("7d", Duration::days(7))
    }
}

/// Run one dispatch pass over every due schedule.
pub async fn run_once(
    pool: &SqlitePool,
    mailer: &dyn Mailer,
    now: DateTime<Utc>,
    tz: Tz,
) -> ServiceResult<DispatchOutcome> {
    let due = db::schedules::list_due(pool, now).await?;
    if due.is_empty() {
        tracing::info!("No scheduled dashboard reports are due.");
        return Ok(DispatchOutcome::default());
    }

    let today = now.with_timezone(&tz).date_naive();
    let mut outcome = DispatchOutcome::default();

    for schedule in due {
        let (range_key, next_offset) = schedule_plan(&schedule.frequency);

        let range = match ReportRange::resolve(Some(range_key), None, None, today) {
            Ok(range) => range,
            Err(err) => {
                outcome.failed += 1;
                tracing::warn!(
                    email = %schedule.email,
                    error = %err,
                    "Skipping schedule: invalid range"
                );
                continue;
            }
        };

        let source = match db::dashboard::fetch_dashboard_source(pool, &range).await {
            Ok(source) => source,
            Err(err) => {
                outcome.failed += 1;
                tracing::warn!(
                    email = %schedule.email,
                    error = %err,
                    "Skipping schedule: dashboard query failed"
                );
                continue;
            }
        };
        let payload = build_dashboard_payload(&range, &source);

        let csv_bytes = match render_csv(&payload) {
            Ok(bytes) => bytes,
            Err(err) => {
                outcome.failed += 1;
                tracing::warn!(
                    email = %schedule.email,
                    error = %err,
                    "Skipping schedule: CSV render failed"
                );
                continue;
            }
        };

        let subject = format!("Food Now Admin Dashboard Report ({})", payload.range.label);
        let body = format!(
            "Hello Admin,\n\n\
             Please find the attached scheduled dashboard report.\n\n\
             Range: {} to {}\n\
             Generated at: {}\n\n\
             Regards,\nFood Now",
            payload.range.start_date,
            payload.range.end_date,
            now.to_rfc3339(),
        );
        let attachment = MailAttachment {
            filename: format!(
                "admin-dashboard-report-{}-{}.csv",
                payload.range.start_date, payload.range.end_date
            ),
            mime: "text/csv".to_string(),
            bytes: csv_bytes,
        };

        match mailer
            .send(&schedule.email, &subject, &body, Some(attachment))
            .await
        {
            Ok(()) => {
                db::schedules::mark_sent(pool, schedule.id, now, now + next_offset).await?;
                outcome.sent += 1;
                tracing::info!(email = %schedule.email, "Sent scheduled dashboard report");
            }
            Err(err) => {
                outcome.failed += 1;
                tracing::warn!(
                    email = %schedule.email,
                    error = %err,
                    "Failed to deliver scheduled report"
                );
            }
        }
    }

    tracing::info!(
        sent = outcome.sent,
        failed = outcome.failed,
        "Scheduled dashboard report job complete"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;
    use crate::email::MailError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordedMail {
        to: String,
        subject: String,
        attachment_name: String,
        attachment_bytes: Vec<u8>,
    }

    /// Mailer that fails for one recipient and records the rest.
    struct FlakyMailer {
        fail_for: String,
        sent: Mutex<Vec<RecordedMail>>,
    }

    impl FlakyMailer {
        fn new(fail_for: &str) -> Self {
            Self {
                fail_for: fail_for.to_string(),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Mailer for FlakyMailer {
        async fn send(
            &self,
            to: &str,
            subject: &str,
            _body: &str,
            attachment: Option<MailAttachment>,
        ) -> Result<(), MailError> {
            if to == self.fail_for {
                return Err("smtp connection refused".into());
            }
            let attachment = attachment.expect("report mail carries an attachment");
            self.sent.lock().unwrap().push(RecordedMail {
                to: to.to_string(),
                subject: subject.to_string(),
                attachment_name: attachment.filename,
                attachment_bytes: attachment.bytes,
            });
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        "2025-03-15T08:00:00Z".parse().unwrap()
    }

    fn tz() -> Tz {
        chrono_tz::UTC
    }

    async fn seed_due_schedule(pool: &sqlx::SqlitePool, email: &str, frequency: &str) -> i64 {
        let schedule = db::schedules::upsert(pool, email, frequency, true, now() - Duration::days(40))
            .await
            .unwrap();
        schedule.id
    }

    #[tokio::test]
    async fn test_no_due_schedules() {
        let pool = memory_pool().await;
        let mailer = FlakyMailer::new("nobody");
        let outcome = run_once(&pool, &mailer, now(), tz()).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::default());
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delivery_failure_is_isolated() {
        let pool = memory_pool().await;
        seed_due_schedule(&pool, "a@campus.edu", "weekly").await;
        seed_due_schedule(&pool, "b@campus.edu", "monthly").await;

        let mailer = FlakyMailer::new("a@campus.edu");
        let outcome = run_once(&pool, &mailer, now(), tz()).await.unwrap();
        assert_eq!(outcome.sent, 1);
        assert_eq!(outcome.failed, 1);

        let schedules = db::schedules::list_all(&pool).await.unwrap();
        let failed = schedules.iter().find(|s| s.email == "a@campus.edu").unwrap();
        let delivered = schedules.iter().find(|s| s.email == "b@campus.edu").unwrap();

        // The failed schedule keeps its overdue next_run_at and stays unsent
        assert!(failed.last_sent_at.is_none());
        assert!(failed.next_run_at.unwrap() < now());

        // The delivered one is stamped and advanced by its monthly period
        assert_eq!(delivered.last_sent_at.unwrap(), now());
        assert_eq!(delivered.next_run_at.unwrap(), now() + Duration::days(30));
    }

    #[tokio::test]
    async fn test_weekly_schedule_advances_seven_days() {
        let pool = memory_pool().await;
        seed_due_schedule(&pool, "ops@campus.edu", "weekly").await;

        let mailer = FlakyMailer::new("nobody");
        let outcome = run_once(&pool, &mailer, now(), tz()).await.unwrap();
        assert_eq!(outcome.sent, 1);

        let schedules = db::schedules::list_all(&pool).await.unwrap();
        assert_eq!(schedules[0].next_run_at.unwrap(), now() + Duration::days(7));

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent[0].to, "ops@campus.edu");
        // Weekly reports cover the 7d range
        assert_eq!(
            sent[0].subject,
            "Food Now Admin Dashboard Report (Last 7 Days)"
        );
        assert_eq!(
            sent[0].attachment_name,
            "admin-dashboard-report-2025-03-09-2025-03-15.csv"
        );
        assert!(!sent[0].attachment_bytes.is_empty());
    }

    #[tokio::test]
    async fn test_monthly_schedule_uses_month_range() {
        let pool = memory_pool().await;
        seed_due_schedule(&pool, "ops@campus.edu", "monthly").await;

        let mailer = FlakyMailer::new("nobody");
        run_once(&pool, &mailer, now(), tz()).await.unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(
            sent[0].subject,
            "Food Now Admin Dashboard Report (This Month)"
        );
        assert_eq!(
            sent[0].attachment_name,
            "admin-dashboard-report-2025-03-01-2025-03-15.csv"
        );
    }

    #[tokio::test]
    async fn test_delivered_schedule_not_due_again() {
        let pool = memory_pool().await;
        seed_due_schedule(&pool, "ops@campus.edu", "weekly").await;

        let mailer = FlakyMailer::new("nobody");
        run_once(&pool, &mailer, now(), tz()).await.unwrap();
        let outcome = run_once(&pool, &mailer, now(), tz()).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::default());
        assert_eq!(mailer.sent.lock().unwrap().len(), 1);
    }
}
