//! Application state

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::config::Config;
use crate::email::{Mailer, SmtpMailer};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// JWT secret for user authentication
    pub jwt_secret: String,
    /// Timezone used to resolve dashboard ranges
    pub timezone: Tz,
    /// Mail transport for scheduled reports; `None` when SMTP is unconfigured
    pub mailer: Option<Arc<dyn Mailer>>,
}

impl AppState {
    /// Create a new AppState: open the database, run migrations, build the mailer
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        // Build connection options: WAL, foreign keys, normal sync
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", config.database_path))
            .map_err(|e| format!("Invalid database path: {e}"))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| format!("Failed to open database: {e}"))?;

        // busy_timeout: 写冲突时等待 5s 而非立即失败
        sqlx::query("PRAGMA busy_timeout = 5000;")
            .execute(&pool)
            .await
            .map_err(|e| format!("Failed to set busy_timeout: {e}"))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        crate::db::MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| format!("Failed to apply migrations: {e}"))?;
        tracing::info!("Database migrations applied");

        let mailer: Option<Arc<dyn Mailer>> = match &config.smtp {
            Some(smtp) => {
                let smtp_mailer = SmtpMailer::new(smtp, &config.mail_from)?;
                Some(Arc::new(smtp_mailer))
            }
            None => None,
        };

        Ok(Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            timezone: config.timezone,
            mailer,
        })
    }

    /// Current local date in the configured report timezone
    pub fn today(&self) -> NaiveDate {
        chrono::Utc::now().with_timezone(&self.timezone).date_naive()
    }
}
