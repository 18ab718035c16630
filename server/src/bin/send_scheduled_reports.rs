//! send-scheduled-reports — one dispatch pass over due report schedules
//!
//! Cron-friendly companion to the in-process loop: resolves each due
//! schedule's range, aggregates, renders CSV, and emails it. Exits after
//! a single pass.

use foodnow_server::{AppState, Config, reporting};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foodnow_server=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let state = AppState::new(&config).await?;

    let Some(mailer) = state.mailer.clone() else {
        return Err(
            "SMTP is not configured; set SMTP_HOST, SMTP_USERNAME, SMTP_PASSWORD".into(),
        );
    };

    let outcome = reporting::run_once(
        &state.pool,
        mailer.as_ref(),
        chrono::Utc::now(),
        state.timezone,
    )
    .await
    .map_err(|e| {
        let err: shared::error::AppError = e.into();
        Box::<dyn std::error::Error + Send + Sync>::from(err.message)
    })?;

    tracing::info!(
        sent = outcome.sent,
        failed = outcome.failed,
        "Scheduled dashboard report job complete"
    );
    Ok(())
}
