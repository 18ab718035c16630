//! foodnow-server — campus food-ordering marketplace backend
//!
//! Long-running service that:
//! - Serves the dashboard/reporting API (JWT authenticated)
//! - Runs the periodic scheduled-report dispatch loop

use foodnow_server::{AppState, Config, api, reporting};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foodnow_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting foodnow-server (env: {})", config.environment);

    // Initialize application state
    let state = AppState::new(&config).await?;

    // Periodic scheduled-report dispatch
    match state.mailer.clone() {
        Some(mailer) => {
            let pool = state.pool.clone();
            let tz = state.timezone;
            let interval_secs = config.report_dispatch_interval_secs;
            tokio::spawn(async move {
                let mut interval =
                    tokio::time::interval(std::time::Duration::from_secs(interval_secs));
                loop {
                    interval.tick().await;
                    match reporting::run_once(&pool, mailer.as_ref(), chrono::Utc::now(), tz).await
                    {
                        Ok(outcome) if outcome.sent + outcome.failed > 0 => {
                            tracing::info!(
                                sent = outcome.sent,
                                failed = outcome.failed,
                                "Dispatch pass complete"
                            );
                        }
                        Ok(_) => {}
                        Err(e) => {
                            let err: shared::error::AppError = e.into();
                            tracing::error!(error = %err, "Dispatch pass failed");
                        }
                    }
                }
            });
        }
        None => {
            tracing::warn!(
                "SMTP not configured; scheduled dashboard reports are disabled. \
                 Set SMTP_HOST, SMTP_USERNAME, SMTP_PASSWORD to enable."
            );
        }
    }

    // Start HTTP server
    let app = api::create_router(state);
    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("foodnow-server HTTP listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
