//! Admin dashboard endpoints

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};

use crate::auth::UserIdentity;
use crate::db;
use crate::error::ServiceError;
use crate::reporting::csv::render_csv;
use crate::reporting::pdf::render_pdf;
use crate::reporting::{DashboardPayload, ReportRange, build_dashboard_payload};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub range: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub export_format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub range: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub format: Option<String>,
}

async fn build_payload(
    state: &AppState,
    range: Option<&str>,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<DashboardPayload, AppError> {
    let range = ReportRange::resolve(range, start_date, end_date, state.today())?;
    let source = db::dashboard::fetch_dashboard_source(&state.pool, &range)
        .await
        .map_err(ServiceError::from)?;
    Ok(build_dashboard_payload(&range, &source))
}

fn attachment_response(bytes: Vec<u8>, content_type: &'static str, filename: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

fn export_response(payload: &DashboardPayload, format: &str) -> Result<Response, AppError> {
    let start_date = &payload.range.start_date;
    let end_date = &payload.range.end_date;
    match format {
        "pdf" => Ok(attachment_response(
            render_pdf(payload),
            "application/pdf",
            format!("admin-dashboard-report-{start_date}-{end_date}.pdf"),
        )),
        "csv" => Ok(attachment_response(
            render_csv(payload)?,
            "text/csv",
            format!("admin-dashboard-report-{start_date}-{end_date}.csv"),
        )),
        _ => Err(AppError::with_message(
            ErrorCode::ReportFormatInvalid,
            "Invalid export format. Use csv or pdf.",
        )),
    }
}

/// GET /api/admin/dashboard
///
/// Returns the JSON payload, or a CSV/PDF download when `export_format`
/// is given. The JSON body carries legacy top-level aliases alongside the
/// structured payload for older dashboard clients.
pub async fn admin_dashboard(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, AppError> {
    identity.require_admin()?;

    let payload = build_payload(
        &state,
        query.range.as_deref(),
        query.start_date.as_deref(),
        query.end_date.as_deref(),
    )
    .await?;

    let export_format = query
        .export_format
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_lowercase();
    if export_format == "csv" || export_format == "pdf" {
        return export_response(&payload, &export_format);
    }

    let mut body = serde_json::to_value(&payload).map_err(|e| {
        tracing::error!("Dashboard payload serialization failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;
    // Keep earlier aggregate keys for backward compatibility.
    body["user_count"] = payload.summary.total_users.into();
    body["chef_count"] = payload.summary.total_chefs.into();
    body["campaign_count"] = payload.summary.campaigns_in_range.into();
    body["order_count"] = payload.summary.orders_in_range.into();

    Ok(Json(body).into_response())
}

/// GET /api/admin/dashboard/export?format=csv|pdf
pub async fn admin_dashboard_export(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    identity.require_admin()?;

    let payload = build_payload(
        &state,
        query.range.as_deref(),
        query.start_date.as_deref(),
        query.end_date.as_deref(),
    )
    .await?;

    let format = query
        .format
        .as_deref()
        .unwrap_or("csv")
        .trim()
        .to_lowercase();
    export_response(&payload, &format)
}
