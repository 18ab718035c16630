//! Report schedule endpoints

use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};

use crate::auth::UserIdentity;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/admin/report-schedules
pub async fn list_schedules(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Value> {
    identity.require_admin()?;

    let schedules = db::schedules::list_all(&state.pool)
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(json!({ "schedules": schedules })))
}

#[derive(Debug, Deserialize)]
pub struct SaveScheduleRequest {
    pub email: Option<String>,
    pub frequency: Option<String>,
    pub is_active: Option<bool>,
}

/// POST /api/admin/report-schedules
///
/// Upserts by email; a saved schedule's first run lands one full period
/// out.
pub async fn save_schedule(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<SaveScheduleRequest>,
) -> ApiResult<Value> {
    identity.require_admin()?;

    let email = req
        .email
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_lowercase();
    if email.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "Email is required.",
        ));
    }

    let frequency = req
        .frequency
        .as_deref()
        .unwrap_or("weekly")
        .trim()
        .to_lowercase();
    if frequency != "weekly" && frequency != "monthly" {
        return Err(AppError::with_message(
            ErrorCode::ReportFrequencyInvalid,
            "Invalid frequency. Use weekly or monthly.",
        ));
    }

    let is_active = req.is_active.unwrap_or(true);

    let schedule = db::schedules::upsert(
        &state.pool,
        &email,
        &frequency,
        is_active,
        chrono::Utc::now(),
    )
    .await
    .map_err(ServiceError::from)?;

    Ok(Json(json!({
        "schedule": schedule,
        "message": "Report schedule saved successfully.",
    })))
}
