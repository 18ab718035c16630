//! Chef dashboard endpoint

use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};

use crate::auth::UserIdentity;
use crate::db;
use crate::error::ServiceError;
use crate::reporting::ReportRange;
use crate::reporting::chef::{
    ChefContext, ChefDashboardPayload, ChefProfile, build_chef_dashboard_payload,
    empty_chef_dashboard_payload,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChefDashboardQuery {
    pub range: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Admin-only: view a specific chef's dashboard
    pub chef: Option<String>,
}

/// Resolve which chef the caller is looking at.
///
/// Chefs always see themselves. Admins may request a chef by name, fall
/// back to a chef profile matching their own username, and finally to the
/// first chef alphabetically (flagged so the response carries a warning).
async fn resolve_chef(
    state: &AppState,
    identity: &UserIdentity,
    requested: &str,
) -> Result<(Option<ChefProfile>, bool), AppError> {
    if identity.role == "chef" {
        let chef = db::chef_dashboard::find_chef(&state.pool, &identity.username)
            .await
            .map_err(ServiceError::from)?;
        return Ok((chef, false));
    }

    if !requested.is_empty() {
        let chef = db::chef_dashboard::find_chef(&state.pool, requested)
            .await
            .map_err(ServiceError::from)?;
        if chef.is_none() {
            return Err(AppError::with_message(
                ErrorCode::ChefNotFound,
                format!("Chef '{requested}' not found"),
            ));
        }
        return Ok((chef, false));
    }

    if let Some(own) = db::chef_dashboard::find_chef(&state.pool, &identity.username)
        .await
        .map_err(ServiceError::from)?
    {
        return Ok((Some(own), false));
    }

    let fallback = db::chef_dashboard::first_chef(&state.pool)
        .await
        .map_err(ServiceError::from)?;
    let fallback_used = fallback.is_some();
    Ok((fallback, fallback_used))
}

/// GET /api/chef/dashboard
pub async fn chef_dashboard(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Query(query): Query<ChefDashboardQuery>,
) -> super::ApiResult<ChefDashboardPayload> {
    identity.require_chef_or_admin()?;

    let range = ReportRange::resolve(
        query.range.as_deref(),
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        state.today(),
    )?;

    let requested = query.chef.as_deref().unwrap_or("").trim();
    let (chef, mut fallback_used) = resolve_chef(&state, &identity, requested).await?;

    let Some(chef) = chef else {
        if identity.is_admin() {
            return Ok(Json(empty_chef_dashboard_payload(
                &range,
                &identity.role,
                Some("No chef profiles found. Create at least one chef to view data.".to_string()),
            )));
        }
        return Err(AppError::with_message(
            ErrorCode::ChefNotFound,
            "Chef profile not found. Please complete your chef setup.",
        ));
    };

    let chef_username = chef.chef_username.trim().to_string();
    let is_self = chef_username.to_lowercase() == identity.username.trim().to_lowercase();
    if identity.is_admin() && !is_self && requested.is_empty() {
        fallback_used = true;
    }

    let source = db::chef_dashboard::fetch_chef_dashboard_source(
        &state.pool,
        &chef_username,
        &range,
        chrono::Utc::now(),
    )
    .await
    .map_err(ServiceError::from)?;

    let ctx = ChefContext {
        username: chef_username,
        requested_by_role: identity.role.clone(),
        is_self,
        fallback_used,
    };

    Ok(Json(build_chef_dashboard_payload(&range, &ctx, &chef, &source)))
}
