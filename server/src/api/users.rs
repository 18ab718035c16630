//! User dashboard endpoint

use axum::extract::State;
use axum::{Extension, Json};
use serde_json::{Value, json};

use crate::auth::UserIdentity;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/user/dashboard
///
/// Admin-gated account listing plus the requesting user's own record.
pub async fn user_dashboard(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Value> {
    identity.require_admin()?;

    let all_users = db::users::list_all(&state.pool)
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(json!({
        "message": "Welcome to dashboard",
        "user": {
            "id": identity.user_id,
            "username": identity.username,
            "role": identity.role,
        },
        "all_users": all_users,
    })))
}
