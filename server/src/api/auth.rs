//! Authentication endpoints

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};

use crate::db;
use crate::state::AppState;
use crate::util::verify_password;

use super::ApiResult;

/// POST /api/auth/login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(serde::Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub role: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let username = req.username.trim();
    let user = db::users::find_by_username(&state.pool, username)
        .await
        .map_err(crate::error::ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCredentials))?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    }

    if user.is_account_banned {
        return Err(AppError::new(ErrorCode::AccountBanned));
    }

    let token = crate::auth::create_token(user.id, &user.username, &user.role, &state.jwt_secret)
        .map_err(|e| {
            tracing::error!("JWT creation failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    Ok(Json(LoginResponse {
        token,
        username: user.username,
        role: user.role,
    }))
}
