//! User JWT authentication and role guards

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult, ErrorCode};

use crate::state::AppState;

/// JWT claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct UserClaims {
    /// User ID
    pub sub: String,
    /// Username
    pub username: String,
    /// Role: user | chef | admin
    pub role: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated identity extracted from the JWT
#[derive(Debug, Clone)]
pub struct UserIdentity {
    pub user_id: i64,
    pub username: String,
    pub role: String,
}

impl UserIdentity {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// Admin-only surfaces
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::with_message(
                ErrorCode::AdminRequired,
                "You are not authorized to access this page.",
            ))
        }
    }

    /// Chef surfaces; admins may view any chef's dashboard
    pub fn require_chef_or_admin(&self) -> AppResult<()> {
        if self.role == "chef" || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::with_message(
                ErrorCode::PermissionDenied,
                "You are not authorized to access this page.",
            ))
        }
    }
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// Create a JWT token for a user
pub fn create_token(
    user_id: i64,
    username: &str,
    role: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = UserClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        role: role.to_string(),
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and validate a token into an identity
pub fn verify_token(token: &str, secret: &str) -> AppResult<UserIdentity> {
    let validation = Validation::default();
    let token_data = jsonwebtoken::decode::<UserClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        AppError::with_message(ErrorCode::TokenInvalid, "Invalid or expired token")
    })?;

    let user_id = token_data
        .claims
        .sub
        .parse()
        .map_err(|_| AppError::new(ErrorCode::TokenInvalid))?;

    Ok(UserIdentity {
        user_id,
        username: token_data.claims.username,
        role: token_data.claims.role,
    })
}

/// Middleware that extracts and verifies the user JWT from the
/// Authorization header and stores the identity in request extensions.
pub async fn user_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::not_authenticated().into_response())?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::not_authenticated().into_response())?;

    let identity =
        verify_token(token, &state.jwt_secret).map_err(|err| err.into_response())?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
