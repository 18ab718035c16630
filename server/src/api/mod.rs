//! HTTP API routes

pub mod auth;
pub mod chef_dashboard;
pub mod dashboard;
pub mod health;
pub mod schedules;
pub mod users;

use axum::routing::get;
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::auth::user_auth_middleware;
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, shared::error::AppError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Public surface (no auth)
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/auth/login", axum::routing::post(auth::login));

    // Authenticated surface (JWT; role checks live in the handlers)
    let authed = Router::new()
        .route("/api/admin/dashboard", get(dashboard::admin_dashboard))
        .route(
            "/api/admin/dashboard/export",
            get(dashboard::admin_dashboard_export),
        )
        .route(
            "/api/admin/report-schedules",
            get(schedules::list_schedules).post(schedules::save_schedule),
        )
        .route("/api/chef/dashboard", get(chef_dashboard::chef_dashboard))
        .route("/api/user/dashboard", get(users::user_dashboard))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            user_auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(authed)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
