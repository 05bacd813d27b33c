use axum::body::Body;
use axum::http::{Response, StatusCode};
use axum::response::IntoResponse;
use axum::{Json, Router, routing::post};
use serde_json::json;
use tower_governor::{GovernorError, GovernorLayer};
use tracing::warn;

use crate::config::rate_limit::RateLimitConfig;
use crate::state::AppState;

use super::controller::{forget_password, login, register, reset_password, verify_email};

/// Registration, login and password reset routes, rate limited per client
/// when the limiter is enabled.
pub fn init_auth_router(rate_limit: &RateLimitConfig) -> Router<AppState> {
    let router = Router::new()
        .route("/register", post(register))
        .route("/verify_email", post(verify_email))
        .route("/login", post(login))
        .route("/forget_password", post(forget_password))
        .route("/reset_password", post(reset_password));

    if !rate_limit.enabled {
        return router;
    }

    router.layer(
        GovernorLayer::new(rate_limit.auth_governor_config()).error_handler(rate_limit_response),
    )
}

fn rate_limit_response(error: GovernorError) -> Response<Body> {
    match error {
        GovernorError::TooManyRequests { wait_time, .. } => {
            warn!(wait_time, "Rate limit exceeded on auth route");
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "error": format!("too many requests, retry in {wait_time}s") })),
            )
                .into_response()
        }
        other => {
            warn!(error = %other, "Rate limiter could not identify client");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "unable to identify client" })),
            )
                .into_response()
        }
    }
}
