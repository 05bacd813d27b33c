use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use super::model::{
    ErrorResponse, ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse,
    RegisterRequest, ResetPasswordRequest, VerifyEmailRequest,
};
use super::service::AuthService;
use crate::state::AppState;
use crate::utils::email::EmailService;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Start a registration and email a one-time code
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Code sent", body = MessageResponse),
        (status = 400, description = "Validation error, email taken, or admin role requested", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse),
        (status = 500, description = "Code could not be delivered", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let email_service = EmailService::new(state.email_config.clone());
    let response = AuthService::register(
        &state.db,
        &state.pending_registrations,
        &email_service,
        &state.registration_config,
        dto,
    )
    .await?;
    Ok((StatusCode::OK, Json(response)))
}

/// Confirm the one-time code and create the account
#[utoipa::path(
    post,
    path = "/api/users/verify_email",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Account created", body = MessageResponse),
        (status = 400, description = "No pending registration, or wrong or expired code", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn verify_email(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<VerifyEmailRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    AuthService::verify_email(&state.db, &state.pending_registrations, dto).await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new(
            "email verified successfully, user registered",
        )),
    ))
}

/// Login and receive a JWT
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Unknown email", body = ErrorResponse),
        (status = 401, description = "Unverified account or wrong password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(&state.db, &state.jwt_config, dto).await?;
    Ok(Json(response))
}

/// Email a password reset code
#[utoipa::path(
    post,
    path = "/api/users/forget_password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Code sent", body = MessageResponse),
        (status = 400, description = "Unknown email", body = ErrorResponse),
        (status = 500, description = "Code could not be delivered", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn forget_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email_service = EmailService::new(state.email_config.clone());
    let response = AuthService::forgot_password(
        &state.db,
        &email_service,
        &state.registration_config,
        dto,
    )
    .await?;
    Ok(Json(response))
}

/// Set a new password with a reset code
#[utoipa::path(
    post,
    path = "/api/users/reset_password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Unknown email, or wrong or expired code", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let response = AuthService::reset_password(&state.db, dto).await?;
    Ok(Json(response))
}
