use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use super::model::{CreatePaymentDto, Payment};
use super::service::PaymentService;
use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Record a pending payment for a course
///
/// Students with a verified profile receive a 20% discount.
#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = CreatePaymentDto,
    responses(
        (status = 201, description = "Payment recorded", body = Payment),
        (status = 400, description = "Invalid amount or duplicate transaction id", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_payment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreatePaymentDto>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    let payment = PaymentService::create_payment(&state.db, auth_user.user_id(), dto).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

#[utoipa::path(
    get,
    path = "/api/payments/user/{user_id}",
    params(("user_id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Payments of the user", body = Vec<Payment>),
        (status = 403, description = "Another student's payments", body = ErrorResponse)
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_user_payments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Payment>>, AppError> {
    auth_user.ensure_self_or_staff(user_id)?;
    let payments = PaymentService::get_user_payments(&state.db, user_id).await?;
    Ok(Json(payments))
}
