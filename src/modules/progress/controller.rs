use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;

use super::model::{ProgressUpdate, ProgressView, UpdateProgressDto};
use super::service::ProgressService;
use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Recompute progress from submissions
#[utoipa::path(
    post,
    path = "/api/progress/update",
    request_body = UpdateProgressDto,
    responses(
        (status = 200, description = "Progress recomputed", body = ProgressUpdate),
        (status = 403, description = "Another student's progress", body = ErrorResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    ),
    tag = "Progress",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn update_progress(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProgressDto>,
) -> Result<Json<ProgressUpdate>, AppError> {
    auth_user.ensure_self_or_staff(dto.user_id)?;
    let update = ProgressService::recompute(&state.db, dto.user_id, dto.course_id).await?;
    Ok(Json(update))
}

#[utoipa::path(
    get,
    path = "/api/progress/{user_id}/{course_id}",
    params(
        ("user_id" = i64, Path, description = "User id"),
        ("course_id" = i64, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Stored progress", body = ProgressView),
        (status = 403, description = "Another student's progress", body = ErrorResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    ),
    tag = "Progress",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_progress(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((user_id, course_id)): Path<(i64, i64)>,
) -> Result<Json<ProgressView>, AppError> {
    auth_user.ensure_self_or_staff(user_id)?;
    let view = ProgressService::get_progress(&state.db, user_id, course_id).await?;
    Ok(Json(view))
}
