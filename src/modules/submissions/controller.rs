use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use super::model::{SubmitAnswersDto, Submission, SubmissionResult};
use super::service::SubmissionService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireStaff;
use crate::modules::auth::model::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Submit answers to an assignment as the caller
#[utoipa::path(
    post,
    path = "/api/submissions",
    request_body = SubmitAnswersDto,
    responses(
        (status = 201, description = "Submission scored", body = SubmissionResult),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn submit(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<SubmitAnswersDto>,
) -> Result<(StatusCode, Json<SubmissionResult>), AppError> {
    let result = SubmissionService::submit(
        &state.db,
        auth_user.user_id(),
        state.scoring_config.mode,
        dto,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    get,
    path = "/api/submissions/user/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "The user's submissions", body = Vec<Submission>),
        (status = 403, description = "Another student's submissions", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_user_submissions(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Submission>>, AppError> {
    auth_user.ensure_self_or_staff(id)?;
    let submissions = SubmissionService::get_user_submissions(&state.db, id).await?;
    Ok(Json(submissions))
}

#[utoipa::path(
    get,
    path = "/api/submissions/assignment/{id}",
    params(("id" = i64, Path, description = "Assignment id")),
    responses(
        (status = 200, description = "Submissions for the assignment", body = Vec<Submission>),
        (status = 403, description = "Staff only", body = ErrorResponse)
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _staff))]
pub async fn get_assignment_submissions(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Submission>>, AppError> {
    let submissions = SubmissionService::get_assignment_submissions(&state.db, id).await?;
    Ok(Json(submissions))
}
