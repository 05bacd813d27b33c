use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use super::model::{
    EnrollDto, Enrollment, EnrollmentWithCourse, EnrollmentWithStudent, UpdateEnrollmentDto,
};
use super::service::EnrollmentService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, RequireStaff};
use crate::modules::auth::model::{ErrorResponse, MessageResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Enroll the calling student in a course
#[utoipa::path(
    post,
    path = "/api/enrollments",
    request_body = EnrollDto,
    responses(
        (status = 201, description = "Enrolled", body = Enrollment),
        (status = 400, description = "Already enrolled", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Caller is not a student", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn enroll(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<EnrollDto>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    let enrollment = EnrollmentService::enroll(&state.db, &auth_user, dto).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// A user's enrollments; students may only read their own
#[utoipa::path(
    get,
    path = "/api/users/{id}/enrollments",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Enrollments with course", body = Vec<EnrollmentWithCourse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Another student's enrollments", body = ErrorResponse)
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_user_enrollments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<EnrollmentWithCourse>>, AppError> {
    auth_user.ensure_self_or_staff(id)?;
    let enrollments = EnrollmentService::get_user_enrollments(&state.db, id).await?;
    Ok(Json(enrollments))
}

/// Students enrolled in a course the caller teaches
#[utoipa::path(
    get,
    path = "/api/courses/{id}/enrollments",
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Enrollments with student", body = Vec<EnrollmentWithStudent>),
        (status = 403, description = "Not staff, or not the course's teacher", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn get_course_enrollments(
    State(state): State<AppState>,
    RequireStaff(caller): RequireStaff,
    Path(id): Path<i64>,
) -> Result<Json<Vec<EnrollmentWithStudent>>, AppError> {
    let enrollments = EnrollmentService::get_course_enrollments(&state.db, &caller, id).await?;
    Ok(Json(enrollments))
}

#[utoipa::path(
    put,
    path = "/api/enrollments/{id}",
    params(("id" = i64, Path, description = "Enrollment id")),
    request_body = UpdateEnrollmentDto,
    responses(
        (status = 200, description = "Enrollment updated", body = Enrollment),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn update_enrollment(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateEnrollmentDto>,
) -> Result<Json<Enrollment>, AppError> {
    let enrollment = EnrollmentService::update_enrollment(&state.db, id, dto).await?;
    Ok(Json(enrollment))
}

#[utoipa::path(
    delete,
    path = "/api/enrollments/{id}",
    params(("id" = i64, Path, description = "Enrollment id")),
    responses(
        (status = 200, description = "Enrollment deleted", body = MessageResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn delete_enrollment(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    EnrollmentService::delete_enrollment(&state.db, id).await?;
    Ok(Json(MessageResponse::new("enrollment deleted successfully")))
}
