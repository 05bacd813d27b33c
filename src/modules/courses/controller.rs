use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use tracing::instrument;

use super::model::{CourseFilterParams, CourseWithRelations, CreateCourseDto, UpdateCourseDto};
use super::service::CourseService;
use crate::middleware::role::RequireStaff;
use crate::modules::auth::model::{ErrorResponse, MessageResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Create a course in the caller's department
///
/// The course's teacher is always the caller.
#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = CourseWithRelations),
        (status = 400, description = "Validation error, missing department or duplicate code", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not staff, no teacher profile, no department, or department mismatch", body = ErrorResponse),
        (status = 404, description = "Department not found", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn create_course(
    State(state): State<AppState>,
    RequireStaff(caller): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<CourseWithRelations>), AppError> {
    let course = CourseService::create_course(&state.db, &caller, dto).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// List courses with their teacher and department
#[utoipa::path(
    get,
    path = "/api/courses",
    params(CourseFilterParams),
    responses((status = 200, description = "Courses", body = Vec<CourseWithRelations>)),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(filters): Query<CourseFilterParams>,
) -> Result<Json<Vec<CourseWithRelations>>, AppError> {
    let courses = CourseService::list_courses(&state.db, filters).await?;
    Ok(Json(courses))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course", body = CourseWithRelations),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CourseWithRelations>, AppError> {
    let course = CourseService::get_course(&state.db, id).await?;
    Ok(Json(course))
}

/// Update a course the caller created (admins may update any)
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(("id" = i64, Path, description = "Course id")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = CourseWithRelations),
        (status = 400, description = "Validation error or duplicate code", body = ErrorResponse),
        (status = 403, description = "Not the owner, or department gate failed", body = ErrorResponse),
        (status = 404, description = "Course or department not found", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn update_course(
    State(state): State<AppState>,
    RequireStaff(caller): RequireStaff,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<CourseWithRelations>, AppError> {
    let course = CourseService::update_course(&state.db, &caller, id, dto).await?;
    Ok(Json(course))
}

/// Delete a course the caller created (admins may delete any)
#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course deleted", body = MessageResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn delete_course(
    State(state): State<AppState>,
    RequireStaff(caller): RequireStaff,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    CourseService::delete_course(&state.db, &caller, id).await?;
    Ok(Json(MessageResponse::new("course deleted successfully")))
}
