use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use super::model::{
    CreateProfileDto, Profile, TeacherProfile, UpsertTeacherProfileDto, VerifyProfileDto,
};
use super::service::ProfileService;
use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Create the caller's profile
#[utoipa::path(
    post,
    path = "/api/profiles",
    request_body = CreateProfileDto,
    responses(
        (status = 201, description = "Profile created", body = Profile),
        (status = 400, description = "Validation error or profile already exists", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Profiles",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateProfileDto>,
) -> Result<(StatusCode, Json<Profile>), AppError> {
    let profile = ProfileService::create_profile(&state.db, auth_user.user_id(), dto).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// The caller's profile
#[utoipa::path(
    get,
    path = "/api/profiles/me",
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "No profile yet", body = ErrorResponse)
    ),
    tag = "Profiles",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_my_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Profile>, AppError> {
    let profile = ProfileService::get_profile(&state.db, auth_user.user_id()).await?;
    Ok(Json(profile))
}

/// Mark a profile verified or unverified (admin)
#[utoipa::path(
    put,
    path = "/api/admin/profiles/{user_id}/verify",
    params(("user_id" = i64, Path, description = "Profile owner")),
    request_body = VerifyProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    ),
    tag = "Profiles",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn verify_profile(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<VerifyProfileDto>,
) -> Result<Json<Profile>, AppError> {
    let profile = ProfileService::set_verified(&state.db, user_id, dto.verified).await?;
    Ok(Json(profile))
}

/// A teacher's profile
#[utoipa::path(
    get,
    path = "/api/teacher-profiles/{user_id}",
    params(("user_id" = i64, Path, description = "Teacher's user id")),
    responses(
        (status = 200, description = "Teacher profile", body = TeacherProfile),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Teacher profile not found", body = ErrorResponse)
    ),
    tag = "Profiles",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_teacher_profile(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<TeacherProfile>, AppError> {
    let profile = ProfileService::get_teacher_profile(&state.db, user_id).await?;
    Ok(Json(profile))
}

/// Create or update a teacher's profile and department (admin)
#[utoipa::path(
    put,
    path = "/api/admin/teacher-profiles/{user_id}",
    params(("user_id" = i64, Path, description = "Teacher's user id")),
    request_body = UpsertTeacherProfileDto,
    responses(
        (status = 200, description = "Teacher profile saved", body = TeacherProfile),
        (status = 400, description = "User is not a teacher", body = ErrorResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "User or department not found", body = ErrorResponse)
    ),
    tag = "Profiles",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn upsert_teacher_profile(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpsertTeacherProfileDto>,
) -> Result<Json<TeacherProfile>, AppError> {
    let profile = ProfileService::upsert_teacher_profile(&state.db, user_id, dto).await?;
    Ok(Json(profile))
}
