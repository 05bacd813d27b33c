use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use tracing::instrument;

use super::model::{
    AnswerOption, Assignment, AssignmentFilterParams, AssignmentWithQuestions, CreateAssignmentDto,
    CreateOptionDto, CreateQuestionDto, Question, QuestionWithOptions, UpdateAssignmentDto,
    UpdateOptionDto, UpdateQuestionDto,
};
use super::service::AssignmentService;
use crate::middleware::role::RequireStaff;
use crate::modules::auth::model::{ErrorResponse, MessageResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Create an assignment for a course the caller teaches
#[utoipa::path(
    post,
    path = "/api/assignments",
    request_body = CreateAssignmentDto,
    responses(
        (status = 201, description = "Assignment created", body = Assignment),
        (status = 403, description = "Not staff, or not the course's teacher", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn create_assignment(
    State(state): State<AppState>,
    RequireStaff(caller): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateAssignmentDto>,
) -> Result<(StatusCode, Json<Assignment>), AppError> {
    let assignment = AssignmentService::create_assignment(&state.db, &caller, dto).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// List assignments with their questions and options
#[utoipa::path(
    get,
    path = "/api/assignments",
    params(AssignmentFilterParams),
    responses((status = 200, description = "Assignments", body = Vec<AssignmentWithQuestions>)),
    tag = "Assignments"
)]
#[instrument(skip(state))]
pub async fn list_assignments(
    State(state): State<AppState>,
    Query(filters): Query<AssignmentFilterParams>,
) -> Result<Json<Vec<AssignmentWithQuestions>>, AppError> {
    let assignments = AssignmentService::list_assignments(&state.db, filters).await?;
    Ok(Json(assignments))
}

#[utoipa::path(
    get,
    path = "/api/assignments/{id}",
    params(("id" = i64, Path, description = "Assignment id")),
    responses(
        (status = 200, description = "Assignment with questions and options", body = AssignmentWithQuestions),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    tag = "Assignments"
)]
#[instrument(skip(state))]
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AssignmentWithQuestions>, AppError> {
    let assignment = AssignmentService::get_assignment(&state.db, id).await?;
    Ok(Json(assignment))
}

#[utoipa::path(
    put,
    path = "/api/assignments/{id}",
    params(("id" = i64, Path, description = "Assignment id")),
    request_body = UpdateAssignmentDto,
    responses(
        (status = 200, description = "Assignment updated", body = Assignment),
        (status = 403, description = "Not the course's teacher", body = ErrorResponse),
        (status = 404, description = "Assignment or course not found", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn update_assignment(
    State(state): State<AppState>,
    RequireStaff(caller): RequireStaff,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateAssignmentDto>,
) -> Result<Json<Assignment>, AppError> {
    let assignment = AssignmentService::update_assignment(&state.db, &caller, id, dto).await?;
    Ok(Json(assignment))
}

/// Delete an assignment with its questions and options
#[utoipa::path(
    delete,
    path = "/api/assignments/{id}",
    params(("id" = i64, Path, description = "Assignment id")),
    responses(
        (status = 200, description = "Assignment deleted", body = MessageResponse),
        (status = 403, description = "Not the course's teacher", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn delete_assignment(
    State(state): State<AppState>,
    RequireStaff(caller): RequireStaff,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    AssignmentService::delete_assignment(&state.db, &caller, id).await?;
    Ok(Json(MessageResponse::new("Assignment deleted successfully")))
}

#[utoipa::path(
    post,
    path = "/api/assignments/{id}/questions",
    params(("id" = i64, Path, description = "Assignment id")),
    request_body = CreateQuestionDto,
    responses(
        (status = 201, description = "Question created", body = Question),
        (status = 403, description = "Not the course's teacher", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn create_question(
    State(state): State<AppState>,
    RequireStaff(caller): RequireStaff,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<CreateQuestionDto>,
) -> Result<(StatusCode, Json<Question>), AppError> {
    let question = AssignmentService::create_question(&state.db, &caller, id, dto).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

#[utoipa::path(
    get,
    path = "/api/assignments/{id}/questions",
    params(("id" = i64, Path, description = "Assignment id")),
    responses(
        (status = 200, description = "Questions with options", body = Vec<QuestionWithOptions>),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    tag = "Assignments"
)]
#[instrument(skip(state))]
pub async fn list_questions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<QuestionWithOptions>>, AppError> {
    let questions = AssignmentService::list_questions(&state.db, id).await?;
    Ok(Json(questions))
}

#[utoipa::path(
    put,
    path = "/api/questions/{question_id}",
    params(("question_id" = i64, Path, description = "Question id")),
    request_body = UpdateQuestionDto,
    responses(
        (status = 200, description = "Question updated", body = Question),
        (status = 403, description = "Not the course's teacher", body = ErrorResponse),
        (status = 404, description = "Question not found", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn update_question(
    State(state): State<AppState>,
    RequireStaff(caller): RequireStaff,
    Path(question_id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateQuestionDto>,
) -> Result<Json<Question>, AppError> {
    let question = AssignmentService::update_question(&state.db, &caller, question_id, dto).await?;
    Ok(Json(question))
}

#[utoipa::path(
    delete,
    path = "/api/questions/{question_id}",
    params(("question_id" = i64, Path, description = "Question id")),
    responses(
        (status = 200, description = "Question deleted", body = MessageResponse),
        (status = 403, description = "Not the course's teacher", body = ErrorResponse),
        (status = 404, description = "Question not found", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn delete_question(
    State(state): State<AppState>,
    RequireStaff(caller): RequireStaff,
    Path(question_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    AssignmentService::delete_question(&state.db, &caller, question_id).await?;
    Ok(Json(MessageResponse::new("question deleted successfully")))
}

/// Add an answer option; at most one per question may be correct
#[utoipa::path(
    post,
    path = "/api/questions/{question_id}/options",
    params(("question_id" = i64, Path, description = "Question id")),
    request_body = CreateOptionDto,
    responses(
        (status = 201, description = "Option created", body = AnswerOption),
        (status = 400, description = "Question already has a correct option", body = ErrorResponse),
        (status = 403, description = "Not the course's teacher", body = ErrorResponse),
        (status = 404, description = "Question not found", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn create_option(
    State(state): State<AppState>,
    RequireStaff(caller): RequireStaff,
    Path(question_id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<CreateOptionDto>,
) -> Result<(StatusCode, Json<AnswerOption>), AppError> {
    let option = AssignmentService::create_option(&state.db, &caller, question_id, dto).await?;
    Ok((StatusCode::CREATED, Json(option)))
}

#[utoipa::path(
    get,
    path = "/api/questions/{question_id}/options",
    params(("question_id" = i64, Path, description = "Question id")),
    responses(
        (status = 200, description = "Options", body = Vec<AnswerOption>),
        (status = 404, description = "Question not found", body = ErrorResponse)
    ),
    tag = "Assignments"
)]
#[instrument(skip(state))]
pub async fn list_options(
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
) -> Result<Json<Vec<AnswerOption>>, AppError> {
    let options = AssignmentService::list_options(&state.db, question_id).await?;
    Ok(Json(options))
}

#[utoipa::path(
    put,
    path = "/api/questions/{question_id}/options/{option_id}",
    params(
        ("question_id" = i64, Path, description = "Question id"),
        ("option_id" = i64, Path, description = "Option id")
    ),
    request_body = UpdateOptionDto,
    responses(
        (status = 200, description = "Option updated", body = AnswerOption),
        (status = 400, description = "Question already has a correct option", body = ErrorResponse),
        (status = 403, description = "Not the course's teacher", body = ErrorResponse),
        (status = 404, description = "Question or option not found", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn update_option(
    State(state): State<AppState>,
    RequireStaff(caller): RequireStaff,
    Path((question_id, option_id)): Path<(i64, i64)>,
    ValidatedJson(dto): ValidatedJson<UpdateOptionDto>,
) -> Result<Json<AnswerOption>, AppError> {
    let option =
        AssignmentService::update_option(&state.db, &caller, question_id, option_id, dto).await?;
    Ok(Json(option))
}

#[utoipa::path(
    delete,
    path = "/api/questions/{question_id}/options/{option_id}",
    params(
        ("question_id" = i64, Path, description = "Question id"),
        ("option_id" = i64, Path, description = "Option id")
    ),
    responses(
        (status = 200, description = "Option deleted", body = MessageResponse),
        (status = 403, description = "Not the course's teacher", body = ErrorResponse),
        (status = 404, description = "Question or option not found", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, caller))]
pub async fn delete_option(
    State(state): State<AppState>,
    RequireStaff(caller): RequireStaff,
    Path((question_id, option_id)): Path<(i64, i64)>,
) -> Result<Json<MessageResponse>, AppError> {
    AssignmentService::delete_option(&state.db, &caller, question_id, option_id).await?;
    Ok(Json(MessageResponse::new("Option deleted successfully")))
}
