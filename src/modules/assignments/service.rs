use std::collections::HashMap;

use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};

use super::model::{
    AnswerOption, Assignment, AssignmentFilterParams, AssignmentWithQuestions, CreateAssignmentDto,
    CreateOptionDto, CreateQuestionDto, Question, QuestionWithOptions, UpdateAssignmentDto,
    UpdateOptionDto, UpdateQuestionDto,
};
use crate::middleware::auth::AuthUser;
use crate::modules::courses::service::CourseService;
use crate::utils::errors::AppError;

fn map_correct_option_conflict(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return AppError::bad_request(anyhow!("question already has a correct option"));
    }
    AppError::from(e)
}

pub struct AssignmentService;

impl AssignmentService {
    #[instrument(skip(db, caller), fields(caller_id = caller.user_id()))]
    pub async fn create_assignment(
        db: &PgPool,
        caller: &AuthUser,
        dto: CreateAssignmentDto,
    ) -> Result<Assignment, AppError> {
        CourseService::get_owned_course(db, caller, dto.course_id).await?;

        let assignment = sqlx::query_as::<_, Assignment>(
            r#"INSERT INTO assignments (title, description, course_id, teacher_id)
               VALUES ($1, $2, $3, $4)
               RETURNING *"#,
        )
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(dto.course_id)
        .bind(caller.user_id())
        .fetch_one(db)
        .await?;

        info!(assignment_id = assignment.id, course_id = dto.course_id, "Assignment created");
        Ok(assignment)
    }

    #[instrument(skip(db))]
    pub async fn list_assignments(
        db: &PgPool,
        filters: AssignmentFilterParams,
    ) -> Result<Vec<AssignmentWithQuestions>, AppError> {
        let assignments = sqlx::query_as::<_, Assignment>(
            r#"SELECT * FROM assignments
               WHERE ($1::BIGINT IS NULL OR course_id = $1)
               ORDER BY created_at, id"#,
        )
        .bind(filters.course_id)
        .fetch_all(db)
        .await?;

        let ids: Vec<i64> = assignments.iter().map(|a| a.id).collect();
        let mut questions = Self::load_questions_for(db, &ids).await?;

        Ok(assignments
            .into_iter()
            .map(|assignment| AssignmentWithQuestions {
                questions: questions.remove(&assignment.id).unwrap_or_default(),
                assignment,
            })
            .collect())
    }

    #[instrument(skip(db))]
    pub async fn get_assignment(
        db: &PgPool,
        id: i64,
    ) -> Result<AssignmentWithQuestions, AppError> {
        let assignment = Self::find_assignment(db, id).await?;
        let questions = Self::load_questions(db, id).await?;
        Ok(AssignmentWithQuestions {
            assignment,
            questions,
        })
    }

    pub async fn find_assignment(db: &PgPool, id: i64) -> Result<Assignment, AppError> {
        sqlx::query_as::<_, Assignment>("SELECT * FROM assignments WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Assignment not found")))
    }

    /// Questions of one assignment, each with its options, in creation order.
    #[instrument(skip(db))]
    pub async fn load_questions(
        db: &PgPool,
        assignment_id: i64,
    ) -> Result<Vec<QuestionWithOptions>, AppError> {
        let mut grouped = Self::load_questions_for(db, &[assignment_id]).await?;
        Ok(grouped.remove(&assignment_id).unwrap_or_default())
    }

    async fn load_questions_for(
        db: &PgPool,
        assignment_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<QuestionWithOptions>>, AppError> {
        if assignment_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let questions = sqlx::query_as::<_, Question>(
            "SELECT * FROM questions WHERE assignment_id = ANY($1) ORDER BY id",
        )
        .bind(assignment_ids)
        .fetch_all(db)
        .await?;

        let question_ids: Vec<i64> = questions.iter().map(|q| q.id).collect();
        let options = sqlx::query_as::<_, AnswerOption>(
            "SELECT * FROM options WHERE question_id = ANY($1) ORDER BY id",
        )
        .bind(&question_ids)
        .fetch_all(db)
        .await?;

        let mut options_by_question: HashMap<i64, Vec<AnswerOption>> = HashMap::new();
        for option in options {
            options_by_question
                .entry(option.question_id)
                .or_default()
                .push(option);
        }

        let mut grouped: HashMap<i64, Vec<QuestionWithOptions>> = HashMap::new();
        for question in questions {
            let options = options_by_question.remove(&question.id).unwrap_or_default();
            grouped
                .entry(question.assignment_id)
                .or_default()
                .push(QuestionWithOptions { question, options });
        }

        Ok(grouped)
    }

    /// Loads an assignment whose course the caller may manage.
    async fn owned_assignment(
        db: &PgPool,
        caller: &AuthUser,
        id: i64,
    ) -> Result<Assignment, AppError> {
        let assignment = Self::find_assignment(db, id).await?;
        CourseService::get_owned_course(db, caller, assignment.course_id).await?;
        Ok(assignment)
    }

    #[instrument(skip(db, caller), fields(caller_id = caller.user_id()))]
    pub async fn update_assignment(
        db: &PgPool,
        caller: &AuthUser,
        id: i64,
        dto: UpdateAssignmentDto,
    ) -> Result<Assignment, AppError> {
        let existing = Self::owned_assignment(db, caller, id).await?;

        if let Some(course_id) = dto.course_id
            && course_id != existing.course_id
        {
            CourseService::get_owned_course(db, caller, course_id).await?;
        }

        let assignment = sqlx::query_as::<_, Assignment>(
            r#"UPDATE assignments
               SET title = COALESCE($1, title),
                   description = COALESCE($2, description),
                   course_id = COALESCE($3, course_id),
                   updated_at = NOW()
               WHERE id = $4
               RETURNING *"#,
        )
        .bind(dto.title.as_deref().map(str::trim))
        .bind(&dto.description)
        .bind(dto.course_id)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(assignment)
    }

    #[instrument(skip(db, caller), fields(caller_id = caller.user_id()))]
    pub async fn delete_assignment(
        db: &PgPool,
        caller: &AuthUser,
        id: i64,
    ) -> Result<(), AppError> {
        Self::owned_assignment(db, caller, id).await?;

        sqlx::query("DELETE FROM assignments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        info!(assignment_id = id, "Assignment deleted");
        Ok(())
    }

    #[instrument(skip(db, caller, dto), fields(caller_id = caller.user_id()))]
    pub async fn create_question(
        db: &PgPool,
        caller: &AuthUser,
        assignment_id: i64,
        dto: CreateQuestionDto,
    ) -> Result<Question, AppError> {
        Self::owned_assignment(db, caller, assignment_id).await?;

        let question = sqlx::query_as::<_, Question>(
            "INSERT INTO questions (assignment_id, text) VALUES ($1, $2) RETURNING *",
        )
        .bind(assignment_id)
        .bind(dto.text.trim())
        .fetch_one(db)
        .await?;

        Ok(question)
    }

    #[instrument(skip(db))]
    pub async fn list_questions(
        db: &PgPool,
        assignment_id: i64,
    ) -> Result<Vec<QuestionWithOptions>, AppError> {
        Self::find_assignment(db, assignment_id).await?;
        Self::load_questions(db, assignment_id).await
    }

    async fn owned_question(
        db: &PgPool,
        caller: &AuthUser,
        question_id: i64,
    ) -> Result<Question, AppError> {
        let question = Self::find_question(db, question_id).await?;
        Self::owned_assignment(db, caller, question.assignment_id).await?;
        Ok(question)
    }

    async fn find_question(db: &PgPool, question_id: i64) -> Result<Question, AppError> {
        sqlx::query_as::<_, Question>("SELECT * FROM questions WHERE id = $1")
            .bind(question_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Question not found")))
    }

    #[instrument(skip(db, caller, dto), fields(caller_id = caller.user_id()))]
    pub async fn update_question(
        db: &PgPool,
        caller: &AuthUser,
        question_id: i64,
        dto: UpdateQuestionDto,
    ) -> Result<Question, AppError> {
        Self::owned_question(db, caller, question_id).await?;

        let question = sqlx::query_as::<_, Question>(
            "UPDATE questions SET text = COALESCE($1, text) WHERE id = $2 RETURNING *",
        )
        .bind(dto.text.as_deref().map(str::trim))
        .bind(question_id)
        .fetch_one(db)
        .await?;

        Ok(question)
    }

    #[instrument(skip(db, caller), fields(caller_id = caller.user_id()))]
    pub async fn delete_question(
        db: &PgPool,
        caller: &AuthUser,
        question_id: i64,
    ) -> Result<(), AppError> {
        Self::owned_question(db, caller, question_id).await?;

        sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(question_id)
            .execute(db)
            .await?;
        Ok(())
    }

    #[instrument(skip(db, caller, dto), fields(caller_id = caller.user_id()))]
    pub async fn create_option(
        db: &PgPool,
        caller: &AuthUser,
        question_id: i64,
        dto: CreateOptionDto,
    ) -> Result<AnswerOption, AppError> {
        Self::owned_question(db, caller, question_id).await?;

        sqlx::query_as::<_, AnswerOption>(
            r#"INSERT INTO options (question_id, text, is_correct)
               VALUES ($1, $2, $3)
               RETURNING *"#,
        )
        .bind(question_id)
        .bind(dto.text.trim())
        .bind(dto.is_correct)
        .fetch_one(db)
        .await
        .map_err(map_correct_option_conflict)
    }

    #[instrument(skip(db))]
    pub async fn list_options(
        db: &PgPool,
        question_id: i64,
    ) -> Result<Vec<AnswerOption>, AppError> {
        Self::find_question(db, question_id).await?;

        let options = sqlx::query_as::<_, AnswerOption>(
            "SELECT * FROM options WHERE question_id = $1 ORDER BY id",
        )
        .bind(question_id)
        .fetch_all(db)
        .await?;
        Ok(options)
    }

    #[instrument(skip(db, caller, dto), fields(caller_id = caller.user_id()))]
    pub async fn update_option(
        db: &PgPool,
        caller: &AuthUser,
        question_id: i64,
        option_id: i64,
        dto: UpdateOptionDto,
    ) -> Result<AnswerOption, AppError> {
        Self::owned_question(db, caller, question_id).await?;

        sqlx::query_as::<_, AnswerOption>(
            r#"UPDATE options
               SET text = COALESCE($1, text),
                   is_correct = COALESCE($2, is_correct)
               WHERE id = $3 AND question_id = $4
               RETURNING *"#,
        )
        .bind(dto.text.as_deref().map(str::trim))
        .bind(dto.is_correct)
        .bind(option_id)
        .bind(question_id)
        .fetch_optional(db)
        .await
        .map_err(map_correct_option_conflict)?
        .ok_or_else(|| AppError::not_found(anyhow!("Option not found")))
    }

    #[instrument(skip(db, caller), fields(caller_id = caller.user_id()))]
    pub async fn delete_option(
        db: &PgPool,
        caller: &AuthUser,
        question_id: i64,
        option_id: i64,
    ) -> Result<(), AppError> {
        Self::owned_question(db, caller, question_id).await?;

        let result = sqlx::query("DELETE FROM options WHERE id = $1 AND question_id = $2")
            .bind(option_id)
            .bind(question_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Option not found")));
        }
        Ok(())
    }
}
