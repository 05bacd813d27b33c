use sqlx::PgPool;
use tracing::{info, instrument};

use super::model::{SubmitAnswersDto, Submission, SubmissionResult};
use super::scoring::score_answers;
use crate::config::scoring::ScoringMode;
use crate::metrics::track_submission;
use crate::modules::assignments::service::AssignmentService;
use crate::utils::errors::AppError;

pub struct SubmissionService;

impl SubmissionService {
    /// Scores the answers and stores one submission. Resubmitting stores
    /// another row.
    #[instrument(skip(db, dto), fields(assignment_id = dto.assignment_id))]
    pub async fn submit(
        db: &PgPool,
        user_id: i64,
        mode: ScoringMode,
        dto: SubmitAnswersDto,
    ) -> Result<SubmissionResult, AppError> {
        AssignmentService::find_assignment(db, dto.assignment_id).await?;
        let questions = AssignmentService::load_questions(db, dto.assignment_id).await?;

        let score = score_answers(&questions, &dto.answers, mode);

        let submission = sqlx::query_as::<_, Submission>(
            r#"INSERT INTO submissions (assignment_id, user_id, score)
               VALUES ($1, $2, $3)
               RETURNING *"#,
        )
        .bind(dto.assignment_id)
        .bind(user_id)
        .bind(score)
        .fetch_one(db)
        .await?;

        track_submission(score);
        info!(submission_id = submission.id, score, total = questions.len(), "Submission scored");

        Ok(SubmissionResult {
            submission,
            total_questions: questions.len() as i32,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_user_submissions(
        db: &PgPool,
        user_id: i64,
    ) -> Result<Vec<Submission>, AppError> {
        let submissions = sqlx::query_as::<_, Submission>(
            "SELECT * FROM submissions WHERE user_id = $1 ORDER BY submitted_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(submissions)
    }

    #[instrument(skip(db))]
    pub async fn get_assignment_submissions(
        db: &PgPool,
        assignment_id: i64,
    ) -> Result<Vec<Submission>, AppError> {
        let submissions = sqlx::query_as::<_, Submission>(
            "SELECT * FROM submissions WHERE assignment_id = $1 ORDER BY submitted_at DESC, id DESC",
        )
        .bind(assignment_id)
        .fetch_all(db)
        .await?;
        Ok(submissions)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::modules::fixtures::*;
    use axum::http::StatusCode;
    use learnhub_auth::UserRole;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_submit_scores_and_allows_resubmission(pool: PgPool) {
        let teacher = insert_user(&pool, "teacher@example.com", UserRole::Teacher).await;
        let student = insert_user(&pool, "student@example.com", UserRole::Student).await;
        let dept = insert_department(&pool, "Art").await;
        let course = insert_course(&pool, teacher, dept, "ART101").await;
        let assignment = insert_assignment(&pool, course, teacher).await;

        let q1 = insert_question(&pool, assignment).await;
        let right = insert_option(&pool, q1, true).await;
        insert_option(&pool, q1, false).await;
        let q2 = insert_question(&pool, assignment).await;
        insert_option(&pool, q2, true).await;
        let wrong = insert_option(&pool, q2, false).await;

        let dto = || SubmitAnswersDto {
            assignment_id: assignment,
            answers: HashMap::from([(q1, right), (q2, wrong)]),
        };

        let first = SubmissionService::submit(&pool, student, ScoringMode::Literal, dto())
            .await
            .unwrap();
        assert_eq!(first.submission.score, 1);
        assert_eq!(first.total_questions, 2);
        assert_eq!(first.submission.user_id, student);

        SubmissionService::submit(&pool, student, ScoringMode::Literal, dto())
            .await
            .unwrap();
        let history = SubmissionService::get_user_submissions(&pool, student)
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_submit_to_missing_assignment(pool: PgPool) {
        let student = insert_user(&pool, "student@example.com", UserRole::Student).await;
        let err = SubmissionService::submit(
            &pool,
            student,
            ScoringMode::Strict,
            SubmitAnswersDto {
                assignment_id: 404,
                answers: HashMap::new(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
