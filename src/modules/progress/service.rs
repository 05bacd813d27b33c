use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};

use super::model::{ProgressUpdate, ProgressView};
use crate::modules::enrollments::service::EnrollmentService;
use crate::utils::errors::AppError;

/// Share of assignments completed, as a percentage. A course without
/// assignments is at 0.
pub fn progress_percent(completed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (completed.clamp(0, total) as f64 / total as f64) * 100.0
}

pub struct ProgressService;

impl ProgressService {
    /// Recomputes an enrollment's progress from the user's submissions.
    #[instrument(skip(db))]
    pub async fn recompute(
        db: &PgPool,
        user_id: i64,
        course_id: i64,
    ) -> Result<ProgressUpdate, AppError> {
        let enrollment = EnrollmentService::find_by_pair(db, user_id, course_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("enrollment not found")))?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM assignments WHERE course_id = $1",
        )
        .bind(course_id)
        .fetch_one(db)
        .await?;

        let completed = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(DISTINCT s.assignment_id)
               FROM submissions s
               JOIN assignments a ON a.id = s.assignment_id
               WHERE s.user_id = $1 AND a.course_id = $2"#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(db)
        .await?;

        let progress = progress_percent(completed, total);

        sqlx::query("UPDATE enrollments SET progress = $1, updated_at = NOW() WHERE id = $2")
            .bind(progress)
            .bind(enrollment.id)
            .execute(db)
            .await?;

        info!(enrollment_id = enrollment.id, progress, completed, total, "Progress recomputed");

        Ok(ProgressUpdate {
            message: "progress updated successfully".to_string(),
            progress,
            total,
            completed,
            enrollment_id: enrollment.id,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_progress(
        db: &PgPool,
        user_id: i64,
        course_id: i64,
    ) -> Result<ProgressView, AppError> {
        let enrollment = EnrollmentService::find_by_pair(db, user_id, course_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("enrollment not found")))?;

        Ok(ProgressView {
            user_id,
            course_id,
            progress: enrollment.progress,
        })
    }
}
