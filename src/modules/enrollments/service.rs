use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};

use learnhub_auth::UserRole;

use super::model::{
    EnrollDto, Enrollment, EnrollmentWithCourse, EnrollmentWithStudent, UpdateEnrollmentDto,
};
use crate::metrics::track_enrollment;
use crate::middleware::auth::AuthUser;
use crate::modules::courses::service::CourseService;
use crate::utils::errors::AppError;

pub struct EnrollmentService;

impl EnrollmentService {
    /// Enrolls the calling student. The up-front duplicate check gives the
    /// friendly error; the unique `(user_id, course_id)` constraint settles
    /// concurrent attempts.
    #[instrument(skip(db, caller), fields(caller_id = caller.user_id()))]
    pub async fn enroll(
        db: &PgPool,
        caller: &AuthUser,
        dto: EnrollDto,
    ) -> Result<Enrollment, AppError> {
        if caller.role() != UserRole::Student {
            return Err(AppError::forbidden(anyhow!(
                "only students can enroll in courses"
            )));
        }

        let course_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM courses WHERE id = $1)")
                .bind(dto.course_id)
                .fetch_one(db)
                .await?;
        if !course_exists {
            return Err(AppError::not_found(anyhow!("Course not found")));
        }

        if Self::find_by_pair(db, caller.user_id(), dto.course_id)
            .await?
            .is_some()
        {
            return Err(AppError::bad_request(anyhow!(
                "already enrolled in this course"
            )));
        }

        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"INSERT INTO enrollments (user_id, course_id, progress, status)
               VALUES ($1, $2, 0, 'active')
               RETURNING *"#,
        )
        .bind(caller.user_id())
        .bind(dto.course_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow!("already enrolled in this course"));
            }
            AppError::from(e)
        })?;

        track_enrollment();
        info!(
            enrollment_id = enrollment.id,
            course_id = dto.course_id,
            "Student enrolled"
        );
        Ok(enrollment)
    }

    pub async fn find_by_pair(
        db: &PgPool,
        user_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>, AppError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            "SELECT * FROM enrollments WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(db)
        .await?;
        Ok(enrollment)
    }

    #[instrument(skip(db))]
    pub async fn get_user_enrollments(
        db: &PgPool,
        user_id: i64,
    ) -> Result<Vec<EnrollmentWithCourse>, AppError> {
        let enrollments = sqlx::query_as::<_, EnrollmentWithCourse>(
            r#"SELECT e.*, c.title AS course_title, c.code AS course_code
               FROM enrollments e
               JOIN courses c ON c.id = e.course_id
               WHERE e.user_id = $1
               ORDER BY e.enrolled_at DESC, e.id DESC"#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(enrollments)
    }

    #[instrument(skip(db, caller), fields(caller_id = caller.user_id()))]
    pub async fn get_course_enrollments(
        db: &PgPool,
        caller: &AuthUser,
        course_id: i64,
    ) -> Result<Vec<EnrollmentWithStudent>, AppError> {
        CourseService::get_owned_course(db, caller, course_id).await?;

        let enrollments = sqlx::query_as::<_, EnrollmentWithStudent>(
            r#"SELECT e.*, u.name AS user_name, u.email AS user_email
               FROM enrollments e
               JOIN users u ON u.id = e.user_id
               WHERE e.course_id = $1
               ORDER BY e.enrolled_at, e.id"#,
        )
        .bind(course_id)
        .fetch_all(db)
        .await?;
        Ok(enrollments)
    }

    #[instrument(skip(db))]
    pub async fn update_enrollment(
        db: &PgPool,
        id: i64,
        dto: UpdateEnrollmentDto,
    ) -> Result<Enrollment, AppError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"UPDATE enrollments
               SET progress = COALESCE($1, progress),
                   status = COALESCE($2, status),
                   completed_at = COALESCE($3, completed_at),
                   certificate_id = COALESCE($4, certificate_id),
                   updated_at = NOW()
               WHERE id = $5
               RETURNING *"#,
        )
        .bind(dto.progress)
        .bind(dto.status)
        .bind(dto.completed_at)
        .bind(&dto.certificate_id)
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("enrollment not found")))?;

        info!(enrollment_id = id, "Enrollment updated");
        Ok(enrollment)
    }

    #[instrument(skip(db))]
    pub async fn delete_enrollment(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("enrollment not found")));
        }

        info!(enrollment_id = id, "Enrollment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::enrollments::model::EnrollmentStatus;
    use crate::modules::fixtures::*;
    use axum::http::StatusCode;

    async fn course(pool: &PgPool) -> (i64, i64) {
        let teacher = insert_user(pool, "teacher@example.com", UserRole::Teacher).await;
        let dept = insert_department(pool, "History").await;
        (teacher, insert_course(pool, teacher, dept, "HIS101").await)
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_enroll_starts_active_at_zero(pool: PgPool) {
        let (_, course_id) = course(&pool).await;
        let student = insert_user(&pool, "student@example.com", UserRole::Student).await;

        let enrollment =
            EnrollmentService::enroll(&pool, &caller(student, UserRole::Student), EnrollDto { course_id })
                .await
                .unwrap();

        assert_eq!(enrollment.progress, 0.0);
        assert_eq!(enrollment.status, EnrollmentStatus::Active);
        assert_eq!(enrollment.user_id, student);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_duplicate_enrollment_rejected(pool: PgPool) {
        let (_, course_id) = course(&pool).await;
        let student = insert_user(&pool, "student@example.com", UserRole::Student).await;
        let me = caller(student, UserRole::Student);

        EnrollmentService::enroll(&pool, &me, EnrollDto { course_id })
            .await
            .unwrap();
        let err = EnrollmentService::enroll(&pool, &me, EnrollDto { course_id })
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "already enrolled in this course");

        let rows: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM enrollments WHERE user_id = $1 AND course_id = $2",
        )
        .bind(student)
        .bind(course_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(rows, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_concurrent_enrollments_leave_one_row(pool: PgPool) {
        let (_, course_id) = course(&pool).await;
        let student = insert_user(&pool, "racer@example.com", UserRole::Student).await;
        let me = caller(student, UserRole::Student);

        let (a, b) = tokio::join!(
            EnrollmentService::enroll(&pool, &me, EnrollDto { course_id }),
            EnrollmentService::enroll(&pool, &me, EnrollDto { course_id }),
        );
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM enrollments")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_only_students_enroll(pool: PgPool) {
        let (teacher, course_id) = course(&pool).await;
        let err = EnrollmentService::enroll(&pool, &caller(teacher, UserRole::Teacher), EnrollDto { course_id })
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        let student = insert_user(&pool, "student@example.com", UserRole::Student).await;
        let err = EnrollmentService::enroll(
            &pool,
            &caller(student, UserRole::Student),
            EnrollDto {
                course_id: course_id + 1,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_course_roster_requires_owner(pool: PgPool) {
        let (teacher, course_id) = course(&pool).await;
        let student = insert_user(&pool, "student@example.com", UserRole::Student).await;
        enroll(&pool, student, course_id).await;

        let roster = EnrollmentService::get_course_enrollments(
            &pool,
            &caller(teacher, UserRole::Teacher),
            course_id,
        )
        .await
        .unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].user.email, "student@example.com");

        let other = insert_user(&pool, "other@example.com", UserRole::Teacher).await;
        let err = EnrollmentService::get_course_enrollments(
            &pool,
            &caller(other, UserRole::Teacher),
            course_id,
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_admin_update_and_delete(pool: PgPool) {
        let (_, course_id) = course(&pool).await;
        let student = insert_user(&pool, "student@example.com", UserRole::Student).await;
        let id = enroll(&pool, student, course_id).await;

        let updated = EnrollmentService::update_enrollment(
            &pool,
            id,
            UpdateEnrollmentDto {
                status: Some(EnrollmentStatus::Dropped),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.status, EnrollmentStatus::Dropped);
        assert_eq!(updated.progress, 0.0);

        EnrollmentService::delete_enrollment(&pool, id).await.unwrap();
        let err = EnrollmentService::delete_enrollment(&pool, id)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
