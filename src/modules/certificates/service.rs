use anyhow::anyhow;
use chrono::{Datelike, Utc};
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use super::model::{Certificate, CertificateDetails};
use super::pdf::CertificateDocument;
use crate::config::certificate::CertificateConfig;
use crate::metrics::track_certificate_issued;
use crate::modules::enrollments::model::Enrollment;
use crate::utils::codes::generate_certificate_code;
use crate::utils::errors::AppError;

pub struct CertificateService;

impl CertificateService {
    /// Issues a certificate for a completed enrollment and marks the
    /// enrollment completed. The enrollment row is locked for the whole
    /// transaction so concurrent requests see a consistent state.
    pub async fn issue(
        db: &PgPool,
        config: &CertificateConfig,
        user_id: i64,
        course_id: i64,
    ) -> Result<Certificate, AppError> {
        let year = Utc::now().year();
        Self::issue_with(db, config, user_id, course_id, || {
            generate_certificate_code(year)
        })
        .await
    }

    /// Issues with codes drawn from `next_code`, retried on collision up to
    /// `config.code_attempts` times.
    #[instrument(skip(db, config, next_code))]
    async fn issue_with(
        db: &PgPool,
        config: &CertificateConfig,
        user_id: i64,
        course_id: i64,
        mut next_code: impl FnMut() -> String,
    ) -> Result<Certificate, AppError> {
        let mut tx = db.begin().await?;

        let enrollment = sqlx::query_as::<_, Enrollment>(
            "SELECT * FROM enrollments WHERE user_id = $1 AND course_id = $2 FOR UPDATE",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("enrollment not found")))?;

        if enrollment.progress < 100.0 {
            return Err(AppError::bad_request(anyhow!(
                "course not completed, certificate cannot be issued"
            )));
        }

        let mut certificate = None;

        for attempt in 1..=config.code_attempts {
            let code = next_code();
            let inserted = sqlx::query_as::<_, Certificate>(
                r#"INSERT INTO certificates (user_id, course_id, code, url)
                   VALUES ($1, $2, $3, $4)
                   ON CONFLICT (code) DO NOTHING
                   RETURNING *"#,
            )
            .bind(user_id)
            .bind(course_id)
            .bind(&code)
            .bind(config.verify_url(&code))
            .fetch_optional(&mut *tx)
            .await?;

            if inserted.is_some() {
                certificate = inserted;
                break;
            }
            warn!(attempt, code = %code, "Certificate code collision");
        }

        let certificate = certificate.ok_or_else(|| {
            AppError::internal(anyhow!("failed to generate a unique certificate code"))
        })?;

        sqlx::query(
            r#"UPDATE enrollments
               SET certificate_id = $1,
                   status = 'completed',
                   completed_at = COALESCE(completed_at, NOW()),
                   updated_at = NOW()
               WHERE id = $2"#,
        )
        .bind(&certificate.code)
        .bind(enrollment.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        track_certificate_issued();
        info!(certificate_id = certificate.id, code = %certificate.code, "Certificate issued");

        Ok(certificate)
    }

    #[instrument(skip(db))]
    pub async fn get_user_certificates(
        db: &PgPool,
        user_id: i64,
    ) -> Result<Vec<Certificate>, AppError> {
        let certificates = sqlx::query_as::<_, Certificate>(
            "SELECT * FROM certificates WHERE user_id = $1 ORDER BY issued_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;

        Ok(certificates)
    }

    #[instrument(skip(db))]
    pub async fn get_certificate(db: &PgPool, id: i64) -> Result<Certificate, AppError> {
        sqlx::query_as::<_, Certificate>("SELECT * FROM certificates WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("certificate not found")))
    }

    /// Loads everything printed on the certificate PDF.
    #[instrument(skip(db, config))]
    pub async fn get_document(
        db: &PgPool,
        config: &CertificateConfig,
        id: i64,
    ) -> Result<(Certificate, CertificateDocument), AppError> {
        let details = sqlx::query_as::<_, CertificateDetails>(
            r#"SELECT c.*, u.name AS user_name, co.title AS course_title
               FROM certificates c
               JOIN users u ON u.id = c.user_id
               JOIN courses co ON co.id = c.course_id
               WHERE c.id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("certificate not found")))?;

        let certificate = details.certificate;
        let document = CertificateDocument {
            student_name: details.user_name,
            course_title: details.course_title,
            code: certificate.code.clone(),
            issued_at: certificate.issued_at,
            verify_url: certificate
                .url
                .clone()
                .unwrap_or_else(|| config.verify_url(&certificate.code)),
        };

        Ok((certificate, document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::enrollments::model::EnrollmentStatus;
    use crate::modules::enrollments::service::EnrollmentService;
    use crate::modules::fixtures::{enroll, insert_course, insert_department, insert_user};
    use axum::http::StatusCode;
    use learnhub_auth::UserRole;

    async fn completed_enrollment(db: &PgPool, progress: f64) -> (i64, i64) {
        let teacher = insert_user(db, "t@example.com", UserRole::Teacher).await;
        let student = insert_user(db, "s@example.com", UserRole::Student).await;
        let dept = insert_department(db, "Science").await;
        let course = insert_course(db, teacher, dept, "SCI-101").await;
        enroll(db, student, course).await;
        sqlx::query("UPDATE enrollments SET progress = $1 WHERE user_id = $2")
            .bind(progress)
            .bind(student)
            .execute(db)
            .await
            .unwrap();
        (student, course)
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_issue_marks_enrollment_completed(pool: PgPool) {
        let (student, course) = completed_enrollment(&pool, 100.0).await;
        let config = CertificateConfig::default();

        let certificate = CertificateService::issue(&pool, &config, student, course)
            .await
            .unwrap();
        assert!(certificate.code.starts_with(&format!("CERT-{}-", Utc::now().year())));
        assert_eq!(certificate.url, Some(config.verify_url(&certificate.code)));

        let enrollment = EnrollmentService::find_by_pair(&pool, student, course)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::Completed);
        assert_eq!(enrollment.certificate_id, Some(certificate.code.clone()));
        assert!(enrollment.completed_at.is_some());

        let listed = CertificateService::get_user_certificates(&pool, student)
            .await
            .unwrap();
        assert_eq!(listed, vec![certificate]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_issue_retries_taken_code(pool: PgPool) {
        let (student, course) = completed_enrollment(&pool, 100.0).await;
        let config = CertificateConfig::default();
        let taken = CertificateService::issue_with(&pool, &config, student, course, || {
            "CERT-2025-111111".to_string()
        })
        .await
        .unwrap();

        let mut codes = ["CERT-2025-111111", "CERT-2025-222222"].into_iter();
        let certificate = CertificateService::issue_with(&pool, &config, student, course, || {
            codes.next().unwrap().to_string()
        })
        .await
        .unwrap();
        assert_ne!(certificate.id, taken.id);
        assert_eq!(certificate.code, "CERT-2025-222222");

        let enrollment = EnrollmentService::find_by_pair(&pool, student, course)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.certificate_id, Some("CERT-2025-222222".to_string()));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_issue_fails_when_codes_exhausted(pool: PgPool) {
        let (student, course) = completed_enrollment(&pool, 100.0).await;
        let teacher = insert_user(&pool, "other@example.com", UserRole::Teacher).await;
        let dept = insert_department(&pool, "Arts").await;
        let other_course = insert_course(&pool, teacher, dept, "ART-101").await;
        sqlx::query("INSERT INTO certificates (user_id, course_id, code) VALUES ($1, $2, $3)")
            .bind(student)
            .bind(other_course)
            .bind("CERT-2025-333333")
            .execute(&pool)
            .await
            .unwrap();

        let config = CertificateConfig {
            code_attempts: 3,
            ..CertificateConfig::default()
        };
        let mut calls = 0;
        let err = CertificateService::issue_with(&pool, &config, student, course, || {
            calls += 1;
            "CERT-2025-333333".to_string()
        })
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(calls, 3);

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM certificates WHERE course_id = $1")
                .bind(course)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 0);

        let enrollment = EnrollmentService::find_by_pair(&pool, student, course)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::Active);
        assert_eq!(enrollment.certificate_id, None);
        assert!(enrollment.completed_at.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_issue_rejects_incomplete_course(pool: PgPool) {
        let (student, course) = completed_enrollment(&pool, 50.0).await;

        let err = CertificateService::issue(&pool, &CertificateConfig::default(), student, course)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.message(),
            "course not completed, certificate cannot be issued"
        );

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM certificates")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_issue_without_enrollment(pool: PgPool) {
        let err = CertificateService::issue(&pool, &CertificateConfig::default(), 1, 1)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "enrollment not found");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_get_document_uses_names(pool: PgPool) {
        let (student, course) = completed_enrollment(&pool, 100.0).await;
        let config = CertificateConfig::default();
        let issued = CertificateService::issue(&pool, &config, student, course)
            .await
            .unwrap();

        let (certificate, document) = CertificateService::get_document(&pool, &config, issued.id)
            .await
            .unwrap();
        assert_eq!(certificate.id, issued.id);
        assert_eq!(document.student_name, "User s@example.com");
        assert_eq!(document.course_title, "SCI-101");
        assert_eq!(document.verify_url, config.verify_url(&issued.code));

        let missing = CertificateService::get_certificate(&pool, issued.id + 1)
            .await
            .unwrap_err();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
    }
}
