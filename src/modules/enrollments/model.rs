use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "enrollment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    #[default]
    Active,
    Completed,
    Dropped,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Enrollment {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    /// Completion percentage in `[0, 100]`.
    pub progress: f64,
    pub status: EnrollmentStatus,
    pub enrolled_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Code of the certificate issued for this enrollment.
    pub certificate_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct EnrolledCourse {
    #[sqlx(rename = "course_title")]
    pub title: String,
    #[sqlx(rename = "course_code")]
    pub code: String,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct EnrollmentWithCourse {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub enrollment: Enrollment,
    #[sqlx(flatten)]
    pub course: EnrolledCourse,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct EnrolledStudent {
    #[sqlx(rename = "user_name")]
    pub name: String,
    #[sqlx(rename = "user_email")]
    pub email: String,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct EnrollmentWithStudent {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub enrollment: Enrollment,
    #[sqlx(flatten)]
    pub user: EnrolledStudent,
}

#[derive(Deserialize, Validate, ToSchema, Debug)]
pub struct EnrollDto {
    pub course_id: i64,
}

#[derive(Deserialize, Validate, ToSchema, Debug, Default)]
pub struct UpdateEnrollmentDto {
    #[validate(range(min = 0.0, max = 100.0, message = "progress must be between 0 and 100"))]
    pub progress: Option<f64>,
    pub status: Option<EnrollmentStatus>,
    pub completed_at: Option<DateTime<Utc>>,
    #[validate(length(max = 100, message = "certificate_id must be at most 100 characters"))]
    pub certificate_id: Option<String>,
}
