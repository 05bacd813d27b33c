use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Deserialize, Validate, ToSchema, Debug)]
pub struct UpdateProgressDto {
    pub user_id: i64,
    pub course_id: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct ProgressUpdate {
    pub message: String,
    pub progress: f64,
    /// Assignments in the course.
    pub total: i64,
    /// Distinct assignments the user has submitted.
    pub completed: i64,
    pub enrollment_id: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct ProgressView {
    pub user_id: i64,
    pub course_id: i64,
    pub progress: f64,
}
