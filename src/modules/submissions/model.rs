use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub user_id: i64,
    pub score: i32,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct SubmissionResult {
    #[serde(flatten)]
    pub submission: Submission,
    pub total_questions: i32,
}

#[derive(Deserialize, Validate, ToSchema, Debug)]
pub struct SubmitAnswersDto {
    pub assignment_id: i64,
    /// Question id to selected option id.
    #[serde(default)]
    pub answers: HashMap<i64, i64>,
}
