//! Assignments and their multiple-choice content.
//!
//! An assignment holds questions, a question holds answer options, and at
//! most one option per question is marked correct. Deleting a parent
//! removes its children.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Assignment {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub course_id: i64,
    pub teacher_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Question {
    pub id: i64,
    pub assignment_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct AnswerOption {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct QuestionWithOptions {
    #[serde(flatten)]
    pub question: Question,
    pub options: Vec<AnswerOption>,
}

impl QuestionWithOptions {
    /// The option flagged correct, if any.
    pub fn correct_option_id(&self) -> Option<i64> {
        self.options.iter().find(|o| o.is_correct).map(|o| o.id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct AssignmentWithQuestions {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub questions: Vec<QuestionWithOptions>,
}

#[derive(Deserialize, Validate, ToSchema, Debug)]
pub struct CreateAssignmentDto {
    #[validate(length(min = 1, max = 255, message = "title must be between 1 and 255 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub course_id: i64,
}

#[derive(Deserialize, Validate, ToSchema, Debug, Default)]
pub struct UpdateAssignmentDto {
    #[validate(length(min = 1, max = 255, message = "title must be between 1 and 255 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub course_id: Option<i64>,
}

#[derive(Deserialize, IntoParams, ToSchema, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct AssignmentFilterParams {
    pub course_id: Option<i64>,
}

#[derive(Deserialize, Validate, ToSchema, Debug)]
pub struct CreateQuestionDto {
    #[validate(length(min = 1, message = "text is required"))]
    pub text: String,
}

#[derive(Deserialize, Validate, ToSchema, Debug, Default)]
pub struct UpdateQuestionDto {
    #[validate(length(min = 1, message = "text cannot be empty"))]
    pub text: Option<String>,
}

#[derive(Deserialize, Validate, ToSchema, Debug)]
pub struct CreateOptionDto {
    #[validate(length(min = 1, message = "text is required"))]
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Deserialize, Validate, ToSchema, Debug, Default)]
pub struct UpdateOptionDto {
    #[validate(length(min = 1, message = "text cannot be empty"))]
    pub text: Option<String>,
    pub is_correct: Option<bool>,
}
