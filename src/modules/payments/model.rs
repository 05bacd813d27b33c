use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Payment {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    /// Amount charged after the discount.
    pub amount: f64,
    pub discount_applied: f64,
    pub status: PaymentStatus,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Validate, ToSchema, Debug)]
pub struct CreatePaymentDto {
    pub course_id: i64,
    #[validate(range(exclusive_min = 0.0, message = "amount must be greater than 0"))]
    pub amount: f64,
    #[validate(length(max = 50, message = "payment_method must be at most 50 characters"))]
    pub payment_method: Option<String>,
    #[validate(length(min = 1, max = 100, message = "transaction_id must be between 1 and 100 characters"))]
    pub transaction_id: Option<String>,
}
