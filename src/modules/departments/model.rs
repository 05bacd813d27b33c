use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Validate, ToSchema, Debug)]
pub struct CreateDepartmentDto {
    #[validate(length(min = 1, max = 255, message = "name must be between 1 and 255 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(max = 255, message = "thumbnail_url must be at most 255 characters"))]
    pub thumbnail_url: Option<String>,
}

#[derive(Deserialize, Validate, ToSchema, Debug, Default)]
pub struct UpdateDepartmentDto {
    #[validate(length(min = 1, max = 255, message = "name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 255, message = "thumbnail_url must be at most 255 characters"))]
    pub thumbnail_url: Option<String>,
}
