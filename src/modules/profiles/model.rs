use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Student-facing profile. A verified profile earns the payment discount.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub image: Option<String>,
    pub college: String,
    pub bio: Option<String>,
    pub verified: bool,
    pub student_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct TeacherProfile {
    pub id: i64,
    pub user_id: i64,
    pub department_id: Option<i64>,
    pub bio: Option<String>,
    pub experience: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Validate, ToSchema, Debug)]
pub struct CreateProfileDto {
    #[validate(length(min = 1, max = 100, message = "college must be between 1 and 100 characters"))]
    pub college: String,
    #[validate(length(min = 1, max = 20, message = "student_id must be between 1 and 20 characters"))]
    pub student_id: String,
    pub bio: Option<String>,
    #[validate(length(max = 255, message = "image must be at most 255 characters"))]
    pub image: Option<String>,
}

#[derive(Deserialize, Validate, ToSchema, Debug)]
pub struct VerifyProfileDto {
    pub verified: bool,
}

/// Upsert body for a teacher profile. An explicit `department_id: null`
/// unassigns the department; omitting the field keeps the current one.
#[derive(Deserialize, Validate, ToSchema, Debug, Default)]
pub struct UpsertTeacherProfileDto {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub department_id: Option<Option<i64>>,
    pub bio: Option<String>,
    #[validate(range(min = 0, message = "experience cannot be negative"))]
    pub experience: Option<i32>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_id_null_differs_from_absent() {
        let absent: UpsertTeacherProfileDto = serde_json::from_str(r#"{"bio":"x"}"#).unwrap();
        assert_eq!(absent.department_id, None);

        let null: UpsertTeacherProfileDto =
            serde_json::from_str(r#"{"department_id":null}"#).unwrap();
        assert_eq!(null.department_id, Some(None));

        let set: UpsertTeacherProfileDto =
            serde_json::from_str(r#"{"department_id":7}"#).unwrap();
        assert_eq!(set.department_id, Some(Some(7)));
    }
}
