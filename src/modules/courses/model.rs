use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Course {
    pub id: i64,
    pub teacher_id: i64,
    pub department_id: i64,
    pub title: String,
    pub code: String,
    pub description: Option<String>,
    pub credits: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The course's teacher as shown alongside a course.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct TeacherSummary {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
    pub experience: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct DepartmentSummary {
    pub id: i64,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct CourseWithRelations {
    #[serde(flatten)]
    pub course: Course,
    pub teacher: TeacherSummary,
    pub department: DepartmentSummary,
}

/// One joined row: the course, its teacher's user row and optional teacher
/// profile, and its department.
#[derive(FromRow)]
pub(crate) struct CourseRelationRow {
    #[sqlx(flatten)]
    pub course: Course,
    pub teacher_name: String,
    pub teacher_email: String,
    pub teacher_bio: Option<String>,
    pub teacher_experience: Option<i32>,
    pub department_name: String,
}

impl From<CourseRelationRow> for CourseWithRelations {
    fn from(row: CourseRelationRow) -> Self {
        let teacher = TeacherSummary {
            user_id: row.course.teacher_id,
            name: row.teacher_name,
            email: row.teacher_email,
            bio: row.teacher_bio,
            experience: row.teacher_experience,
        };
        let department = DepartmentSummary {
            id: row.course.department_id,
            name: row.department_name,
        };
        Self {
            course: row.course,
            teacher,
            department,
        }
    }
}

#[derive(Deserialize, Validate, ToSchema, Debug)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, max = 255, message = "title must be between 1 and 255 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 50, message = "code must be between 1 and 50 characters"))]
    pub code: String,
    pub description: Option<String>,
    #[validate(range(min = 1, max = 10, message = "credits must be between 1 and 10"))]
    pub credits: i32,
    pub department_id: i64,
}

#[derive(Deserialize, Validate, ToSchema, Debug, Default)]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, max = 255, message = "title must be between 1 and 255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 50, message = "code must be between 1 and 50 characters"))]
    pub code: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1, max = 10, message = "credits must be between 1 and 10"))]
    pub credits: Option<i32>,
    pub department_id: Option<i64>,
}

#[derive(Deserialize, IntoParams, ToSchema, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct CourseFilterParams {
    pub department_id: Option<i64>,
    pub teacher_id: Option<i64>,
}
