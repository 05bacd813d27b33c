use anyhow::anyhow;
use sqlx::{PgExecutor, PgPool};
use tracing::{info, instrument, warn};

use super::model::{
    Course, CourseFilterParams, CourseRelationRow, CourseWithRelations, CreateCourseDto,
    UpdateCourseDto,
};
use crate::middleware::auth::AuthUser;
use crate::utils::errors::AppError;

const COURSE_WITH_RELATIONS: &str = r#"
    SELECT c.id, c.teacher_id, c.department_id, c.title, c.code, c.description, c.credits,
           c.created_at, c.updated_at,
           u.name AS teacher_name, u.email AS teacher_email,
           tp.bio AS teacher_bio, tp.experience AS teacher_experience,
           d.name AS department_name
    FROM courses c
    JOIN users u ON u.id = c.teacher_id
    JOIN departments d ON d.id = c.department_id
    LEFT JOIN teacher_profiles tp ON tp.user_id = c.teacher_id
"#;

/// Where a caller stands with respect to departments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeacherDepartment {
    NoProfile,
    Unassigned,
    Assigned(i64),
}

impl TeacherDepartment {
    /// A teacher may place a course only in their own department.
    pub fn authorize(self, requested: i64) -> Result<(), AppError> {
        match self {
            Self::NoProfile => Err(AppError::forbidden(anyhow!(
                "Teacher profile validation failed"
            ))),
            Self::Unassigned => Err(AppError::forbidden(anyhow!("Department not assigned"))),
            Self::Assigned(own) if own != requested => Err(AppError::forbidden(anyhow!(
                "Authorization Failed: Department Mismatch"
            ))),
            Self::Assigned(_) => Ok(()),
        }
    }
}

pub struct CourseService;

impl CourseService {
    async fn teacher_department<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: i64,
    ) -> Result<TeacherDepartment, AppError> {
        let profile = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT department_id FROM teacher_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(match profile {
            None => TeacherDepartment::NoProfile,
            Some(None) => TeacherDepartment::Unassigned,
            Some(Some(id)) => TeacherDepartment::Assigned(id),
        })
    }

    async fn department_exists<'e, E: PgExecutor<'e>>(
        executor: E,
        department_id: i64,
    ) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM departments WHERE id = $1)")
                .bind(department_id)
                .fetch_one(executor)
                .await?;
        Ok(exists)
    }

    async fn fetch_with_relations<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
    ) -> Result<Option<CourseWithRelations>, AppError> {
        let query = format!("{COURSE_WITH_RELATIONS} WHERE c.id = $1");
        let row = sqlx::query_as::<_, CourseRelationRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row.map(Into::into))
    }

    fn non_blank<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::bad_request(anyhow!("{field} must not be blank")));
        }
        Ok(trimmed)
    }

    fn map_code_conflict(e: sqlx::Error) -> AppError {
        if let sqlx::Error::Database(db_err) = &e
            && db_err.is_unique_violation()
        {
            return AppError::bad_request(anyhow!("course code already exists"));
        }
        AppError::from(e)
    }

    /// Creates a course owned by the caller.
    ///
    /// Teachers must have a profile assigned to the requested department;
    /// admins skip the department match but the department must still exist.
    #[instrument(skip(db, caller), fields(caller_id = caller.user_id()))]
    pub async fn create_course(
        db: &PgPool,
        caller: &AuthUser,
        dto: CreateCourseDto,
    ) -> Result<CourseWithRelations, AppError> {
        if dto.department_id == 0 {
            return Err(AppError::bad_request(anyhow!("department_id is required")));
        }
        let title = Self::non_blank("title", &dto.title)?;
        let code = Self::non_blank("code", &dto.code)?;

        let mut tx = db.begin().await?;

        if !caller.is_admin() {
            let standing = Self::teacher_department(&mut *tx, caller.user_id()).await?;
            if let Err(e) = standing.authorize(dto.department_id) {
                warn!(?standing, department_id = dto.department_id, "Course creation refused");
                return Err(e);
            }
        }

        if !Self::department_exists(&mut *tx, dto.department_id).await? {
            return Err(AppError::not_found(anyhow!("Department not found")));
        }

        let course_id = sqlx::query_scalar::<_, i64>(
            r#"INSERT INTO courses (teacher_id, department_id, title, code, description, credits)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id"#,
        )
        .bind(caller.user_id())
        .bind(dto.department_id)
        .bind(title)
        .bind(code)
        .bind(&dto.description)
        .bind(dto.credits)
        .fetch_one(&mut *tx)
        .await
        .map_err(Self::map_code_conflict)?;

        let course = Self::fetch_with_relations(&mut *tx, course_id)
            .await?
            .ok_or_else(|| AppError::internal(anyhow!("created course could not be reloaded")))?;

        tx.commit().await?;

        info!(course_id, department_id = dto.department_id, "Course created");
        Ok(course)
    }

    #[instrument(skip(db))]
    pub async fn list_courses(
        db: &PgPool,
        filters: CourseFilterParams,
    ) -> Result<Vec<CourseWithRelations>, AppError> {
        let query = format!(
            r#"{COURSE_WITH_RELATIONS}
               WHERE ($1::BIGINT IS NULL OR c.department_id = $1)
                 AND ($2::BIGINT IS NULL OR c.teacher_id = $2)
               ORDER BY c.created_at DESC, c.id DESC"#
        );
        let rows = sqlx::query_as::<_, CourseRelationRow>(&query)
            .bind(filters.department_id)
            .bind(filters.teacher_id)
            .fetch_all(db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(db))]
    pub async fn get_course(db: &PgPool, id: i64) -> Result<CourseWithRelations, AppError> {
        Self::fetch_with_relations(db, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))
    }

    /// Loads a course the caller may manage: admins manage every course,
    /// teachers only their own.
    #[instrument(skip(db, caller), fields(caller_id = caller.user_id()))]
    pub async fn get_owned_course(
        db: &PgPool,
        caller: &AuthUser,
        course_id: i64,
    ) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(course_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))?;

        if !caller.is_admin() && course.teacher_id != caller.user_id() {
            return Err(AppError::forbidden(anyhow!(
                "Forbidden: You can only manage your own courses."
            )));
        }

        Ok(course)
    }

    #[instrument(skip(db, caller), fields(caller_id = caller.user_id()))]
    pub async fn update_course(
        db: &PgPool,
        caller: &AuthUser,
        id: i64,
        dto: UpdateCourseDto,
    ) -> Result<CourseWithRelations, AppError> {
        let title = dto
            .title
            .as_deref()
            .map(|t| Self::non_blank("title", t))
            .transpose()?;
        let code = dto
            .code
            .as_deref()
            .map(|c| Self::non_blank("code", c))
            .transpose()?;

        let mut tx = db.begin().await?;

        let existing =
            sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))?;

        if !caller.is_admin() && existing.teacher_id != caller.user_id() {
            return Err(AppError::forbidden(anyhow!(
                "Forbidden: You can only update courses you created."
            )));
        }

        let new_department = match dto.department_id {
            Some(0) => return Err(AppError::bad_request(anyhow!("department_id is required"))),
            Some(requested) if requested != existing.department_id => Some(requested),
            _ => None,
        };

        if let Some(requested) = new_department {
            if !caller.is_admin() {
                Self::teacher_department(&mut *tx, caller.user_id())
                    .await?
                    .authorize(requested)?;
            }
            if !Self::department_exists(&mut *tx, requested).await? {
                return Err(AppError::not_found(anyhow!("Department not found")));
            }
        }

        sqlx::query(
            r#"UPDATE courses
               SET title = COALESCE($1, title),
                   code = COALESCE($2, code),
                   description = COALESCE($3, description),
                   credits = COALESCE($4, credits),
                   department_id = COALESCE($5, department_id),
                   updated_at = NOW()
               WHERE id = $6"#,
        )
        .bind(title)
        .bind(code)
        .bind(&dto.description)
        .bind(dto.credits)
        .bind(new_department)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(Self::map_code_conflict)?;

        let course = Self::fetch_with_relations(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))?;

        tx.commit().await?;

        info!(course_id = id, "Course updated");
        Ok(course)
    }

    #[instrument(skip(db, caller), fields(caller_id = caller.user_id()))]
    pub async fn delete_course(db: &PgPool, caller: &AuthUser, id: i64) -> Result<(), AppError> {
        let teacher_id =
            sqlx::query_scalar::<_, i64>("SELECT teacher_id FROM courses WHERE id = $1")
                .bind(id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))?;

        if !caller.is_admin() && teacher_id != caller.user_id() {
            return Err(AppError::forbidden(anyhow!(
                "Forbidden: You can only delete courses you created."
            )));
        }

        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        info!(course_id = id, "Course deleted");
        Ok(())
    }
}
