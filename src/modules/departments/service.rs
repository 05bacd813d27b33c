use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};

use super::model::{CreateDepartmentDto, Department, UpdateDepartmentDto};
use crate::utils::errors::AppError;

pub struct DepartmentService;

impl DepartmentService {
    #[instrument(skip(db))]
    pub async fn create_department(
        db: &PgPool,
        dto: CreateDepartmentDto,
    ) -> Result<Department, AppError> {
        let department = sqlx::query_as::<_, Department>(
            r#"INSERT INTO departments (name, description, thumbnail_url)
               VALUES ($1, $2, $3)
               RETURNING id, name, description, thumbnail_url, created_at, updated_at"#,
        )
        .bind(dto.name.trim())
        .bind(&dto.description)
        .bind(&dto.thumbnail_url)
        .fetch_one(db)
        .await?;

        info!(department_id = department.id, "Department created");
        Ok(department)
    }

    #[instrument(skip(db))]
    pub async fn list_departments(db: &PgPool) -> Result<Vec<Department>, AppError> {
        let departments = sqlx::query_as::<_, Department>(
            r#"SELECT id, name, description, thumbnail_url, created_at, updated_at
               FROM departments
               ORDER BY name"#,
        )
        .fetch_all(db)
        .await?;
        Ok(departments)
    }

    #[instrument(skip(db))]
    pub async fn get_department(db: &PgPool, id: i64) -> Result<Department, AppError> {
        sqlx::query_as::<_, Department>(
            r#"SELECT id, name, description, thumbnail_url, created_at, updated_at
               FROM departments WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Department not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_department(
        db: &PgPool,
        id: i64,
        dto: UpdateDepartmentDto,
    ) -> Result<Department, AppError> {
        sqlx::query_as::<_, Department>(
            r#"UPDATE departments
               SET name = COALESCE($1, name),
                   description = COALESCE($2, description),
                   thumbnail_url = COALESCE($3, thumbnail_url),
                   updated_at = NOW()
               WHERE id = $4
               RETURNING id, name, description, thumbnail_url, created_at, updated_at"#,
        )
        .bind(dto.name.as_deref().map(str::trim))
        .bind(&dto.description)
        .bind(&dto.thumbnail_url)
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Department not found")))
    }

    /// Courses reference their department with `ON DELETE RESTRICT`, so a
    /// department in use cannot be removed.
    #[instrument(skip(db))]
    pub async fn delete_department(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_foreign_key_violation()
                {
                    return AppError::bad_request(anyhow!(
                        "department still has courses and cannot be deleted"
                    ));
                }
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Department not found")));
        }

        info!(department_id = id, "Department deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn dto(name: &str) -> CreateDepartmentDto {
        CreateDepartmentDto {
            name: name.to_string(),
            description: Some("Numbers and proofs".to_string()),
            thumbnail_url: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_department_crud(pool: PgPool) {
        let created = DepartmentService::create_department(&pool, dto("Mathematics"))
            .await
            .unwrap();

        let updated = DepartmentService::update_department(
            &pool,
            created.id,
            UpdateDepartmentDto {
                name: Some("Applied Mathematics".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Applied Mathematics");
        assert_eq!(updated.description, created.description);

        assert_eq!(DepartmentService::list_departments(&pool).await.unwrap().len(), 1);

        DepartmentService::delete_department(&pool, created.id)
            .await
            .unwrap();
        let err = DepartmentService::get_department(&pool, created.id)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_department_with_courses_cannot_be_deleted(pool: PgPool) {
        let department = DepartmentService::create_department(&pool, dto("Chemistry"))
            .await
            .unwrap();
        let teacher_id: i64 = sqlx::query_scalar(
            "INSERT INTO users (name, email, password, role, is_verified) VALUES ('T', 't@example.com', 'x', 'teacher', true) RETURNING id",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO courses (teacher_id, department_id, title, code) VALUES ($1, $2, 'Organic', 'CHEM101')",
        )
        .bind(teacher_id)
        .bind(department.id)
        .execute(&pool)
        .await
        .unwrap();

        let err = DepartmentService::delete_department(&pool, department.id)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
