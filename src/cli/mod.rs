//! Administrative commands that have no HTTP surface.

use anyhow::anyhow;
use sqlx::PgPool;
use tracing::info;

use learnhub_auth::UserRole;

use crate::modules::profiles::model::{TeacherProfile, UpsertTeacherProfileDto};
use crate::modules::profiles::service::ProfileService;
use crate::modules::users::model::{NewUser, User};
use crate::modules::users::service::UserService;
use crate::utils::codes::normalize_email;
use crate::utils::errors::AppError;
use crate::utils::password::hash_password;

/// Creates a verified admin. Admins cannot register over HTTP.
pub async fn create_admin(
    db: &PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let email = normalize_email(email);
    if name.trim().is_empty() {
        return Err(AppError::bad_request(anyhow!("name is required")));
    }
    if email.len() > 100 {
        return Err(AppError::bad_request(anyhow!(
            "email must be at most 100 characters"
        )));
    }
    if password.len() < 6 {
        return Err(AppError::bad_request(anyhow!(
            "password must be at least 6 characters"
        )));
    }
    if UserService::email_exists(db, &email).await? {
        return Err(AppError::bad_request(anyhow!("email already exists")));
    }

    let user = UserService::create_user(
        db,
        NewUser {
            name: name.trim().to_string(),
            email,
            password_hash: hash_password(password)?,
            role: UserRole::Admin,
            is_verified: true,
        },
    )
    .await?;

    info!(user_id = user.id, "Admin created");
    Ok(user)
}

/// Points a teacher's profile at a department, creating the profile if needed.
pub async fn assign_department(
    db: &PgPool,
    email: &str,
    department_id: i64,
) -> Result<TeacherProfile, AppError> {
    let email = normalize_email(email);
    let user = UserService::find_with_password(db, &email)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

    ProfileService::upsert_teacher_profile(
        db,
        user.id,
        UpsertTeacherProfileDto {
            department_id: Some(Some(department_id)),
            ..Default::default()
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::fixtures::{insert_department, insert_user};
    use axum::http::StatusCode;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_admin(pool: PgPool) {
        let admin = create_admin(&pool, "Root", " Root@Example.com ", "secret123")
            .await
            .unwrap();
        assert_eq!(admin.role, UserRole::Admin);
        assert_eq!(admin.email, "root@example.com");
        assert!(admin.is_verified);

        let err = create_admin(&pool, "Root", "root@example.com", "secret123")
            .await
            .unwrap_err();
        assert_eq!(err.message(), "email already exists");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_admin_rejects_short_password(pool: PgPool) {
        let err = create_admin(&pool, "Root", "root@example.com", "123")
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_admin_rejects_overlong_email(pool: PgPool) {
        let email = format!("{}@{}.com", "a".repeat(60), "b".repeat(50));
        let err = create_admin(&pool, "Root", &email, "secret123")
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "email must be at most 100 characters");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_assign_department(pool: PgPool) {
        insert_user(&pool, "teach@example.com", UserRole::Teacher).await;
        let dept = insert_department(&pool, "Maths").await;

        let profile = assign_department(&pool, "teach@example.com", dept)
            .await
            .unwrap();
        assert_eq!(profile.department_id, Some(dept));

        let err = assign_department(&pool, "nobody@example.com", dept)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
