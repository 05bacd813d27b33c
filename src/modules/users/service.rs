use sqlx::PgPool;
use tracing::instrument;

use crate::modules::users::model::{NewUser, User, UserWithPassword};
use crate::utils::errors::AppError;

pub struct UserService;

impl UserService {
    #[instrument(skip(db, new_user), fields(email = %new_user.email, role = %new_user.role))]
    pub async fn create_user(db: &PgPool, new_user: NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO users (name, email, password, role, is_verified)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, name, email, role, is_verified, created_at, updated_at"#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(new_user.role)
        .bind(new_user.is_verified)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!("email already exists"));
            }
            AppError::from(e)
        })
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: i64) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, role, is_verified, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }

    #[instrument(skip(db))]
    pub async fn find_with_password(
        db: &PgPool,
        email: &str,
    ) -> Result<Option<UserWithPassword>, AppError> {
        let user = sqlx::query_as::<_, UserWithPassword>(
            r#"SELECT id, name, email, password, role, is_verified, reset_token, reset_expiry,
                      created_at, updated_at
               FROM users WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn email_exists(db: &PgPool, email: &str) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(db)
                .await?;
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::model::UserRole;
    use crate::utils::password::hash_password;

    fn new_user(email: &str, role: UserRole) -> NewUser {
        NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: hash_password("password123").unwrap(),
            role,
            is_verified: true,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_and_get_user(pool: PgPool) {
        let created = UserService::create_user(&pool, new_user("t@example.com", UserRole::Teacher))
            .await
            .unwrap();

        let fetched = UserService::get_user(&pool, created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.role, UserRole::Teacher);
        assert!(UserService::email_exists(&pool, "t@example.com").await.unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_duplicate_email_is_bad_request(pool: PgPool) {
        UserService::create_user(&pool, new_user("dup@example.com", UserRole::Student))
            .await
            .unwrap();
        let err = UserService::create_user(&pool, new_user("dup@example.com", UserRole::Student))
            .await
            .unwrap_err();

        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "email already exists");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_get_missing_user(pool: PgPool) {
        let err = UserService::get_user(&pool, 999).await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
    }
}
