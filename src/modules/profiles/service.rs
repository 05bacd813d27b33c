use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};

use learnhub_auth::UserRole;

use super::model::{CreateProfileDto, Profile, TeacherProfile, UpsertTeacherProfileDto};
use crate::modules::users::service::UserService;
use crate::utils::errors::AppError;

pub struct ProfileService;

impl ProfileService {
    #[instrument(skip(db, dto))]
    pub async fn create_profile(
        db: &PgPool,
        user_id: i64,
        dto: CreateProfileDto,
    ) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>(
            r#"INSERT INTO profiles (user_id, college, student_id, bio, image)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING *"#,
        )
        .bind(user_id)
        .bind(dto.college.trim())
        .bind(dto.student_id.trim())
        .bind(&dto.bio)
        .bind(&dto.image)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return match db_err.constraint() {
                    Some("profiles_student_id_key") => {
                        AppError::bad_request(anyhow!("student_id already in use"))
                    }
                    _ => AppError::bad_request(anyhow!("profile already exists")),
                };
            }
            AppError::from(e)
        })
    }

    #[instrument(skip(db))]
    pub async fn get_profile(db: &PgPool, user_id: i64) -> Result<Profile, AppError> {
        Self::find_profile(db, user_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Profile not found")))
    }

    #[instrument(skip(db))]
    pub async fn find_profile(db: &PgPool, user_id: i64) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await?;
        Ok(profile)
    }

    #[instrument(skip(db))]
    pub async fn set_verified(
        db: &PgPool,
        user_id: i64,
        verified: bool,
    ) -> Result<Profile, AppError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"UPDATE profiles SET verified = $1, updated_at = NOW()
               WHERE user_id = $2
               RETURNING *"#,
        )
        .bind(verified)
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Profile not found")))?;

        info!(user_id, verified, "Profile verification changed");
        Ok(profile)
    }

    #[instrument(skip(db))]
    pub async fn get_teacher_profile(
        db: &PgPool,
        user_id: i64,
    ) -> Result<TeacherProfile, AppError> {
        sqlx::query_as::<_, TeacherProfile>("SELECT * FROM teacher_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Teacher profile not found")))
    }

    /// Creates or updates the teacher profile of `user_id`.
    #[instrument(skip(db, dto))]
    pub async fn upsert_teacher_profile(
        db: &PgPool,
        user_id: i64,
        dto: UpsertTeacherProfileDto,
    ) -> Result<TeacherProfile, AppError> {
        let user = UserService::get_user(db, user_id).await?;
        if user.role != UserRole::Teacher {
            return Err(AppError::bad_request(anyhow!("user is not a teacher")));
        }

        if let Some(Some(department_id)) = dto.department_id {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM departments WHERE id = $1)",
            )
            .bind(department_id)
            .fetch_one(db)
            .await?;
            if !exists {
                return Err(AppError::not_found(anyhow!("Department not found")));
            }
        }

        let touch_department = dto.department_id.is_some();
        let department_id = dto.department_id.flatten();

        let profile = sqlx::query_as::<_, TeacherProfile>(
            r#"INSERT INTO teacher_profiles (user_id, department_id, bio, experience)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (user_id) DO UPDATE SET
                   department_id = CASE WHEN $5 THEN EXCLUDED.department_id
                                        ELSE teacher_profiles.department_id END,
                   bio = COALESCE(EXCLUDED.bio, teacher_profiles.bio),
                   experience = COALESCE(EXCLUDED.experience, teacher_profiles.experience),
                   updated_at = NOW()
               RETURNING *"#,
        )
        .bind(user_id)
        .bind(department_id)
        .bind(&dto.bio)
        .bind(dto.experience)
        .bind(touch_department)
        .fetch_one(db)
        .await?;

        info!(user_id, department_id = ?profile.department_id, "Teacher profile saved");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::model::NewUser;
    use axum::http::StatusCode;

    async fn user(db: &PgPool, email: &str, role: UserRole) -> i64 {
        UserService::create_user(
            db,
            NewUser {
                name: "Profile Owner".to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
                role,
                is_verified: true,
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn department(db: &PgPool) -> i64 {
        sqlx::query_scalar("INSERT INTO departments (name) VALUES ('Physics') RETURNING id")
            .fetch_one(db)
            .await
            .unwrap()
    }

    fn profile_dto(student_id: &str) -> CreateProfileDto {
        CreateProfileDto {
            college: "State College".to_string(),
            student_id: student_id.to_string(),
            bio: None,
            image: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_profile_starts_unverified(pool: PgPool) {
        let user_id = user(&pool, "s@example.com", UserRole::Student).await;
        let profile = ProfileService::create_profile(&pool, user_id, profile_dto("S-1"))
            .await
            .unwrap();
        assert!(!profile.verified);

        let verified = ProfileService::set_verified(&pool, user_id, true).await.unwrap();
        assert!(verified.verified);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_second_profile_rejected(pool: PgPool) {
        let user_id = user(&pool, "twice@example.com", UserRole::Student).await;
        ProfileService::create_profile(&pool, user_id, profile_dto("S-1"))
            .await
            .unwrap();

        let err = ProfileService::create_profile(&pool, user_id, profile_dto("S-2"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "profile already exists");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_teacher_profile_upsert(pool: PgPool) {
        let teacher = user(&pool, "t@example.com", UserRole::Teacher).await;
        let dept = department(&pool).await;

        let created = ProfileService::upsert_teacher_profile(
            &pool,
            teacher,
            UpsertTeacherProfileDto {
                department_id: Some(Some(dept)),
                bio: Some("Teaches physics".to_string()),
                experience: Some(4),
            },
        )
        .await
        .unwrap();
        assert_eq!(created.department_id, Some(dept));

        let kept = ProfileService::upsert_teacher_profile(
            &pool,
            teacher,
            UpsertTeacherProfileDto {
                experience: Some(5),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(kept.id, created.id);
        assert_eq!(kept.department_id, Some(dept));
        assert_eq!(kept.experience, Some(5));
        assert_eq!(kept.bio.as_deref(), Some("Teaches physics"));

        let cleared = ProfileService::upsert_teacher_profile(
            &pool,
            teacher,
            UpsertTeacherProfileDto {
                department_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(cleared.department_id, None);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_teacher_profile_requires_teacher_and_department(pool: PgPool) {
        let student = user(&pool, "st@example.com", UserRole::Student).await;
        let err = ProfileService::upsert_teacher_profile(&pool, student, Default::default())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let teacher = user(&pool, "te@example.com", UserRole::Teacher).await;
        let err = ProfileService::upsert_teacher_profile(
            &pool,
            teacher,
            UpsertTeacherProfileDto {
                department_id: Some(Some(9999)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Department not found");
    }
}
