use anyhow::anyhow;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::{error, info, instrument, warn};

use learnhub_auth::{UserRole, create_token};

use crate::config::jwt::JwtConfig;
use crate::config::registration::RegistrationConfig;
use crate::metrics::{track_login, track_user_registered};
use crate::modules::auth::model::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    ResetPasswordRequest, VerifyEmailRequest,
};
use crate::modules::auth::pending::{PendingRegistration, PendingRegistrationStore};
use crate::modules::users::model::{NewUser, User};
use crate::modules::users::service::UserService;
use crate::utils::codes::{generate_otp, normalize_email};
use crate::utils::email::EmailService;
use crate::utils::errors::AppError;
use crate::utils::password::{hash_password, verify_password};

pub struct AuthService;

impl AuthService {
    /// Starts a registration: stores the submitted fields with a fresh code and
    /// emails the code. Nothing is kept if the email cannot be delivered.
    #[instrument(skip(db, pending, email_service, config, dto), fields(email = %dto.email))]
    pub async fn register(
        db: &PgPool,
        pending: &PendingRegistrationStore,
        email_service: &EmailService,
        config: &RegistrationConfig,
        dto: RegisterRequest,
    ) -> Result<MessageResponse, AppError> {
        let email = normalize_email(&dto.email);
        let role = dto.role.unwrap_or_default();

        if role == UserRole::Admin {
            return Err(AppError::bad_request(anyhow!(
                "admin accounts cannot self-register"
            )));
        }

        if UserService::email_exists(db, &email).await? {
            return Err(AppError::bad_request(anyhow!("email already exists")));
        }

        let otp = generate_otp();
        let entry = PendingRegistration {
            name: dto.name.trim().to_string(),
            email: email.clone(),
            role,
            password: dto.password,
            otp: otp.clone(),
            expires_at: Utc::now() + Duration::seconds(config.code_ttl_seconds),
        };
        let name = entry.name.clone();

        pending.put(entry).await?;

        if let Err(e) = email_service
            .send_registration_code(&email, &name, &otp, config.code_ttl_seconds / 60)
            .await
        {
            error!(error = %e.message(), "Failed to deliver registration code");
            if let Err(remove_err) = pending.remove(&email).await {
                error!(error = %remove_err.message(), "Failed to discard pending registration");
            }
            return Err(AppError::internal(anyhow!("failed to send OTP email")));
        }

        info!(role = %role, "Registration pending verification");
        Ok(MessageResponse::new("OTP sent, please verify email"))
    }

    /// Confirms a pending registration and persists the verified user.
    #[instrument(skip(db, pending, dto), fields(email = %dto.email))]
    pub async fn verify_email(
        db: &PgPool,
        pending: &PendingRegistrationStore,
        dto: VerifyEmailRequest,
    ) -> Result<User, AppError> {
        let email = normalize_email(&dto.email);

        let entry = pending
            .get(&email)
            .await?
            .ok_or_else(|| AppError::bad_request(anyhow!("user not found or not registered yet")))?;

        if !entry.matches(dto.otp.trim(), Utc::now()) {
            return Err(AppError::bad_request(anyhow!("invalid or expired OTP")));
        }

        if entry.password.is_empty() {
            return Err(AppError::internal(anyhow!(
                "registration error: password data missing"
            )));
        }

        let password_hash = hash_password(&entry.password)?;

        let user = UserService::create_user(
            db,
            NewUser {
                name: entry.name.clone(),
                email: entry.email.clone(),
                password_hash,
                role: entry.role,
                is_verified: true,
            },
        )
        .await?;

        if let Err(remove_err) = pending.remove(&email).await {
            warn!(error = %remove_err.message(), "Failed to clear pending registration after verify");
        }

        track_user_registered(user.role.as_str());
        info!(user_id = user.id, role = %user.role, "User registered");

        Ok(user)
    }

    #[instrument(skip(db, jwt_config, dto), fields(email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let email = normalize_email(&dto.email);

        let Some(user) = UserService::find_with_password(db, &email).await? else {
            track_login("unknown_email");
            return Err(AppError::bad_request(anyhow!("invalid email or password")));
        };

        if !user.is_verified {
            track_login("unverified");
            return Err(AppError::unauthorized(anyhow!("email is not verified")));
        }

        if !verify_password(&dto.password, &user.password)? {
            track_login("bad_password");
            warn!(user_id = user.id, "Login with wrong password");
            return Err(AppError::unauthorized(anyhow!("invalid password")));
        }

        let token = create_token(user.id, user.role, jwt_config).map_err(AppError::internal)?;

        track_login("success");
        info!(user_id = user.id, "User logged in");

        Ok(LoginResponse {
            message: "login successfully".to_string(),
            token,
            user: user.into(),
        })
    }

    #[instrument(skip(db, email_service, config, dto), fields(email = %dto.email))]
    pub async fn forgot_password(
        db: &PgPool,
        email_service: &EmailService,
        config: &RegistrationConfig,
        dto: ForgotPasswordRequest,
    ) -> Result<MessageResponse, AppError> {
        let email = normalize_email(&dto.email);

        let user = UserService::find_with_password(db, &email)
            .await?
            .ok_or_else(|| AppError::bad_request(anyhow!("user not found")))?;

        let otp = generate_otp();
        let expiry = Utc::now() + Duration::seconds(config.code_ttl_seconds);

        sqlx::query(
            "UPDATE users SET reset_token = $1, reset_expiry = $2, updated_at = NOW() WHERE id = $3",
        )
        .bind(&otp)
        .bind(expiry)
        .bind(user.id)
        .execute(db)
        .await?;

        if let Err(e) = email_service
            .send_password_reset_code(&email, &user.name, &otp, config.code_ttl_seconds / 60)
            .await
        {
            error!(error = %e.message(), "Failed to deliver password reset code");
            return Err(AppError::internal(anyhow!("failed to send OTP email")));
        }

        info!(user_id = user.id, "Password reset code issued");
        Ok(MessageResponse::new("OTP sent to email"))
    }

    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn reset_password(
        db: &PgPool,
        dto: ResetPasswordRequest,
    ) -> Result<MessageResponse, AppError> {
        let email = normalize_email(&dto.email);

        let user = UserService::find_with_password(db, &email)
            .await?
            .ok_or_else(|| AppError::bad_request(anyhow!("invalid email")))?;

        let code_valid = match (&user.reset_token, user.reset_expiry) {
            (Some(token), Some(expiry)) => token == dto.otp.trim() && Utc::now() <= expiry,
            _ => false,
        };

        if !code_valid {
            return Err(AppError::bad_request(anyhow!("invalid or expired OTP")));
        }

        let password_hash = hash_password(&dto.new_password)?;

        sqlx::query(
            r#"UPDATE users
               SET password = $1, reset_token = NULL, reset_expiry = NULL, updated_at = NOW()
               WHERE id = $2"#,
        )
        .bind(&password_hash)
        .bind(user.id)
        .execute(db)
        .await?;

        info!(user_id = user.id, "Password reset");
        Ok(MessageResponse::new("password reset successfully"))
    }
}
