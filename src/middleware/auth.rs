use anyhow::anyhow;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::warn;

use learnhub_auth::{Claims, UserRole, verify_token};

use crate::state::AppState;
use crate::utils::errors::AppError;

/// The authenticated caller, taken from the `Authorization: Bearer <token>` header.
///
/// When a role layer has already validated the token it leaves the caller in
/// the request extensions, and this extractor reuses it.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> i64 {
        self.0.user_id
    }

    pub fn role(&self) -> UserRole {
        self.0.role
    }

    pub fn is_admin(&self) -> bool {
        self.0.role == UserRole::Admin
    }

    /// Students may only act on their own records; teachers and admins on anyone's.
    pub fn ensure_self_or_staff(&self, user_id: i64) -> Result<(), AppError> {
        if self.0.role == UserRole::Student && self.0.user_id != user_id {
            return Err(AppError::forbidden(anyhow!(
                "Forbidden: students can only access their own records"
            )));
        }
        Ok(())
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::unauthorized(anyhow!("Missing authorization header")))?
            .to_str()
            .map_err(|_| AppError::unauthorized(anyhow!("Invalid authorization header format")))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthorized(anyhow!("Invalid authorization header format")))?;

        let claims = verify_token(token, &state.jwt_config).map_err(|e| {
            warn!(reason = %e, "Rejected bearer token");
            AppError::unauthorized(e)
        })?;

        let user = AuthUser(claims);
        parts.extensions.insert(user.clone());

        Ok(user)
    }
}
