//! Issuing and verifying HS256 session tokens.
//!
//! Tokens expire `JwtConfig::token_expiry` seconds after issuance (24 hours by
//! default) with no leeway. Verification decodes the payload loosely first so
//! that a validly signed token with a missing or mistyped `user_id` or `role`
//! is reported as such rather than as a generic decoding failure.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Deserialize;
use serde_json::Value;

use learnhub_config::JwtConfig;

use crate::claims::Claims;
use crate::role::UserRole;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Invalid token")]
    Invalid,

    #[error("Token has expired")]
    Expired,

    #[error("Token claim 'user_id' is missing or invalid")]
    MissingUserId,

    #[error("Token claim 'role' is missing or invalid")]
    MissingRole,

    #[error("Failed to create token: {0}")]
    Creation(#[source] jsonwebtoken::errors::Error),
}

#[derive(Deserialize)]
struct RawClaims {
    #[serde(default)]
    user_id: Option<Value>,
    #[serde(default)]
    role: Option<Value>,
    exp: usize,
    #[serde(default)]
    iat: usize,
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation
}

pub fn create_token(
    user_id: i64,
    role: UserRole,
    jwt_config: &JwtConfig,
) -> Result<String, TokenError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        user_id,
        role,
        exp: (now + jwt_config.token_expiry).max(0) as usize,
        iat: now.max(0) as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(TokenError::Creation)
}

pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, TokenError> {
    let data = decode::<RawClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })?;

    let raw = data.claims;

    let user_id = raw
        .user_id
        .as_ref()
        .and_then(Value::as_i64)
        .ok_or(TokenError::MissingUserId)?;

    let role = raw
        .role
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<UserRole>().ok())
        .ok_or(TokenError::MissingRole)?;

    Ok(Claims {
        user_id,
        role,
        exp: raw.exp,
        iat: raw.iat,
    })
}
