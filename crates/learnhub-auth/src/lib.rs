//! # LearnHub Auth
//!
//! Session tokens for the LearnHub API.
//!
//! - [`role`]: the closed set of user roles
//! - [`claims`]: what a token carries (`user_id`, `role`, `exp`)
//! - [`jwt`]: issuing and verifying HS256 tokens
//!
//! Verification reports each failure point separately through [`TokenError`],
//! so callers can log the exact reason while answering 401 for all of them.
//!
//! ```ignore
//! use learnhub_auth::{UserRole, create_token, verify_token};
//! use learnhub_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_token(42, UserRole::Student, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.user_id, 42);
//! ```

pub mod claims;
pub mod jwt;
pub mod role;

pub use claims::Claims;
pub use jwt::{TokenError, create_token, verify_token};
pub use role::UserRole;
