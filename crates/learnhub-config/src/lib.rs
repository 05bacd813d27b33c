//! # LearnHub Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: session token signing
//! - [`cors`]: allowed origins
//! - [`email`]: SMTP delivery of one-time codes
//! - [`rate_limit`]: per-IP limits on the authentication endpoints
//! - [`registration`]: one-time code lifetime and the pending-registration store
//! - [`scoring`]: submission scoring mode
//! - [`certificate`]: certificate verification links
//!
//! ```ignore
//! use learnhub_config::{JwtConfig, EmailConfig, RegistrationConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let email_config = EmailConfig::from_env();
//! let registration_config = RegistrationConfig::from_env();
//! ```

pub mod certificate;
pub mod cors;
pub mod email;
pub mod jwt;
pub mod rate_limit;
pub mod registration;
pub mod scoring;

pub use certificate::CertificateConfig;
pub use cors::CorsConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use registration::{PendingBackend, RegistrationConfig};
pub use scoring::{ScoringConfig, ScoringMode};

/// Reads an environment variable and parses it, falling back to `default`.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(default)
}
