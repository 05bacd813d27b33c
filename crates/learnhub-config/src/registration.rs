//! One-time codes and the pending-registration store.
//!
//! A registration waits in the pending store until its code is confirmed.
//! Entries stay readable for `pending_retention_seconds` after the code has
//! expired, so a late attempt is told the code expired instead of that no
//! registration exists. After that they are evicted.

use std::str::FromStr;

use crate::env_or;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingBackend {
    Memory,
    Redis,
}

impl FromStr for PendingBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            other => Err(format!("unknown pending store backend: {other}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RegistrationConfig {
    /// Validity of registration and password-reset codes.
    pub code_ttl_seconds: i64,
    pub pending_backend: PendingBackend,
    pub pending_retention_seconds: i64,
    /// How often the in-memory store purges evictable entries.
    pub sweep_interval_seconds: u64,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            code_ttl_seconds: 5 * 60,
            pending_backend: PendingBackend::Memory,
            pending_retention_seconds: 10 * 60,
            sweep_interval_seconds: 60,
        }
    }
}

impl RegistrationConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            code_ttl_seconds: env_or("OTP_TTL_SECONDS", defaults.code_ttl_seconds),
            pending_backend: env_or("PENDING_STORE_BACKEND", defaults.pending_backend),
            pending_retention_seconds: env_or(
                "PENDING_RETENTION_SECONDS",
                defaults.pending_retention_seconds,
            ),
            sweep_interval_seconds: env_or(
                "PENDING_SWEEP_INTERVAL_SECONDS",
                defaults.sweep_interval_seconds,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("memory".parse(), Ok(PendingBackend::Memory));
        assert_eq!(" Redis ".parse(), Ok(PendingBackend::Redis));
        assert!("memcached".parse::<PendingBackend>().is_err());
    }

    #[test]
    fn test_defaults_use_five_minute_codes() {
        let config = RegistrationConfig::default();
        assert_eq!(config.code_ttl_seconds, 300);
        assert_eq!(config.pending_backend, PendingBackend::Memory);
    }
}
