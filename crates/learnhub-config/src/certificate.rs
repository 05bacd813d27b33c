use std::env;

use crate::env_or;

#[derive(Clone, Debug)]
pub struct CertificateConfig {
    /// Base URL encoded in a certificate's QR code; the code is appended as the last segment.
    pub verify_base_url: String,
    /// Attempts at generating an unused certificate code before giving up.
    pub code_attempts: u32,
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            verify_base_url: "https://yourdomain.com/verify".to_string(),
            code_attempts: 5,
        }
    }
}

impl CertificateConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            verify_base_url: env::var("CERTIFICATE_VERIFY_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.verify_base_url),
            code_attempts: env_or("CERTIFICATE_CODE_ATTEMPTS", defaults.code_attempts).max(1),
        }
    }

    pub fn verify_url(&self, code: &str) -> String {
        format!("{}/{}", self.verify_base_url, code)
    }
}
