use rand::Rng;

/// Six-digit numeric one-time code, zero padded.
pub fn generate_otp() -> String {
    let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:06}", code)
}

/// Certificate code of the form `CERT-<year>-<6 digits>`.
pub fn generate_certificate_code(year: i32) -> String {
    let serial: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("CERT-{}-{:06}", year, serial)
}

/// Lowercases and trims an email so lookups match regardless of how it was typed.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_is_six_digits() {
        for _ in 0..200 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_certificate_code_format() {
        for _ in 0..200 {
            let code = generate_certificate_code(2025);
            let parts: Vec<&str> = code.split('-').collect();
            assert_eq!(parts.len(), 3);
            assert_eq!(parts[0], "CERT");
            assert_eq!(parts[1], "2025");
            assert_eq!(parts[2].len(), 6);
            assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }
}
