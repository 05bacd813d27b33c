use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{info, instrument};

use crate::config::email::EmailConfig;
use crate::utils::errors::AppError;

/// Sends one-time codes by email.
///
/// With delivery disabled the message is logged instead, so registration works
/// locally without an SMTP server.
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    #[instrument(skip(self, code))]
    pub async fn send_registration_code(
        &self,
        to_email: &str,
        to_name: &str,
        code: &str,
        valid_minutes: i64,
    ) -> Result<(), AppError> {
        let text_body = format!(
            "Hi {},\n\n\
             Your LearnHub verification code is: {}\n\n\
             It expires in {} minutes.\n\n\
             If you didn't create an account, you can ignore this email.\n\n\
             LearnHub Team",
            to_name, code, valid_minutes
        );
        let html_body = self.code_template(
            "Verify Your Email",
            to_name,
            "Use this code to finish creating your LearnHub account:",
            code,
            valid_minutes,
        );

        self.send_email(to_email, "Verify Your Email - OTP", &text_body, &html_body, code)
            .await
    }

    #[instrument(skip(self, code))]
    pub async fn send_password_reset_code(
        &self,
        to_email: &str,
        to_name: &str,
        code: &str,
        valid_minutes: i64,
    ) -> Result<(), AppError> {
        let text_body = format!(
            "Hi {},\n\n\
             Your password reset code is: {}\n\n\
             It expires in {} minutes.\n\n\
             If you didn't request this, please ignore this email.\n\n\
             LearnHub Team",
            to_name, code, valid_minutes
        );
        let html_body = self.code_template(
            "Password Reset",
            to_name,
            "Use this code to reset your password:",
            code,
            valid_minutes,
        );

        self.send_email(to_email, "Password Reset OTP", &text_body, &html_body, code)
            .await
    }

    #[instrument(skip(self, html_body, text_body, code))]
    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
        code: &str,
    ) -> Result<(), AppError> {
        if !self.config.enabled {
            info!(to = %to_email, subject = %subject, code = %code, "Email delivery disabled, logging message instead");
            return Ok(());
        }

        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid from email: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid to email: {}", e)))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal(anyhow::anyhow!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal(anyhow::anyhow!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to send email: {}", e)))?;

        info!(to = %to_email, subject = %subject, "Email sent");

        Ok(())
    }

    fn code_template(
        &self,
        title: &str,
        name: &str,
        lead: &str,
        code: &str,
        valid_minutes: i64,
    ) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <table width="100%" cellpadding="0" cellspacing="0" style="background-color: #f4f4f4; padding: 20px;">
        <tr>
            <td align="center">
                <table width="600" cellpadding="0" cellspacing="0" style="background-color: #ffffff; border-radius: 8px; overflow: hidden;">
                    <tr>
                        <td style="background-color: #0F766E; padding: 30px; text-align: center;">
                            <h1 style="margin: 0; color: #ffffff; font-size: 28px;">LearnHub</h1>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 40px 30px;">
                            <h2 style="margin: 0 0 20px 0; color: #333333; font-size: 24px;">{title}</h2>
                            <p style="margin: 0 0 20px 0; color: #666666; font-size: 16px;">Hi <strong>{name}</strong>,</p>
                            <p style="margin: 0 0 20px 0; color: #666666; font-size: 16px;">{lead}</p>
                            <p style="margin: 30px 0; text-align: center; font-size: 32px; letter-spacing: 8px; font-weight: bold; color: #0F766E;">{code}</p>
                            <p style="margin: 0; color: #666666; font-size: 14px;"><strong>This code expires in {valid_minutes} minutes.</strong></p>
                        </td>
                    </tr>
                    <tr>
                        <td style="background-color: #f8f9fa; padding: 20px 30px; text-align: center; border-top: 1px solid #e9ecef;">
                            <p style="margin: 0; color: #999999; font-size: 12px;">This is an automated email from LearnHub. Please do not reply.</p>
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_delivery_succeeds() {
        let service = EmailService::new(EmailConfig::disabled());
        let result = service
            .send_registration_code("jane@example.com", "Jane", "123456", 5)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_server_fails() {
        let config = EmailConfig {
            enabled: true,
            smtp_host: "127.0.0.1".to_string(),
            smtp_port: 1,
            smtp_username: String::new(),
            ..EmailConfig::disabled()
        };
        let service = EmailService::new(config);
        let result = service
            .send_password_reset_code("jane@example.com", "Jane", "123456", 5)
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_template_contains_code() {
        let service = EmailService::new(EmailConfig::disabled());
        let html = service.code_template("Verify", "Jane", "Use this code", "042917", 5);
        assert!(html.contains("042917"));
        assert!(html.contains("5 minutes"));
    }
}
