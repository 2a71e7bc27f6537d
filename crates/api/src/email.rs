//! Transactional email delivery
//!
//! Sends account emails via the Resend API. Delivery failure is surfaced to
//! the caller: signup and forgot-password treat an undeliverable email as a
//! failed request rather than silently dropping it.

use crate::config::Config;

/// Email configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Resend API key; empty disables sending
    pub resend_api_key: String,
    /// From address for emails
    pub email_from: String,
    /// App name for branding
    pub app_name: String,
    /// Base URL used to build links back into the service
    pub public_url: String,
}

impl EmailConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            resend_api_key: config.resend_api_key.clone(),
            email_from: config.email_from.clone(),
            app_name: std::env::var("APP_NAME").unwrap_or_else(|_| "Gatehouse".to_string()),
            public_url: config.public_url.clone(),
        }
    }

    /// Check if email sending is enabled
    pub fn is_enabled(&self) -> bool {
        !self.resend_api_key.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Email provider returned {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("Email request failed: {0}")]
    Transport(String),
}

/// Account email service
#[derive(Clone)]
pub struct Mailer {
    config: EmailConfig,
    client: reqwest::Client,
}

impl Mailer {
    /// Create a new mailer
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Check if email sending is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    /// Send an email via the Resend API
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), EmailError> {
        if !self.config.is_enabled() {
            tracing::warn!(subject = %subject, "Email not configured, skipping send");
            return Ok(());
        }

        let body = serde_json::json!({
            "from": self.config.email_from,
            "to": [to],
            "subject": subject,
            "html": html
        });

        let response = self
            .client
            .post("https://api.resend.com/emails")
            .header(
                "Authorization",
                format!("Bearer {}", self.config.resend_api_key),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        if response.status().is_success() {
            tracing::info!(to = %to, subject = %subject, "Email sent");
            return Ok(());
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        tracing::error!(status, body = %body, "Failed to send email");
        Err(EmailError::Provider { status, body })
    }

    /// Send the email-ownership verification link
    pub async fn send_email_verification(&self, to: &str, token: &str) -> Result<(), EmailError> {
        let verify_link = format!(
            "{}/api/v1/auth/verify-email?token={}",
            self.config.public_url, token
        );

        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2 style="color: #6366f1;">Verify your email address</h2>
    <p>Hi there,</p>
    <p>Thanks for signing up for {app_name}. Confirm that this is your email address to activate your account.</p>
    <p>
        <a href="{verify_link}" style="display: inline-block; padding: 12px 24px; background-color: #6366f1; color: white; text-decoration: none; border-radius: 6px; font-weight: bold;">
            Verify Email
        </a>
    </p>
    <p style="color: #666; font-size: 14px;">This link expires in 24 hours. If you didn't create an account, you can safely ignore this email.</p>
    <hr style="border: none; border-top: 1px solid #eee; margin: 20px 0;">
    <p style="color: #999; font-size: 12px;">{app_name}</p>
</body>
</html>"#,
            app_name = self.config.app_name,
            verify_link = verify_link,
        );

        self.send(
            to,
            &format!("Verify your email - {}", self.config.app_name),
            &html,
        )
        .await
    }

    /// Send the password-reset link
    pub async fn send_password_reset(&self, to: &str, token: &str) -> Result<(), EmailError> {
        let reset_link = format!("{}/reset-password?token={}", self.config.public_url, token);

        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2 style="color: #6366f1;">Reset your password</h2>
    <p>Hi there,</p>
    <p>We received a request to reset the password for your {app_name} account.</p>
    <p>
        <a href="{reset_link}" style="display: inline-block; padding: 12px 24px; background-color: #6366f1; color: white; text-decoration: none; border-radius: 6px; font-weight: bold;">
            Reset Password
        </a>
    </p>
    <p style="color: #666; font-size: 14px;">This link expires in 1 hour. If you didn't request a reset, you can safely ignore this email and your password will stay unchanged.</p>
    <hr style="border: none; border-top: 1px solid #eee; margin: 20px 0;">
    <p style="color: #999; font-size: 12px;">{app_name}</p>
</body>
</html>"#,
            app_name = self.config.app_name,
            reset_link = reset_link,
        );

        self.send(
            to,
            &format!("Reset your password - {}", self.config.app_name),
            &html,
        )
        .await
    }

    /// Notify that the account password was changed
    pub async fn send_password_changed(&self, to: &str) -> Result<(), EmailError> {
        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2 style="color: #059669;">Your password was changed</h2>
    <p>Hi there,</p>
    <p>The password for your {app_name} account was just changed.</p>
    <div style="background-color: #fef2f2; border-left: 4px solid #dc2626; padding: 16px; margin: 20px 0;">
        <p style="margin: 0;">If this wasn't you, reset your password immediately.</p>
    </div>
    <hr style="border: none; border-top: 1px solid #eee; margin: 20px 0;">
    <p style="color: #999; font-size: 12px;">{app_name}</p>
</body>
</html>"#,
            app_name = self.config.app_name,
        );

        self.send(
            to,
            &format!("Password changed - {}", self.config.app_name),
            &html,
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn disabled_mailer() -> Mailer {
        Mailer::new(EmailConfig {
            resend_api_key: String::new(),
            email_from: "Gatehouse <noreply@localhost>".to_string(),
            app_name: "Gatehouse".to_string(),
            public_url: "http://localhost:3000".to_string(),
        })
    }

    #[tokio::test]
    async fn test_disabled_mailer_skips_successfully() {
        let mailer = disabled_mailer();
        assert!(!mailer.is_enabled());
        assert!(mailer
            .send_email_verification("a@x.com", "token")
            .await
            .is_ok());
        assert!(mailer.send_password_reset("a@x.com", "token").await.is_ok());
        assert!(mailer.send_password_changed("a@x.com").await.is_ok());
    }
}
