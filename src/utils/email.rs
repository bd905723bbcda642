//! Transactional email delivery.
//!
//! Services depend on [`EmailSender`] only. [`SmtpEmailSender`] delivers
//! through lettre; [`LogEmailSender`] writes the message to the log and is
//! used when `SMTP_ENABLED` is off.

use async_trait::async_trait;
use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;
use tracing::{info, instrument};

use storefront_config::EmailConfig;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build email: {0}")]
    Build(String),

    #[error("Failed to send email: {0}")]
    Transport(String),

    #[error("Email task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

impl EmailMessage {
    pub fn email_validation(to_email: &str, to_name: &str, validation_link: &str) -> Self {
        let text_body = format!(
            "Hi {},\n\n\
             Welcome to Storefront! Please confirm your email address:\n\
             {}\n\n\
             This link will expire in 24 hours.\n\n\
             Best regards,\n\
             Storefront Team",
            to_name, validation_link
        );
        let html_body = layout(
            "Confirm your email",
            &format!(
                r#"<p>Hi <strong>{}</strong>,</p>
<p>Welcome to Storefront! Please confirm your email address.</p>
<p><a href="{}" style="display: inline-block; padding: 12px 32px; background-color: #0F766E; color: #ffffff; text-decoration: none; border-radius: 6px;">Confirm email</a></p>
<p>This link will expire in 24 hours.</p>"#,
                to_name, validation_link
            ),
        );

        Self {
            to_email: to_email.to_string(),
            to_name: to_name.to_string(),
            subject: "Confirm your email".to_string(),
            text_body,
            html_body,
        }
    }

    pub fn password_recovery(to_email: &str, to_name: &str, code: &str, link: &str) -> Self {
        let text_body = format!(
            "Hi {},\n\n\
             Your password recovery code is: {}\n\n\
             You can also reset your password here:\n\
             {}\n\n\
             This code will expire in 1 hour.\n\n\
             If you didn't request this, please ignore this email.\n\n\
             Best regards,\n\
             Storefront Team",
            to_name, code, link
        );
        let html_body = layout(
            "Password recovery",
            &format!(
                r#"<p>Hi <strong>{}</strong>,</p>
<p>Your password recovery code is:</p>
<p style="font-size: 28px; letter-spacing: 6px; font-weight: bold;">{}</p>
<p>Or reset your password with <a href="{}">this link</a>.</p>
<p><strong>This code will expire in 1 hour.</strong></p>
<p>If you didn't request this, please ignore this email.</p>"#,
                to_name, code, link
            ),
        );

        Self {
            to_email: to_email.to_string(),
            to_name: to_name.to_string(),
            subject: "Password recovery".to_string(),
            text_body,
            html_body,
        }
    }

    pub fn password_changed(to_email: &str, to_name: &str) -> Self {
        let text_body = format!(
            "Hi {},\n\n\
             Your password has been changed.\n\n\
             If you didn't make this change, please contact support immediately.\n\n\
             Best regards,\n\
             Storefront Team",
            to_name
        );
        let html_body = layout(
            "Password changed",
            &format!(
                r#"<p>Hi <strong>{}</strong>,</p>
<p>Your password has been changed.</p>
<p>If you didn't make this change, please contact support immediately.</p>"#,
                to_name
            ),
        );

        Self {
            to_email: to_email.to_string(),
            to_name: to_name.to_string(),
            subject: "Your password was changed".to_string(),
            text_body,
            html_body,
        }
    }
}

fn layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{}</title>
</head>
<body style="margin: 0; padding: 20px; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <table width="600" align="center" cellpadding="0" cellspacing="0" style="background-color: #ffffff; border-radius: 8px;">
        <tr>
            <td style="background-color: #0F766E; padding: 24px; text-align: center;">
                <h1 style="margin: 0; color: #ffffff;">Storefront</h1>
            </td>
        </tr>
        <tr>
            <td style="padding: 32px; color: #444444; font-size: 16px; line-height: 1.5;">
                <h2 style="margin-top: 0;">{}</h2>
                {}
            </td>
        </tr>
        <tr>
            <td style="padding: 16px; text-align: center; color: #999999; font-size: 12px;">
                This is an automated email from Storefront. Please do not reply.
            </td>
        </tr>
    </table>
</body>
</html>"#,
        title, title, content
    )
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError>;
}

pub struct SmtpEmailSender {
    config: EmailConfig,
    transport: SmtpTransport,
}

impl SmtpEmailSender {
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let transport = if config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

            SmtpTransport::relay(&config.smtp_host)
                .map_err(|e| EmailError::Transport(e.to_string()))?
                .port(config.smtp_port)
                .credentials(creds)
                .build()
        };

        Ok(Self { config, transport })
    }

    fn build(&self, message: &EmailMessage) -> Result<Message, EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);
        let to = format!("{} <{}>", message.to_name, message.to_email);

        Message::builder()
            .from(
                from.parse()
                    .map_err(|_| EmailError::InvalidAddress(self.config.from_email.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(message.to_email.clone()))?)
            .subject(message.subject.as_str())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(message.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(message.html_body.clone()),
                    ),
            )
            .map_err(|e| EmailError::Build(e.to_string()))
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    #[instrument(skip(self, message), fields(subject = %message.subject))]
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        let email = self.build(&message)?;
        let mailer = self.transport.clone();

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await?
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        info!("Email sent");
        Ok(())
    }
}

/// Writes outgoing mail to the log instead of delivering it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to_email,
            subject = %message.subject,
            body = %message.text_body,
            "SMTP disabled, email not delivered"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EmailConfig {
        EmailConfig {
            enabled: true,
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@storefront.local".to_string(),
            from_name: "Storefront".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
        }
    }

    #[test]
    fn test_templates_embed_links_and_codes() {
        let msg = EmailMessage::email_validation(
            "ada@shop.test",
            "Ada",
            "http://localhost:5173/email-validation/abc",
        );
        assert!(msg.text_body.contains("http://localhost:5173/email-validation/abc"));
        assert!(msg.html_body.contains("Ada"));

        let msg = EmailMessage::password_recovery("ada@shop.test", "Ada", "K4X9Q2ZD", "http://x");
        assert!(msg.text_body.contains("K4X9Q2ZD"));
        assert!(msg.html_body.contains("K4X9Q2ZD"));
    }

    #[test]
    fn test_build_rejects_invalid_recipient() {
        let sender = SmtpEmailSender::new(config()).unwrap();
        let msg = EmailMessage::password_changed("not an address", "Ada");
        assert!(matches!(
            sender.build(&msg),
            Err(EmailError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_build_valid_message() {
        let sender = SmtpEmailSender::new(config()).unwrap();
        let msg = EmailMessage::password_changed("ada@shop.test", "Ada");
        assert!(sender.build(&msg).is_ok());
    }

    #[tokio::test]
    async fn test_log_sender_always_succeeds() {
        let msg = EmailMessage::password_changed("ada@shop.test", "Ada");
        assert!(LogEmailSender.send(msg).await.is_ok());
    }
}
