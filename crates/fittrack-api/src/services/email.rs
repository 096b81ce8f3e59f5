//! Outbound account email (verification and password reset).
//!
//! With `EMAIL_ENABLED=false` or the `mock` provider nothing leaves the
//! process: the recipient, subject and link are logged at INFO instead.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::{error, info, warn};

use fittrack_core::{Error, Result};

pub const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";
pub const MAILGUN_API_BASE: &str = "https://api.mailgun.net/v3";

const VERIFY_SUBJECT: &str = "Verify your FitTrack account";
const RESET_SUBJECT: &str = "Reset your FitTrack password";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailProvider {
    Mock,
    SendGrid,
    Mailgun,
    /// Kept so that a misconfiguration surfaces when mail is sent.
    Unknown(String),
}

impl EmailProvider {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "" | "mock" => Self::Mock,
            "sendgrid" => Self::SendGrid,
            "mailgun" => Self::Mailgun,
            other => Self::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub enabled: bool,
    pub provider: EmailProvider,
    pub from_email: String,
    pub frontend_url: String,
    pub sendgrid_api_key: Option<String>,
    pub mailgun_domain: Option<String>,
    pub mailgun_api_key: Option<String>,
    /// SendGrid send endpoint.
    pub sendgrid_url: String,
    /// Mailgun API base; the domain and `/messages` are appended.
    pub mailgun_api_base: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: EmailProvider::Mock,
            from_email: crate::config::DEFAULT_FROM_EMAIL.to_string(),
            frontend_url: crate::config::DEFAULT_FRONTEND_URL.to_string(),
            sendgrid_api_key: None,
            mailgun_domain: None,
            mailgun_api_key: None,
            sendgrid_url: SENDGRID_URL.to_string(),
            mailgun_api_base: MAILGUN_API_BASE.to_string(),
        }
    }
}

/// A rendered message ready for a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub link: String,
    pub body: String,
}

pub struct EmailService {
    client: Client,
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| Error::Email(format!("Failed to create HTTP client: {}", e)))?;

        if !config.enabled || config.provider == EmailProvider::Mock {
            info!(
                subsystem = "email",
                "Email sending is in MOCK mode. Set EMAIL_ENABLED=true to send real emails."
            );
        }

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &EmailConfig {
        &self.config
    }

    pub fn verification_link(&self, token: &str) -> String {
        format!(
            "{}/verify?token={}",
            self.config.frontend_url.trim_end_matches('/'),
            token
        )
    }

    pub fn reset_link(&self, token: &str) -> String {
        format!(
            "{}/reset-password?token={}",
            self.config.frontend_url.trim_end_matches('/'),
            token
        )
    }

    pub fn verification_email(&self, email: &str, username: &str, token: &str) -> OutgoingEmail {
        let link = self.verification_link(token);
        let body = format!(
            "Hi {username},\n\nThanks for signing up for FitTrack! Please verify your email \
             address by opening the link below:\n\n{link}\n\nThis link expires in 24 hours. \
             If you didn't create an account, you can ignore this email.\n"
        );
        OutgoingEmail {
            to: email.to_string(),
            subject: VERIFY_SUBJECT.to_string(),
            link,
            body,
        }
    }

    pub fn reset_email(&self, email: &str, username: &str, token: &str) -> OutgoingEmail {
        let link = self.reset_link(token);
        let body = format!(
            "Hi {username},\n\nWe received a request to reset your FitTrack password. Open \
             the link below to choose a new one:\n\n{link}\n\nThis link expires in 24 hours. \
             If you didn't request a reset, you can ignore this email.\n"
        );
        OutgoingEmail {
            to: email.to_string(),
            subject: RESET_SUBJECT.to_string(),
            link,
            body,
        }
    }

    /// Returns whether the provider accepted the message. Failures are logged.
    pub async fn send_verification_email(&self, email: &str, username: &str, token: &str) -> bool {
        self.send(self.verification_email(email, username, token))
            .await
    }

    pub async fn send_password_reset_email(
        &self,
        email: &str,
        username: &str,
        token: &str,
    ) -> bool {
        self.send(self.reset_email(email, username, token)).await
    }

    pub async fn send(&self, message: OutgoingEmail) -> bool {
        match self.deliver(&message).await {
            Ok(()) => true,
            Err(e) => {
                error!(subsystem = "email", to = %message.to, error = %e, "Email delivery failed");
                false
            }
        }
    }

    async fn deliver(&self, message: &OutgoingEmail) -> Result<()> {
        if !self.config.enabled {
            log_mock(message);
            return Ok(());
        }
        match &self.config.provider {
            EmailProvider::Mock => {
                log_mock(message);
                Ok(())
            }
            EmailProvider::SendGrid => self.send_via_sendgrid(message).await,
            EmailProvider::Mailgun => self.send_via_mailgun(message).await,
            EmailProvider::Unknown(name) => {
                Err(Error::Config(format!("Unknown email provider: {}", name)))
            }
        }
    }

    async fn send_via_sendgrid(&self, message: &OutgoingEmail) -> Result<()> {
        let api_key = self
            .config
            .sendgrid_api_key
            .as_deref()
            .ok_or_else(|| Error::Config("SENDGRID_API_KEY is not set".to_string()))?;

        let payload = json!({
            "personalizations": [{"to": [{"email": message.to}]}],
            "from": {"email": self.config.from_email},
            "subject": message.subject,
            "content": [{"type": "text/plain", "value": message.body}],
        });

        let response = self
            .client
            .post(self.config.sendgrid_url.as_str())
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Email(format!("SendGrid request failed: {}", e)))?;

        let status = response.status();
        if status != StatusCode::ACCEPTED {
            warn!(subsystem = "email", provider = "sendgrid", status = %status, "SendGrid rejected message");
            return Err(Error::Email(format!("SendGrid returned {}", status)));
        }
        info!(subsystem = "email", provider = "sendgrid", status = %status, "Email sent via SendGrid");
        Ok(())
    }

    async fn send_via_mailgun(&self, message: &OutgoingEmail) -> Result<()> {
        let (Some(domain), Some(api_key)) = (
            self.config.mailgun_domain.as_deref(),
            self.config.mailgun_api_key.as_deref(),
        ) else {
            return Err(Error::Config(
                "MAILGUN_DOMAIN and MAILGUN_API_KEY must be set".to_string(),
            ));
        };

        let form = [
            ("from", self.config.from_email.as_str()),
            ("to", message.to.as_str()),
            ("subject", message.subject.as_str()),
            ("text", message.body.as_str()),
        ];

        let response = self
            .client
            .post(format!(
                "{}/{}/messages",
                self.config.mailgun_api_base.trim_end_matches('/'),
                domain
            ))
            .basic_auth("api", Some(api_key))
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::Email(format!("Mailgun request failed: {}", e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(subsystem = "email", provider = "mailgun", status = %status, "Mailgun rejected message");
            return Err(Error::Email(format!("Mailgun returned {}", status)));
        }
        info!(subsystem = "email", provider = "mailgun", status = %status, "Email sent via Mailgun");
        Ok(())
    }
}

fn log_mock(message: &OutgoingEmail) {
    info!(
        subsystem = "email",
        provider = "mock",
        to = %message.to,
        subject = %message.subject,
        link = %message.link,
        "[MOCK EMAIL] not sent"
    );
}
