//! OTP delivery over SMS (Twilio REST) and email (SMTP).
//!
//! Provider misconfiguration and dispatch failure are distinct errors so
//! handlers can map them to 500 vs 502. A failed dispatch leaves the stored
//! OTP valid for a retry.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use reqwest::Client;
use std::env;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("{0} provider not configured")]
    NotConfigured(&'static str),
    #[error("Failed to send OTP: {0}")]
    Send(String),
}

#[derive(Debug, Clone)]
pub struct OtpSettings {
    pub length: u32,
    pub expiry_minutes: i64,
}

impl OtpSettings {
    pub fn from_env() -> Self {
        Self {
            length: env::var("OTP_LENGTH")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(6),
            expiry_minutes: env::var("OTP_EXPIRY_MINUTES")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(5),
        }
    }
}

#[derive(Clone)]
pub struct NotificationService {
    client: Client,
    twilio_api_base: String,
    twilio_account_sid: String,
    twilio_auth_token: String,
    twilio_from_number: String,
    smtp_host: String,
    smtp_user: String,
    smtp_password: String,
    email_from: String,
}

impl NotificationService {
    pub fn from_env() -> Self {
        Self {
            client: Client::new(),
            twilio_api_base: env::var("TWILIO_API_BASE")
                .unwrap_or_else(|_| "https://api.twilio.com".to_string()),
            twilio_account_sid: env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
            twilio_from_number: env::var("TWILIO_FROM_NUMBER").unwrap_or_default(),
            smtp_host: env::var("SMTP_HOST").unwrap_or_default(),
            smtp_user: env::var("SMTP_USER").unwrap_or_default(),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            email_from: env::var("EMAIL_FROM").unwrap_or_default(),
        }
    }

    pub fn sms_configured(&self) -> bool {
        !self.twilio_account_sid.is_empty() && !self.twilio_auth_token.is_empty()
    }

    pub fn email_configured(&self) -> bool {
        !self.smtp_host.is_empty() && !self.smtp_user.is_empty() && !self.smtp_password.is_empty()
    }

    /// Deliver the OTP over SMS through the Twilio Messages API.
    pub async fn send_sms_otp(&self, to: &str, code: &str) -> Result<(), NotifyError> {
        if !self.sms_configured() {
            return Err(NotifyError::NotConfigured("SMS"));
        }

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.twilio_api_base, self.twilio_account_sid
        );
        let body = format!("Your Framekart OTP is {}", code);
        let params = [
            ("To", to),
            ("From", self.twilio_from_number.as_str()),
            ("Body", body.as_str()),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.twilio_account_sid, Some(&self.twilio_auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| NotifyError::Send(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!("Twilio send failed with {}: {}", status, detail);
            return Err(NotifyError::Send(format!("SMS provider returned {}", status)));
        }

        tracing::info!("OTP SMS sent to {}", to);
        Ok(())
    }

    /// Deliver the OTP over email via SMTP. The blocking transport runs on
    /// the blocking thread pool.
    pub async fn send_email_otp(&self, to: &str, code: &str) -> Result<(), NotifyError> {
        if !self.email_configured() {
            return Err(NotifyError::NotConfigured("Email"));
        }

        let email = Message::builder()
            .from(
                self.email_from
                    .parse()
                    .map_err(|e: lettre::address::AddressError| NotifyError::Send(e.to_string()))?,
            )
            .to(to
                .parse()
                .map_err(|e: lettre::address::AddressError| NotifyError::Send(e.to_string()))?)
            .subject("Your Framekart OTP")
            .header(ContentType::TEXT_PLAIN)
            .body(format!("Your Framekart OTP is {}", code))
            .map_err(|e| NotifyError::Send(e.to_string()))?;

        let mailer = SmtpTransport::relay(&self.smtp_host)
            .map_err(|e| NotifyError::Send(e.to_string()))?
            .credentials(Credentials::new(
                self.smtp_user.clone(),
                self.smtp_password.clone(),
            ))
            .build();

        let result = tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| NotifyError::Send(e.to_string()))?;

        match result {
            Ok(_) => {
                tracing::info!("OTP email sent to {}", to);
                Ok(())
            }
            Err(e) => {
                tracing::error!("SMTP send failed: {}", e);
                Err(NotifyError::Send(e.to_string()))
            }
        }
    }
}
