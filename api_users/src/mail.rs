use std::sync::Arc;

use async_trait::async_trait;
use common::{env_config::MailConfig, error::Res};
use serde_json::json;

const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";
const SUBJECT: &str = "Email Verification";

/// Outbound delivery of verification links.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification(&self, email: &str, verification_token: &str) -> Res<()>;
}

pub fn verification_link(public_base_url: &str, verification_token: &str) -> String {
    format!("{}/api/users/verify/{}", public_base_url, verification_token)
}

/// Picks the SendGrid mailer when an API key is configured, the logging
/// mailer otherwise.
pub fn from_config(config: &MailConfig) -> Arc<dyn Mailer> {
    if config.sendgrid_api_key.is_empty() {
        log::warn!("SENDGRID_API_KEY is not set; verification links will only be logged");
        Arc::new(LogMailer::new(config.public_base_url.clone()))
    } else {
        Arc::new(SendGridMailer::new(config))
    }
}

/// Sends in the background. Delivery failures are logged and never reach
/// the request that triggered them.
pub fn spawn_verification_email(mailer: Arc<dyn Mailer>, email: String, verification_token: String) {
    actix_web::rt::spawn(async move {
        match mailer.send_verification(&email, &verification_token).await {
            Ok(()) => log::info!("Verification email sent to {}", email),
            Err(error) => log::error!("Error sending verification email to {}: {}", email, error),
        }
    });
}

pub struct SendGridMailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
    public_base_url: String,
}

impl SendGridMailer {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.sendgrid_api_key.clone(),
            from: config.from.clone(),
            public_base_url: config.public_base_url.clone(),
        }
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send_verification(&self, email: &str, verification_token: &str) -> Res<()> {
        let link = verification_link(&self.public_base_url, verification_token);
        let body = json!({
            "personalizations": [{ "to": [{ "email": email }] }],
            "from": { "email": self.from },
            "subject": SUBJECT,
            "content": [{
                "type": "text/plain",
                "value": format!("Click the following link to verify your email: {}", link),
            }],
        });

        self.client
            .post(SENDGRID_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

pub struct LogMailer {
    public_base_url: String,
}

impl LogMailer {
    pub fn new(public_base_url: String) -> Self {
        Self { public_base_url }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification(&self, email: &str, verification_token: &str) -> Res<()> {
        log::info!(
            "Verification link for {}: {}",
            email,
            verification_link(&self.public_base_url, verification_token)
        );
        Ok(())
    }
}
