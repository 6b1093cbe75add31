use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::AppError;

/// Account plan level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subscription {
    #[default]
    Starter,
    Pro,
    Business,
}

impl Subscription {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subscription::Starter => "starter",
            Subscription::Pro => "pro",
            Subscription::Business => "business",
        }
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subscription {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "starter" => Ok(Subscription::Starter),
            "pro" => Ok(Subscription::Pro),
            "business" => Ok(Subscription::Business),
            other => Err(AppError::BadRequest(format!(
                "Invalid subscription: {}",
                other
            ))),
        }
    }
}

/// Identicon avatar assigned at signup.
pub fn gravatar_url(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!("https://www.gravatar.com/avatar/{:x}?d=identicon", digest)
}

pub fn generate_verification_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// File name of a user's uploaded avatar, derived from the email local-part.
///
/// Anything outside `[A-Za-z0-9._-]` is replaced so the name can never
/// escape the avatars directory.
pub fn avatar_file_name(email: &str) -> String {
    let local_part = email.split('@').next().unwrap_or_default();
    let mut nickname: String = local_part
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if nickname.is_empty() || nickname.starts_with('.') {
        nickname.insert(0, '_');
    }
    format!("{}.jpg", nickname)
}

/// Parses a path id. Anything that is not a UUID cannot exist, so it maps
/// to not-found.
pub fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound("Not found".to_string()))
}
