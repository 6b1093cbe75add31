use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use common::{misc::Subscription, validation::normalize_email};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubscriptionRequest {
    pub subscription: Subscription,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ResendVerificationRequest {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
}

impl ResendVerificationRequest {
    pub fn normalized(mut self) -> Self {
        self.email = normalize_email(&self.email);
        self
    }
}

/// `avatar` is optional here so that a missing file reaches the handler
/// and is answered with 401 like an unauthenticated request.
#[derive(Debug, MultipartForm)]
pub struct AvatarForm {
    #[multipart(limit = "1MB")]
    pub avatar: Option<TempFile>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AvatarResponse {
    #[serde(rename = "avatarUrl")]
    pub avatar_url: String,
}
