use std::sync::Arc;

use common::{
    error::{AppError, Res},
    jwt::AuthUser,
    misc::Subscription,
};
use db::{Store, models::user::User};

use crate::mail::Mailer;

pub async fn update_subscription(
    store: &dyn Store,
    user: &AuthUser,
    subscription: Subscription,
) -> Res<User> {
    store
        .update_user_subscription(user.id, subscription)
        .await?
        .ok_or_else(AppError::not_authorized)
}

pub async fn verify_email(store: &dyn Store, verification_token: &str) -> Res<User> {
    store
        .verify_user(verification_token)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Sends the stored verification link again. Delivery is the whole point of
/// this call, so a mail failure is reported to the caller.
pub async fn resend_verification(store: &dyn Store, mailer: Arc<dyn Mailer>, email: &str) -> Res<()> {
    let user = store
        .get_user_by_email(email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    match (user.verified, user.verification_token) {
        (false, Some(verification_token)) => {
            mailer.send_verification(&user.email, &verification_token).await
        }
        _ => Err(AppError::BadRequest(
            "Verification has already been passed".to_string(),
        )),
    }
}
