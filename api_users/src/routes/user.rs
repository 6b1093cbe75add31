use std::sync::Arc;

use actix_multipart::form::MultipartForm;
use actix_web::{Responder, patch, web};
use common::{env_config::Config, error::Res, http::Success, jwt::AuthUser};
use db::{SharedStore, Store};

use crate::{
    dtos::{
        auth::UserSummary,
        user::{AvatarForm, AvatarResponse, SubscriptionRequest},
    },
    services,
};

/// Switches the caller's plan.
///
/// # Input
/// - `req`: JSON payload `{ subscription }`, one of `starter`, `pro`, `business`
///
/// # Output
/// - Success: 200 with the updated `{ email, subscription }`
/// - Error: 400 for any other value or extra fields, 401 without a valid token
#[patch("/subscription")]
pub async fn patch_subscription(
    user: AuthUser,
    req: web::Json<SubscriptionRequest>,
    store: web::Data<SharedStore>,
) -> Res<impl Responder> {
    let store: &dyn Store = &***store;
    let updated =
        services::user::update_subscription(store, &user, req.into_inner().subscription).await?;
    Success::ok(UserSummary::from(&updated))
}

/// Replaces the caller's avatar with a 250x250 JPEG built from the uploaded
/// `avatar` multipart field.
///
/// # Frontend Example
/// ```javascript
/// const form = new FormData();
/// form.append('avatar', fileInput.files[0]);
/// const response = await fetch('/api/users/avatars', {
///   method: 'PATCH',
///   headers: { 'Authorization': `Bearer ${localStorage.getItem('authToken')}` },
///   body: form
/// });
/// const { avatarUrl } = await response.json();
/// ```
#[patch("/avatars")]
pub async fn patch_avatar(
    user: AuthUser,
    form: MultipartForm<AvatarForm>,
    config: web::Data<Arc<Config>>,
    store: web::Data<SharedStore>,
) -> Res<impl Responder> {
    let store: &dyn Store = &***store;
    let upload = form.into_inner().avatar.map(|avatar| avatar.file);
    let avatar_url =
        services::avatar::update_avatar(store, &config.uploads, &user, upload).await?;
    Success::ok(AvatarResponse { avatar_url })
}
