use std::path::Path;

use actix_web::web;
use common::{
    env_config::UploadConfig,
    error::{AppError, Res},
    jwt::AuthUser,
    misc,
};
use db::Store;
use image::{ImageFormat, imageops::FilterType};
use tempfile::NamedTempFile;

pub const AVATAR_SIZE: u32 = 250;

/// Resizes the uploaded image into the avatars directory and stores its
/// public URL on the user. Returns that URL.
///
/// A request without an `avatar` file is rejected as unauthorized.
pub async fn update_avatar(
    store: &dyn Store,
    uploads: &UploadConfig,
    user: &AuthUser,
    upload: Option<NamedTempFile>,
) -> Res<String> {
    let upload =
        upload.ok_or_else(|| AppError::Unauthorized("Avatar file is required".to_string()))?;
    let file_name = misc::avatar_file_name(&user.email);
    let destination = uploads.avatars_dir.join(&file_name);

    let target = destination.clone();
    web::block(move || resize_avatar(upload, &target))
        .await
        .map_err(|e| AppError::Internal(format!("Avatar worker failed: {}", e)))??;

    let avatar_url = format!("/avatars/{}", file_name);
    if store.update_user_avatar(user.id, &avatar_url).await?.is_none() {
        // nobody left to own the written file
        if let Err(error) = std::fs::remove_file(&destination) {
            log::warn!("Failed to remove orphaned avatar {}: {}", destination.display(), error);
        }
        return Err(AppError::not_authorized());
    }
    Ok(avatar_url)
}

/// Owns the upload, so the temp file is removed on every return path.
fn resize_avatar(upload: NamedTempFile, destination: &Path) -> Res<()> {
    let bytes = std::fs::read(upload.path())?;
    let image = image::load_from_memory(&bytes).map_err(|e| {
        log::debug!("Rejected avatar upload: {}", e);
        AppError::BadRequest("Avatar must be a valid image".to_string())
    })?;

    image
        .resize_exact(AVATAR_SIZE, AVATAR_SIZE, FilterType::Lanczos3)
        .to_rgb8()
        .save_with_format(destination, ImageFormat::Jpeg)
        .map_err(|e| AppError::Internal(format!("Failed to write avatar: {}", e)))?;

    upload.close()?;
    Ok(())
}
