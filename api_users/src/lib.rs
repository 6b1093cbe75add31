use std::path::Path;

use actix_multipart::form::{MultipartFormConfig, tempfile::TempFileConfig};
use actix_web::web;
use common::error::AppError;

pub mod mail;

pub mod routes {
    pub mod auth;
    pub mod user;
    pub mod verify;
}

pub mod services {
    pub mod auth;
    pub mod avatar;
    pub mod user;
}

pub mod dtos {
    pub mod auth;
    pub mod user;
}

pub fn mount_users() -> actix_web::Scope {
    web::scope("/users")
        .service(routes::auth::post_signup)
        .service(routes::auth::post_login)
        .service(routes::auth::get_logout)
        .service(routes::auth::get_current)
        .service(routes::verify::get_verify)
        .service(routes::verify::post_verify)
        .service(routes::user::patch_avatar)
        .service(routes::user::patch_subscription)
}

/// Malformed multipart bodies, missing fields and oversized files become a
/// 400 `{message}`.
pub fn multipart_config() -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(2 * 1024 * 1024)
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Uploads are staged in `upload_dir` and removed once handled.
pub fn temp_file_config(upload_dir: &Path) -> TempFileConfig {
    TempFileConfig::default().directory(upload_dir)
}
