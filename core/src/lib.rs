use std::sync::Arc;

use actix_web::{HttpResponse, web};
use api_users::mail::Mailer;
use common::{
    env_config::Config,
    error::{AppError, Res},
    http::{json_config, query_config},
};
use db::SharedStore;

pub mod cors;

/// Everything the handlers share, built once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: SharedStore,
    pub mailer: Arc<dyn Mailer>,
}

/// Registers app data, the `/api` routes and the static avatar files.
///
/// Middleware is wrapped by the caller; the auth guard must be among it for
/// authenticated routes to see an identity.
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(web::Data::new(state.config.clone()))
        .app_data(web::Data::new(state.store.clone()))
        .app_data(web::Data::new(state.mailer.clone()))
        .app_data(json_config())
        .app_data(query_config())
        .app_data(api_users::multipart_config())
        .app_data(api_users::temp_file_config(&state.config.uploads.upload_dir))
        .service(
            web::scope("/api")
                .service(api_users::mount_users())
                .service(api_contacts::mount_contacts()),
        )
        .service(actix_files::Files::new(
            "/avatars",
            state.config.uploads.avatars_dir.clone(),
        ))
        .default_service(web::to(not_found));
}

async fn not_found() -> Res<HttpResponse> {
    Err(AppError::NotFound("Not found".to_string()))
}
