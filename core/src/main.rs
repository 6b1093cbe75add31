use std::fs;

use actix_web::{App, HttpServer};
use api_users::mail;
use common::env_config::Config;
use server::{AppState, cors};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env().expect("Failed to load configuration");

    // init logger
    logger::setup(&config.log_file, &config.log_level).expect("Failed to set up logger");

    // upload staging and avatar output
    fs::create_dir_all(&config.uploads.upload_dir)?;
    fs::create_dir_all(&config.uploads.avatars_dir)?;

    // init store
    let store = db::setup(&config.database_url, config.is_production())
        .await
        .expect("Failed to set up database");

    let state = AppState {
        mailer: mail::from_config(&config.mail),
        config: config.clone(),
        store,
    };

    log::info!(
        "Listening on {}:{} ({})",
        config.server_host,
        config.server_port,
        config.environment
    );

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(logger::middleware(state.config.console_logging_enabled)) // 3rd
            .wrap(extractor::middleware()) // 2nd
            .wrap(cors::middleware(&state.config.cors_allowed_origin)) // 1st
            .configure(|cfg| server::configure(cfg, &state))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
