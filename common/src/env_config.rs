use std::{env, path::PathBuf, sync::Arc};

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
/// Configuration struct for the server.
///
/// Built once at startup and shared with every component that needs it
/// through `web::Data<Arc<Config>>`. Handlers and services never read the
/// process environment themselves.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// The URL of the database to connect to. `memory://` selects the
    /// in-process store.
    pub database_url: String,
    /// Configuration for JWT (JSON Web Token) authentication.
    pub jwt_config: JwtConfig,
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// The allowed origin for CORS (Cross-Origin Resource Sharing).
    pub cors_allowed_origin: String,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// File the logger appends to alongside stdout.
    pub log_file: String,
    /// Minimum level written by the logger (`error` .. `trace`).
    pub log_level: String,
    /// Outbound verification mail settings.
    pub mail: MailConfig,
    /// Directories used by avatar uploads.
    pub uploads: UploadConfig,
}

#[derive(Clone, Debug)]
/// Configuration for JSON Web Token (JWT) authentication.
///
/// This struct contains the secret key used to sign JWTs and
/// the expiration time in hours for issued tokens.
pub struct JwtConfig {
    /// The secret key used to sign and verify JWTs.
    pub secret: String,
    /// The expiration time for JWTs in hours.
    pub expiration_hours: i64,
}

#[derive(Clone, Debug)]
pub struct MailConfig {
    /// SendGrid API key. Empty means verification links are only logged.
    pub sendgrid_api_key: String,
    /// Sender address for verification mail.
    pub from: String,
    /// Base URL the verification link is built on.
    pub public_base_url: String,
}

#[derive(Clone, Debug)]
pub struct UploadConfig {
    /// Where multipart uploads are staged before processing.
    pub upload_dir: PathBuf,
    /// Where resized avatars are written and served from.
    pub avatars_dir: PathBuf,
}

impl Config {
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Creates a new `Config` instance from environment variables.
    ///
    /// Loads `.env` first when present.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `DATABASE_URL`: Connection string for the database
    /// - `JWT_SECRET`: Secret key for JWT signing
    ///
    /// Optional (with defaults):
    /// - `ENVIRONMENT`: "development"
    /// - `IP`: Server host (default: "127.0.0.1")
    /// - `PORT`: Server port (default: 3000)
    /// - `WORKERS`: Number of worker threads (default: 4)
    /// - `CORS_ALLOWED_ORIGIN`: Allowed CORS origin (default: "http://localhost:3000")
    /// - `ENABLE_CONSOLE_LOGGING`: Whether to enable console logging (default: true)
    /// - `LOG_FILE`: Log file path (default: "contacts.log")
    /// - `LOG_LEVEL`: Logger level (default: "debug")
    /// - `JWT_EXPIRATION_HOURS`: Token lifetime in hours (default: 1)
    /// - `SENDGRID_API_KEY`, `MAIL_FROM`, `PUBLIC_BASE_URL`
    /// - `UPLOAD_DIR` (default: "tmp"), `AVATARS_DIR` (default: "public/avatars")
    pub fn from_env() -> Result<Arc<Self>, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|name| env::var(name).ok()).map(Arc::new)
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let or_default = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let jwt_config = JwtConfig {
            secret: required("JWT_SECRET")?,
            expiration_hours: parse_var("JWT_EXPIRATION_HOURS", &or_default("JWT_EXPIRATION_HOURS", "1"))?,
        };

        Ok(Config {
            environment: or_default("ENVIRONMENT", "development"),
            database_url: required("DATABASE_URL")?,
            jwt_config,
            server_host: or_default("IP", "127.0.0.1"),
            server_port: parse_var("PORT", &or_default("PORT", "3000"))?,
            num_workers: parse_var("WORKERS", &or_default("WORKERS", "4"))?,
            cors_allowed_origin: or_default("CORS_ALLOWED_ORIGIN", "http://localhost:3000"),
            console_logging_enabled: or_default("ENABLE_CONSOLE_LOGGING", "true").to_lowercase()
                == "true",
            log_file: or_default("LOG_FILE", "contacts.log"),
            log_level: or_default("LOG_LEVEL", "debug"),
            mail: MailConfig {
                sendgrid_api_key: or_default("SENDGRID_API_KEY", ""),
                from: or_default("MAIL_FROM", "no-reply@localhost"),
                public_base_url: or_default("PUBLIC_BASE_URL", "http://localhost:3000")
                    .trim_end_matches('/')
                    .to_string(),
            },
            uploads: UploadConfig {
                upload_dir: PathBuf::from(or_default("UPLOAD_DIR", "tmp")),
                avatars_dir: PathBuf::from(or_default("AVATARS_DIR", "public/avatars")),
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}
