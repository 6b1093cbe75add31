use actix_web::{HttpResponse, http::StatusCode};
use thiserror::Error;

pub type Res<T> = std::result::Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum AppError {
    // === CONVERSION ERRORS ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JWT error: {0}")]
    JWT(#[from] jsonwebtoken::errors::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Password hash error: {0}")]
    PasswordHash(argon2::password_hash::Error),

    #[error("{0}")]
    Validation(#[from] validator::ValidationErrors),

    // === APPLICATION ERRORS ===
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(error: argon2::password_hash::Error) -> Self {
        AppError::PasswordHash(error)
    }
}

impl AppError {
    pub fn not_authorized() -> Self {
        AppError::Unauthorized("Not authorized".to_string())
    }

    /// Internal failures are logged with detail and surfaced with a generic
    /// message only.
    pub fn to_http_response(&self) -> HttpResponse {
        let message = match self {
            // === CONVERSION ERRORS ===
            AppError::Database(error) => {
                log::error!("Database error: {}", error);
                INTERNAL_MESSAGE.to_string()
            }
            AppError::JWT(error) => {
                log::error!("JWT error: {}", error);
                INTERNAL_MESSAGE.to_string()
            }
            AppError::Reqwest(error) => {
                log::error!("Reqwest error: {}", error);
                INTERNAL_MESSAGE.to_string()
            }
            AppError::Io(error) => {
                log::error!("IO error: {}", error);
                INTERNAL_MESSAGE.to_string()
            }
            AppError::PasswordHash(error) => {
                log::error!("Password hash error: {}", error);
                INTERNAL_MESSAGE.to_string()
            }
            AppError::Internal(error) => {
                log::error!("Internal error: {}", error);
                INTERNAL_MESSAGE.to_string()
            }

            // === APPLICATION ERRORS ===
            AppError::Validation(errors) => format!("Validation error: {}", errors),
            AppError::Unauthorized(message)
            | AppError::NotFound(message)
            | AppError::Conflict(message)
            | AppError::BadRequest(message) => message.clone(),
        };

        HttpResponse::build(self.status()).json(serde_json::json!({ "message": message }))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        self.to_http_response()
    }
}
