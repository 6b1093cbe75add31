use chrono::NaiveDateTime;
use common::{error::AppError, misc::Subscription};
use serde::Serialize;
use uuid::Uuid;

/// Secrets (`password_hash`, `verification_token`, `token`) are never
/// serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub subscription: Subscription,
    pub avatar_url: String,
    #[serde(skip_serializing)]
    pub verification_token: Option<String>,
    pub verified: bool,
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub subscription: String,
    pub avatar_url: String,
    pub verification_token: Option<String>,
    pub verified: bool,
    pub token: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let subscription = row
            .subscription
            .parse()
            .map_err(|_| AppError::Internal(format!("Stored subscription is invalid: {}", row.subscription)))?;
        Ok(User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            subscription,
            avatar_url: row.avatar_url,
            verification_token: row.verification_token,
            verified: row.verified,
            token: row.token,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
