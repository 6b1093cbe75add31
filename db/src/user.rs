use common::{
    error::{AppError, Res},
    misc::Subscription,
};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::user::UserCreateRequest,
    models::user::{User, UserRow},
};

fn into_user(row: Option<UserRow>) -> Res<Option<User>> {
    row.map(User::try_from).transpose()
}

pub async fn get_user_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await?;
    into_user(row)
}

pub async fn get_user_by_email<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    email: &str,
) -> Res<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(executor)
        .await?;
    into_user(row)
}

/// Relies on the unique index on `email`: a concurrent signup that lost the
/// race surfaces as `Conflict` instead of a duplicate row.
pub async fn insert_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: UserCreateRequest,
) -> Res<User> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (email, password_hash, subscription, avatar_url, verification_token)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(data.email)
    .bind(data.password_hash)
    .bind(data.subscription.as_str())
    .bind(data.avatar_url)
    .bind(data.verification_token)
    .fetch_one(executor)
    .await
    .map_err(|error| match error {
        sqlx::Error::Database(ref db_error) if db_error.is_unique_violation() => {
            AppError::Conflict("Email in use".to_string())
        }
        other => AppError::from(other),
    })?;
    User::try_from(row)
}

pub async fn update_user_token<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    token: Option<&str>,
) -> Res<()> {
    sqlx::query("UPDATE users SET token = $2, updated_at = NOW() WHERE id = $1")
        .bind(user_id)
        .bind(token)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn update_user_subscription<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    subscription: Subscription,
) -> Res<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(
        "UPDATE users SET subscription = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(user_id)
    .bind(subscription.as_str())
    .fetch_optional(executor)
    .await?;
    into_user(row)
}

pub async fn update_user_avatar<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    avatar_url: &str,
) -> Res<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(
        "UPDATE users SET avatar_url = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(user_id)
    .bind(avatar_url)
    .fetch_optional(executor)
    .await?;
    into_user(row)
}

/// Consumes a verification token in one statement.
pub async fn verify_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    verification_token: &str,
) -> Res<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET verified = TRUE, verification_token = NULL, updated_at = NOW()
        WHERE verification_token = $1
        RETURNING *
        "#,
    )
    .bind(verification_token)
    .fetch_optional(executor)
    .await?;
    into_user(row)
}
