use std::str::FromStr;

use async_trait::async_trait;
use common::{error::Res, misc::Subscription};
use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgSslMode},
};
use uuid::Uuid;

use crate::{
    ContactStore, UserStore, contact,
    dtos::{
        contact::{ContactCreateRequest, ContactFilter, ContactPatch},
        user::UserCreateRequest,
    },
    models::{contact::Contact, user::User},
    user,
};

/// PostgreSQL adapter for the store port.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url`, creating the database when it does not
    /// exist yet, and runs pending migrations.
    pub async fn connect(
        database_url: &str,
        require_ssl: bool,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let url = url::Url::parse(database_url)?;
        let db_name = url.path().trim_start_matches('/');
        let username = url.username();
        let password = url.password().unwrap_or("");
        let host = url.host_str().unwrap_or("localhost");
        let port = url.port().unwrap_or(5432);

        let admin_url = format!(
            "postgresql://{}:{}@{}:{}/postgres",
            username, password, host, port
        );

        let mut admin_options = PgConnectOptions::from_str(&admin_url)?;
        if require_ssl {
            admin_options = admin_options.ssl_mode(PgSslMode::Require);
        }

        let admin_pool = PgPool::connect_with(admin_options).await?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
                .bind(db_name)
                .fetch_one(&admin_pool)
                .await?;

        if !exists {
            log::info!("Creating database {}", db_name);
            sqlx::query(&format!("CREATE DATABASE \"{}\"", db_name.replace('"', "")))
                .execute(&admin_pool)
                .await?;
        }

        admin_pool.close().await;

        let mut options = PgConnectOptions::from_str(database_url)?;
        if require_ssl {
            options = options.ssl_mode(PgSslMode::Require);
        }
        let pool = PgPool::connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, data: UserCreateRequest) -> Res<User> {
        user::insert_user(&self.pool, data).await
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Res<Option<User>> {
        user::get_user_by_id(&self.pool, user_id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Res<Option<User>> {
        user::get_user_by_email(&self.pool, email).await
    }

    async fn update_user_token(&self, user_id: Uuid, token: Option<&str>) -> Res<()> {
        user::update_user_token(&self.pool, user_id, token).await
    }

    async fn update_user_subscription(
        &self,
        user_id: Uuid,
        subscription: Subscription,
    ) -> Res<Option<User>> {
        user::update_user_subscription(&self.pool, user_id, subscription).await
    }

    async fn update_user_avatar(&self, user_id: Uuid, avatar_url: &str) -> Res<Option<User>> {
        user::update_user_avatar(&self.pool, user_id, avatar_url).await
    }

    async fn verify_user(&self, verification_token: &str) -> Res<Option<User>> {
        user::verify_user(&self.pool, verification_token).await
    }
}

#[async_trait]
impl ContactStore for PgStore {
    async fn get_contacts(&self, filter: ContactFilter) -> Res<Vec<Contact>> {
        contact::get_contacts(&self.pool, filter).await
    }

    async fn get_contact_by_id(&self, contact_id: Uuid) -> Res<Option<Contact>> {
        contact::get_contact_by_id(&self.pool, contact_id).await
    }

    async fn insert_contact(&self, data: ContactCreateRequest) -> Res<Contact> {
        contact::insert_contact(&self.pool, data).await
    }

    async fn update_contact(&self, contact_id: Uuid, patch: ContactPatch) -> Res<Option<Contact>> {
        contact::update_contact(&self.pool, contact_id, patch).await
    }

    async fn update_contact_favorite(
        &self,
        contact_id: Uuid,
        favorite: Option<bool>,
    ) -> Res<Option<Contact>> {
        contact::update_contact_favorite(&self.pool, contact_id, favorite).await
    }

    async fn delete_contact(&self, contact_id: Uuid) -> Res<bool> {
        contact::delete_contact(&self.pool, contact_id).await
    }
}
