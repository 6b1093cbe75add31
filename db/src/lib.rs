use std::sync::Arc;

use async_trait::async_trait;
use common::{error::Res, misc::Subscription};
use uuid::Uuid;

use crate::{
    dtos::{
        contact::{ContactCreateRequest, ContactFilter, ContactPatch},
        user::UserCreateRequest,
    },
    memory::MemoryStore,
    models::{contact::Contact, user::User},
    pg::PgStore,
};

pub mod contact;
pub mod memory;
pub mod pg;
pub mod user;

pub mod models {
    pub mod contact;
    pub mod user;
}

pub mod dtos {
    pub mod contact;
    pub mod user;
}

/// `DATABASE_URL` value selecting the in-process store.
pub const MEMORY_URL: &str = "memory://";

/// User persistence. Every method is a single-document operation.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn insert_user(&self, data: UserCreateRequest) -> Res<User>;

    async fn get_user_by_id(&self, user_id: Uuid) -> Res<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> Res<Option<User>>;

    /// Stores (or clears) the last issued session token.
    async fn update_user_token(&self, user_id: Uuid, token: Option<&str>) -> Res<()>;

    async fn update_user_subscription(
        &self,
        user_id: Uuid,
        subscription: Subscription,
    ) -> Res<Option<User>>;

    async fn update_user_avatar(&self, user_id: Uuid, avatar_url: &str) -> Res<Option<User>>;

    /// Clears the verification token and marks its owner verified. `None`
    /// when no user holds the token.
    async fn verify_user(&self, verification_token: &str) -> Res<Option<User>>;
}

/// Contact persistence.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn get_contacts(&self, filter: ContactFilter) -> Res<Vec<Contact>>;

    async fn get_contact_by_id(&self, contact_id: Uuid) -> Res<Option<Contact>>;

    async fn insert_contact(&self, data: ContactCreateRequest) -> Res<Contact>;

    async fn update_contact(&self, contact_id: Uuid, patch: ContactPatch) -> Res<Option<Contact>>;

    /// Sets `favorite` when a value is given, flips it otherwise.
    async fn update_contact_favorite(
        &self,
        contact_id: Uuid,
        favorite: Option<bool>,
    ) -> Res<Option<Contact>>;

    /// `false` when there was nothing to delete.
    async fn delete_contact(&self, contact_id: Uuid) -> Res<bool>;
}

pub trait Store: UserStore + ContactStore {}

impl<T: UserStore + ContactStore> Store for T {}

pub type SharedStore = Arc<dyn Store>;

pub async fn setup(
    database_url: &str,
    require_ssl: bool,
) -> Result<SharedStore, Box<dyn std::error::Error>> {
    if database_url.starts_with(MEMORY_URL) {
        log::warn!("Using the in-memory store; data is lost on restart");
        return Ok(Arc::new(MemoryStore::default()));
    }

    let store = PgStore::connect(database_url, require_ssl).await?;
    Ok(Arc::new(store))
}
