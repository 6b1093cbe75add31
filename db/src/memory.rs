use async_trait::async_trait;
use chrono::Utc;
use common::{
    error::{AppError, Res},
    misc::Subscription,
};
use dashmap::{DashMap, mapref::entry::Entry};
use uuid::Uuid;

use crate::{
    ContactStore, UserStore,
    dtos::{
        contact::{ContactCreateRequest, ContactFilter, ContactPatch},
        user::UserCreateRequest,
    },
    models::{contact::Contact, user::User},
};

/// In-process adapter for the store port, used by tests and by
/// `DATABASE_URL=memory://`.
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, User>,
    /// email -> user id; its entry lock makes the uniqueness check atomic.
    emails: DashMap<String, Uuid>,
    contacts: DashMap<Uuid, Contact>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn update_user<F>(&self, user_id: Uuid, apply: F) -> Option<User>
    where
        F: FnOnce(&mut User),
    {
        self.users.get_mut(&user_id).map(|mut user| {
            apply(&mut user);
            user.updated_at = Utc::now().naive_utc();
            user.clone()
        })
    }

    fn update_contact_with<F>(&self, contact_id: Uuid, apply: F) -> Option<Contact>
    where
        F: FnOnce(&mut Contact),
    {
        self.contacts.get_mut(&contact_id).map(|mut contact| {
            apply(&mut contact);
            contact.updated_at = Utc::now().naive_utc();
            contact.clone()
        })
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, data: UserCreateRequest) -> Res<User> {
        let id = Uuid::new_v4();
        match self.emails.entry(data.email.clone()) {
            Entry::Occupied(_) => return Err(AppError::Conflict("Email in use".to_string())),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let now = Utc::now().naive_utc();
        let user = User {
            id,
            email: data.email,
            password_hash: data.password_hash,
            subscription: data.subscription,
            avatar_url: data.avatar_url,
            verification_token: data.verification_token,
            verified: false,
            token: None,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Res<Option<User>> {
        Ok(self.users.get(&user_id).map(|user| user.clone()))
    }

    async fn get_user_by_email(&self, email: &str) -> Res<Option<User>> {
        let user_id = match self.emails.get(email) {
            Some(id) => *id,
            None => return Ok(None),
        };
        self.get_user_by_id(user_id).await
    }

    async fn update_user_token(&self, user_id: Uuid, token: Option<&str>) -> Res<()> {
        self.update_user(user_id, |user| user.token = token.map(str::to_string));
        Ok(())
    }

    async fn update_user_subscription(
        &self,
        user_id: Uuid,
        subscription: Subscription,
    ) -> Res<Option<User>> {
        Ok(self.update_user(user_id, |user| user.subscription = subscription))
    }

    async fn update_user_avatar(&self, user_id: Uuid, avatar_url: &str) -> Res<Option<User>> {
        Ok(self.update_user(user_id, |user| user.avatar_url = avatar_url.to_string()))
    }

    async fn verify_user(&self, verification_token: &str) -> Res<Option<User>> {
        let user_id = self
            .users
            .iter()
            .find(|user| user.verification_token.as_deref() == Some(verification_token))
            .map(|user| user.id);
        let Some(user_id) = user_id else {
            return Ok(None);
        };

        let Some(mut user) = self.users.get_mut(&user_id) else {
            return Ok(None);
        };
        // another request may have consumed the token in between
        if user.verification_token.as_deref() != Some(verification_token) {
            return Ok(None);
        }
        user.verification_token = None;
        user.verified = true;
        user.updated_at = Utc::now().naive_utc();
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn get_contacts(&self, filter: ContactFilter) -> Res<Vec<Contact>> {
        let mut contacts: Vec<Contact> = self
            .contacts
            .iter()
            .filter(|contact| filter.favorite.is_none_or(|favorite| contact.favorite == favorite))
            .map(|contact| contact.clone())
            .collect();
        contacts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let offset = usize::try_from(filter.offset).unwrap_or(0);
        let limit = usize::try_from(filter.limit).unwrap_or(0);
        Ok(contacts.into_iter().skip(offset).take(limit).collect())
    }

    async fn get_contact_by_id(&self, contact_id: Uuid) -> Res<Option<Contact>> {
        Ok(self.contacts.get(&contact_id).map(|contact| contact.clone()))
    }

    async fn insert_contact(&self, data: ContactCreateRequest) -> Res<Contact> {
        let now = Utc::now().naive_utc();
        let contact = Contact {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            phone: data.phone,
            favorite: data.favorite,
            owner: data.owner,
            created_at: now,
            updated_at: now,
        };
        self.contacts.insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn update_contact(&self, contact_id: Uuid, patch: ContactPatch) -> Res<Option<Contact>> {
        Ok(self.update_contact_with(contact_id, |contact| {
            if let Some(name) = patch.name {
                contact.name = name;
            }
            if let Some(email) = patch.email {
                contact.email = email;
            }
            if let Some(phone) = patch.phone {
                contact.phone = phone;
            }
        }))
    }

    async fn update_contact_favorite(
        &self,
        contact_id: Uuid,
        favorite: Option<bool>,
    ) -> Res<Option<Contact>> {
        Ok(self.update_contact_with(contact_id, |contact| {
            contact.favorite = favorite.unwrap_or(!contact.favorite);
        }))
    }

    async fn delete_contact(&self, contact_id: Uuid) -> Res<bool> {
        Ok(self.contacts.remove(&contact_id).is_some())
    }
}
