use common::{
    error::{AppError, Res},
    jwt::AuthUser,
    misc,
};
use db::{
    Store,
    dtos::contact::{ContactCreateRequest, ContactFilter, ContactPatch},
    models::contact::Contact,
};

use crate::dtos::contact::CreateContactRequest;

fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

pub async fn list_contacts(store: &dyn Store, filter: ContactFilter) -> Res<Vec<Contact>> {
    store.get_contacts(filter).await
}

pub async fn get_contact(store: &dyn Store, id: &str) -> Res<Contact> {
    let contact_id = misc::parse_id(id)?;
    store
        .get_contact_by_id(contact_id)
        .await?
        .ok_or_else(not_found)
}

pub async fn create_contact(
    store: &dyn Store,
    owner: Option<&AuthUser>,
    req: CreateContactRequest,
) -> Res<Contact> {
    store
        .insert_contact(ContactCreateRequest {
            name: req.name,
            email: req.email,
            phone: req.phone,
            favorite: req.favorite,
            owner: owner.map(|user| user.id),
        })
        .await
}

pub async fn update_contact(store: &dyn Store, id: &str, patch: ContactPatch) -> Res<Contact> {
    if patch.is_empty() {
        return Err(AppError::BadRequest("missing fields".to_string()));
    }
    let contact_id = misc::parse_id(id)?;
    store
        .update_contact(contact_id, patch)
        .await?
        .ok_or_else(not_found)
}

pub async fn update_favorite(store: &dyn Store, id: &str, favorite: Option<bool>) -> Res<Contact> {
    let contact_id = misc::parse_id(id)?;
    store
        .update_contact_favorite(contact_id, favorite)
        .await?
        .ok_or_else(not_found)
}

pub async fn delete_contact(store: &dyn Store, id: &str) -> Res<()> {
    let contact_id = misc::parse_id(id)?;
    if store.delete_contact(contact_id).await? {
        Ok(())
    } else {
        Err(not_found())
    }
}
