use actix_web::{Responder, delete, get, patch, post, put, web};
use common::{
    error::Res,
    http::{MessageResponse, Success},
    jwt::AuthUser,
    validation::validated,
};
use db::{SharedStore, Store};

use crate::{
    dtos::contact::{CreateContactRequest, FavoriteRequest, ListQuery, UpdateContactRequest},
    services,
};

/// Lists contacts, oldest first.
///
/// # Input
/// - `query`: optional `favorite=true|false`, `page` (from 1) and `limit`
///   (default 20, at most 100)
///
/// # Output
/// - Success: 200 with an array of contacts
/// - Error: 401 without a valid bearer token
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/contacts?favorite=true&page=1&limit=20', {
///   headers: { 'Authorization': `Bearer ${localStorage.getItem('authToken')}` }
/// });
/// const contacts = await response.json();
/// ```
#[get("")]
pub async fn get_contacts(
    user: AuthUser,
    query: web::Query<ListQuery>,
    store: web::Data<SharedStore>,
) -> Res<impl Responder> {
    let store: &dyn Store = &***store;
    log::debug!("Listing contacts for {}", user.id);
    let contacts = services::contact::list_contacts(store, query.into_inner().into()).await?;
    Success::ok(contacts)
}

#[get("/{id}")]
pub async fn get_contact(
    path: web::Path<String>,
    store: web::Data<SharedStore>,
) -> Res<impl Responder> {
    let store: &dyn Store = &***store;
    let contact = services::contact::get_contact(store, &path.into_inner()).await?;
    Success::ok(contact)
}

/// Creates a contact. When the request carries a valid bearer token the
/// caller is recorded as its owner.
///
/// # Input
/// - `req`: JSON payload `{ name, email, phone, favorite? }`
///
/// # Output
/// - Success: 201 with the created contact
/// - Error: 400 for an invalid body
#[post("")]
pub async fn post_contact(
    user: Option<AuthUser>,
    req: web::Json<CreateContactRequest>,
    store: web::Data<SharedStore>,
) -> Res<impl Responder> {
    let store: &dyn Store = &***store;
    let req = validated(req.into_inner())?;
    let contact = services::contact::create_contact(store, user.as_ref(), req).await?;
    Success::created(contact)
}

/// Overwrites the given fields only. An empty body is a 400.
#[put("/{id}")]
pub async fn put_contact(
    path: web::Path<String>,
    req: web::Json<UpdateContactRequest>,
    store: web::Data<SharedStore>,
) -> Res<impl Responder> {
    let store: &dyn Store = &***store;
    let req = validated(req.into_inner())?;
    let contact = services::contact::update_contact(store, &path.into_inner(), req.into()).await?;
    Success::ok(contact)
}

#[delete("/{id}")]
pub async fn delete_contact(
    path: web::Path<String>,
    store: web::Data<SharedStore>,
) -> Res<impl Responder> {
    let store: &dyn Store = &***store;
    services::contact::delete_contact(store, &path.into_inner()).await?;
    Success::ok(MessageResponse::new("contact deleted"))
}

/// `{ favorite: bool }` sets the flag, `{}` flips it.
#[patch("/{id}/favorite")]
pub async fn patch_favorite(
    path: web::Path<String>,
    req: web::Json<FavoriteRequest>,
    store: web::Data<SharedStore>,
) -> Res<impl Responder> {
    let store: &dyn Store = &***store;
    let contact =
        services::contact::update_favorite(store, &path.into_inner(), req.into_inner().favorite)
            .await?;
    Success::ok(contact)
}
