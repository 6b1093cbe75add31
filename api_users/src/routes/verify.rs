use std::sync::Arc;

use actix_web::{Responder, get, post, web};
use common::{
    error::Res,
    http::{MessageResponse, Success},
    validation::validated,
};
use db::{SharedStore, Store};

use crate::{dtos::user::ResendVerificationRequest, mail::Mailer, services};

/// Target of the link in the verification email. Each token works once.
#[get("/verify/{verification_token}")]
pub async fn get_verify(
    path: web::Path<String>,
    store: web::Data<SharedStore>,
) -> Res<impl Responder> {
    let store: &dyn Store = &***store;
    services::user::verify_email(store, &path.into_inner()).await?;
    Success::ok(MessageResponse::new("Verification successful"))
}

/// Mails the verification link again.
///
/// # Input
/// - `req`: JSON payload `{ email }`
///
/// # Output
/// - Success: 200 `{ message: "Verification email sent" }`
/// - Error: 400 for a bad body or an already verified account, 404 for an
///   unknown email
#[post("/verify")]
pub async fn post_verify(
    req: web::Json<ResendVerificationRequest>,
    store: web::Data<SharedStore>,
    mailer: web::Data<Arc<dyn Mailer>>,
) -> Res<impl Responder> {
    let store: &dyn Store = &***store;
    let req = validated(req.into_inner())?.normalized();
    services::user::resend_verification(store, mailer.get_ref().clone(), &req.email).await?;
    Success::ok(MessageResponse::new("Verification email sent"))
}
