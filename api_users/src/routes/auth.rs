use std::sync::Arc;

use actix_web::{Responder, get, post, web};
use common::{
    env_config::Config,
    error::Res,
    http::Success,
    jwt::AuthUser,
    validation::validated,
};
use db::{SharedStore, Store};

use crate::{
    dtos::auth::{LoginRequest, LoginResponse, SignupRequest, SignupResponse, UserSummary},
    mail::Mailer,
    services,
};

/// Registers a new account on the starter plan.
///
/// # Input
/// - `req`: JSON payload with `email` and `password` (at least 8 characters)
///
/// # Output
/// - Success: 201 with `{ user: { email, subscription } }`; a verification
///   link is mailed in the background
/// - Error: 400 for an invalid body, 409 "Email in use" for a taken email
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/users/signup', {
///   method: 'POST',
///   headers: { 'Content-Type': 'application/json' },
///   body: JSON.stringify({ email: 'jane@example.com', password: 'secret123' })
/// });
/// ```
#[post("/signup")]
pub async fn post_signup(
    req: web::Json<SignupRequest>,
    store: web::Data<SharedStore>,
    mailer: web::Data<Arc<dyn Mailer>>,
) -> Res<impl Responder> {
    let store: &dyn Store = &***store;
    let req = validated(req.into_inner())?.normalized();
    let user = services::auth::signup(store, mailer.get_ref().clone(), req).await?;
    Success::created(SignupResponse {
        user: UserSummary::from(&user),
    })
}

/// Exchanges credentials for a bearer token.
///
/// # Input
/// - `login_data`: JSON payload with `email` and `password`
///
/// # Output
/// - Success: 200 with `{ token, user: { email, subscription } }`
/// - Error: 400 for an invalid body, 401 "Email or password is wrong"
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/users/login', {
///   method: 'POST',
///   headers: { 'Content-Type': 'application/json' },
///   body: JSON.stringify({ email: 'jane@example.com', password: 'secret123' })
/// });
/// const { token } = await response.json();
/// localStorage.setItem('authToken', token);
/// ```
#[post("/login")]
pub async fn post_login(
    login_data: web::Json<LoginRequest>,
    config: web::Data<Arc<Config>>,
    store: web::Data<SharedStore>,
) -> Res<impl Responder> {
    let store: &dyn Store = &***store;
    let login_data = validated(login_data.into_inner())?.normalized();
    let (token, user) = services::auth::login(store, &config.jwt_config, &login_data).await?;
    Success::ok(LoginResponse {
        token,
        user: UserSummary::from(&user),
    })
}

/// Revokes the caller's current token. Responds 204 with no body.
#[get("/logout")]
pub async fn get_logout(user: AuthUser, store: web::Data<SharedStore>) -> Res<impl Responder> {
    let store: &dyn Store = &***store;
    services::auth::logout(store, &user).await?;
    Success::no_content()
}

#[get("/current")]
pub async fn get_current(user: AuthUser) -> Res<impl Responder> {
    Success::ok(UserSummary {
        email: user.email,
        subscription: user.subscription,
    })
}
