use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use common::{
    env_config::JwtConfig,
    error::{AppError, Res},
    jwt::{self, AuthUser, ClaimsSpec},
    misc::{self, Subscription},
};
use db::{Store, dtos::user::UserCreateRequest, models::user::User};

use crate::{
    dtos::auth::{LoginRequest, SignupRequest},
    mail::{self, Mailer},
};

const WRONG_CREDENTIALS: &str = "Email or password is wrong";

pub fn hash_password(password: &str) -> Res<String> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> Res<bool> {
    let parsed_hash = PasswordHash::new(password_hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Creates a starter account and sends the verification link in the
/// background.
///
/// The email check and the insert are separate store calls; the store's
/// unique constraint turns a lost race into the same `Conflict`.
pub async fn signup(store: &dyn Store, mailer: Arc<dyn Mailer>, req: SignupRequest) -> Res<User> {
    if store.get_user_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("Email in use".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let verification_token = misc::generate_verification_token();

    let user = store
        .insert_user(UserCreateRequest {
            avatar_url: misc::gravatar_url(&req.email),
            email: req.email,
            password_hash,
            subscription: Subscription::Starter,
            verification_token: Some(verification_token.clone()),
        })
        .await?;

    mail::spawn_verification_email(mailer, user.email.clone(), verification_token);
    Ok(user)
}

/// Authenticates existing user.
/// Unknown email and wrong password produce the same 401.
pub async fn authenticate_user(store: &dyn Store, login_data: &LoginRequest) -> Res<User> {
    let user = store
        .get_user_by_email(&login_data.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized(WRONG_CREDENTIALS.to_string()))?;

    if verify_password(&login_data.password, &user.password_hash)? {
        Ok(user)
    } else {
        Err(AppError::Unauthorized(WRONG_CREDENTIALS.to_string()))
    }
}

/// Issues a session token and records it as the user's current one, which
/// supersedes any earlier token.
pub async fn login(
    store: &dyn Store,
    jwt_config: &JwtConfig,
    login_data: &LoginRequest,
) -> Res<(String, User)> {
    let user = authenticate_user(store, login_data).await?;
    let token = jwt::generate_jwt(
        ClaimsSpec {
            id: user.id,
            email: user.email.clone(),
            subscription: user.subscription,
        },
        jwt_config,
    )?;
    store.update_user_token(user.id, Some(&token)).await?;
    Ok((token, user))
}

pub async fn logout(store: &dyn Store, user: &AuthUser) -> Res<()> {
    store.update_user_token(user.id, None).await
}
