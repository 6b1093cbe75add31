use std::{future::Future, pin::Pin, sync::Arc};

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    web,
};
use futures::future::{Ready, ok};

use common::{
    env_config::Config,
    error::{AppError, Res},
    jwt::{self, AuthUser},
};
use db::{SharedStore, Store};

/// Auth guard. When a bearer token is present it is verified and resolved
/// to a user, and the outcome is stored in the request extensions as
/// `Res<AuthUser>`. Enforcement happens in the `AuthUser` extractor, so
/// public routes are unaffected by a bad token.
pub struct ExtractionMiddleware {}

impl ExtractionMiddleware {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for ExtractionMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for ExtractionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = ExtractionMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ExtractionMiddlewareService {
            service: Arc::new(service),
        })
    }
}

pub struct ExtractionMiddlewareService<S> {
    service: Arc<S>,
}

impl<S, B> Service<ServiceRequest> for ExtractionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // retrieve token from authorization header
        let token = jwt::bearer_token(req.headers());

        let config = req
            .app_data::<web::Data<Arc<Config>>>()
            .map(|config| config.get_ref().clone());
        let store = req
            .app_data::<web::Data<SharedStore>>()
            .map(|store| store.get_ref().clone());
        let srv = Arc::clone(&self.service);

        Box::pin(async move {
            if let Some(token) = token {
                let identity = match (config, store) {
                    (Some(config), Some(store)) => {
                        resolve_identity(&token, &config, store.as_ref()).await
                    }
                    _ => Err(AppError::Internal(
                        "Config or store missing from app data".to_string(),
                    )),
                };
                // insert identity to request object for future use
                req.extensions_mut().insert::<Res<AuthUser>>(identity);
            }
            srv.call(req).await.map(|res| res.map_into_boxed_body())
        })
    }
}

/// Verifies the token and confirms it is still the one stored on the user.
/// Logout clears the stored token, which revokes it here.
pub async fn resolve_identity(token: &str, config: &Config, store: &dyn Store) -> Res<AuthUser> {
    let claims = jwt::validate_jwt(token, &config.jwt_config.secret)?;

    let user = store
        .get_user_by_id(claims.id)
        .await?
        .ok_or_else(AppError::not_authorized)?;

    if user.token.as_deref() != Some(token) {
        log::debug!("Token for user {} is no longer current", user.id);
        return Err(AppError::not_authorized());
    }

    Ok(AuthUser {
        id: user.id,
        email: user.email,
        subscription: user.subscription,
    })
}
