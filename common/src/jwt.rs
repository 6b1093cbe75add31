use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, http::header};
use chrono::{Duration, Utc};
use futures::future::{Ready, ready};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    env_config::JwtConfig,
    error::{AppError, Res},
    misc::Subscription,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtClaims {
    pub id: Uuid,
    pub email: String,
    pub subscription: Subscription,
    /// Unique per issued token, so two logins never share a token.
    pub jti: Uuid,
    pub iat: usize,
    pub exp: usize,
}

pub struct ClaimsSpec {
    pub id: Uuid,
    pub email: String,
    pub subscription: Subscription,
}

/// Identity resolved by the auth guard for the current request.
///
/// Handlers that require authentication take `AuthUser` as an argument;
/// handlers where identity is optional take `Option<AuthUser>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub subscription: Subscription,
}

/// Generates JWT token based on user object and JWT configuration options
pub fn generate_jwt(spec: ClaimsSpec, config: &JwtConfig) -> Res<String> {
    let now = Utc::now();
    let expiration = (now + Duration::hours(config.expiration_hours)).timestamp();

    let claims = JwtClaims {
        id: spec.id,
        email: spec.email,
        subscription: spec.subscription,
        jti: Uuid::new_v4(),
        iat: now.timestamp() as usize,
        exp: expiration as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(AppError::from)
}

/// Extracts claims object from JWT token.
///
/// Any failure (bad signature, expiry, garbage input) is reported as
/// `Unauthorized`; verification fails closed.
pub fn validate_jwt(token: &str, secret: &str) -> Res<JwtClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    jsonwebtoken::decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|error| {
        log::debug!("Rejected bearer token: {}", error);
        AppError::not_authorized()
    })
}

/// Reads the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &header::HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match req.extensions().get::<Res<AuthUser>>() {
            Some(Ok(user)) => Ok(user.clone()),
            Some(Err(AppError::Unauthorized(message))) => {
                Err(AppError::Unauthorized(message.clone()))
            }
            Some(Err(other)) => Err(AppError::Internal(other.to_string())),
            None => Err(AppError::not_authorized()),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
        }
    }

    fn spec() -> ClaimsSpec {
        ClaimsSpec {
            id: Uuid::new_v4(),
            email: "jane@x.com".to_string(),
            subscription: Subscription::Pro,
        }
    }

    #[test]
    fn issued_token_verifies() {
        let spec = spec();
        let id = spec.id;
        let token = generate_jwt(spec, &config()).unwrap();
        let claims = validate_jwt(&token, "test-secret").unwrap();

        assert_eq!(claims.id, id);
        assert_eq!(claims.email, "jane@x.com");
        assert_eq!(claims.subscription, Subscription::Pro);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn tokens_are_unique_per_issue() {
        let a = generate_jwt(spec(), &config()).unwrap();
        let b = generate_jwt(spec(), &config()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_secret_is_unauthorized() {
        let token = generate_jwt(spec(), &config()).unwrap();
        let err = validate_jwt(&token, "other-secret").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let expired = JwtConfig {
            expiration_hours: -2,
            ..config()
        };
        let token = generate_jwt(spec(), &expired).unwrap();
        let err = validate_jwt(&token, "test-secret").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn garbage_is_unauthorized() {
        let err = validate_jwt("not.a.token", "test-secret").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn bearer_token_requires_scheme() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc.def"))
            .to_http_request();
        assert_eq!(bearer_token(req.headers()), Some("abc.def".to_string()));

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic abc"))
            .to_http_request();
        assert_eq!(bearer_token(req.headers()), None);

        let req = TestRequest::default().to_http_request();
        assert_eq!(bearer_token(req.headers()), None);
    }
}
