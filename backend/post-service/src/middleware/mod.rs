/// HTTP middleware utilities for the post service
///
/// Bearer-token authentication only: tokens are issued by the external
/// identity provider, this service validates them and surfaces the caller
/// as a typed `UserId` extractor.
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{error::ErrorUnauthorized, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::AuthConfig;

/// Extracted user identifier stored in request extensions after auth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub Uuid);

/// Claims this service cares about; everything else in the token belongs
/// to the identity provider.
#[derive(Debug, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Token verifier built once at startup from config.
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn from_config(auth: &AuthConfig) -> Result<Self, String> {
        if let Some(pem) = auth.public_key.as_deref() {
            let decoding_key = DecodingKey::from_rsa_pem(pem.as_bytes())
                .map_err(|e| format!("invalid JWT_PUBLIC_KEY: {e}"))?;
            Ok(Self {
                decoding_key,
                validation: Validation::new(Algorithm::RS256),
            })
        } else if let Some(secret) = auth.secret.as_deref() {
            Ok(Self {
                decoding_key: DecodingKey::from_secret(secret.as_bytes()),
                validation: Validation::new(Algorithm::HS256),
            })
        } else {
            Err("no JWT validation key configured".to_string())
        }
    }

    pub fn validate(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

/// Actix middleware that validates a Bearer token on every request.
pub struct JwtAuthMiddleware {
    validator: Arc<JwtValidator>,
}

impl JwtAuthMiddleware {
    pub fn new(validator: Arc<JwtValidator>) -> Self {
        Self { validator }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
            validator: self.validator.clone(),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
    validator: Arc<JwtValidator>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let validator = self.validator.clone();

        Box::pin(async move {
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| ErrorUnauthorized("Missing Authorization header"))?;

            let token = auth_header
                .strip_prefix("Bearer ")
                .ok_or_else(|| ErrorUnauthorized("Invalid Authorization scheme"))?;

            let claims = validator
                .validate(token)
                .map_err(|_| ErrorUnauthorized("Invalid or expired token"))?;

            let user_id = Uuid::parse_str(&claims.sub)
                .map_err(|_| ErrorUnauthorized("Invalid user ID"))?;

            req.extensions_mut().insert(UserId(user_id));

            service.call(req).await
        })
    }
}

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<UserId>()
                .copied()
                .ok_or_else(|| ErrorUnauthorized("User ID missing")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        exp: usize,
    }

    fn hs256_validator(secret: &str) -> JwtValidator {
        JwtValidator::from_config(&AuthConfig {
            public_key: None,
            secret: Some(secret.to_string()),
        })
        .expect("validator should build")
    }

    fn sign(secret: &str, sub: &str, exp_offset_secs: i64) -> String {
        let exp = (chrono::Utc::now().timestamp() + exp_offset_secs) as usize;
        encode(
            &Header::default(),
            &TestClaims {
                sub: sub.to_string(),
                exp,
            },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("token should sign")
    }

    #[test]
    fn test_valid_token_yields_subject() {
        let validator = hs256_validator("test-secret");
        let user_id = Uuid::new_v4();
        let token = sign("test-secret", &user_id.to_string(), 3600);

        let claims = validator.validate(&token).expect("token should validate");
        assert_eq!(claims.sub, user_id.to_string());
    }

    #[test]
    fn test_expired_token_rejected() {
        let validator = hs256_validator("test-secret");
        let token = sign("test-secret", &Uuid::new_v4().to_string(), -3600);

        assert!(validator.validate(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let validator = hs256_validator("test-secret");
        let token = sign("other-secret", &Uuid::new_v4().to_string(), 3600);

        assert!(validator.validate(&token).is_err());
    }

    #[test]
    fn test_requires_some_key() {
        let result = JwtValidator::from_config(&AuthConfig {
            public_key: None,
            secret: None,
        });
        assert!(result.is_err());
    }
}
