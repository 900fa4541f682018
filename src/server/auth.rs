// src/server/auth.rs

//! Bearer token verification.
//!
//! Tokens are HS256 JWTs carrying the owner id in a `userId` claim. Issuing
//! them belongs to the login service; `issue_token` exists for tooling and tests.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use log::debug;
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};

use crate::config::server::TOKEN_TTL_MINUTES;
use crate::game::types::OwnerId;
use crate::server::error::ApiError;
use crate::server::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: OwnerId,
    pub exp: usize,
}

impl Claims {
    pub fn new(user_id: OwnerId) -> Self {
        let expiration = Utc::now() + Duration::minutes(TOKEN_TTL_MINUTES);
        Claims {
            user_id,
            exp: expiration.timestamp().max(0) as usize,
        }
    }
}

/// Signing and verification keys derived from one shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue_token(&self, user_id: OwnerId) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::default(), &Claims::new(user_id), &self.encoding)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding, &Validation::default()).map(|data| data.claims)
    }
}

/// Extracts the authenticated owner from `Authorization: Bearer <token>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub OwnerId);

impl AuthUser {
    pub fn id(&self) -> OwnerId {
        self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(token) = bearer_token(req) else {
            return ready(Err(ApiError::MissingToken));
        };
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            return ready(Err(ApiError::Internal("application state not configured".into())));
        };
        ready(match state.keys.verify(token) {
            Ok(claims) => Ok(AuthUser(claims.user_id)),
            Err(e) => {
                debug!("[Auth] Rejected token: {}", e);
                Err(ApiError::InvalidToken)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn issued_tokens_verify() {
        let keys = JwtKeys::from_secret("secret");
        let user = Uuid::new_v4();
        let token = keys.issue_token(user).unwrap();
        assert_eq!(keys.verify(&token).unwrap().user_id, user);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = JwtKeys::from_secret("one").issue_token(Uuid::new_v4()).unwrap();
        assert!(JwtKeys::from_secret("two").verify(&token).is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let keys = JwtKeys::from_secret("secret");
        let claims = Claims {
            user_id: Uuid::new_v4(),
            exp: (Utc::now() - Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn claims_use_user_id_key() {
        let claims = Claims { user_id: Uuid::nil(), exp: 1 };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn bearer_header_parsing() {
        let req = actix_web::test::TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc.def"))
            .to_http_request();
        assert_eq!(bearer_token(&req), Some("abc.def"));

        let req = actix_web::test::TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic abc"))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);

        let req = actix_web::test::TestRequest::default().to_http_request();
        assert_eq!(bearer_token(&req), None);
    }
}
