use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Bearer token claims. Shaped after the hosted auth provider's access tokens:
/// `sub` carries the user id and `aud` the audience the token was issued for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Fails with `TokenGeneration` when the expiry falls outside chrono's range.
    pub fn new(user_id: Uuid, email: Option<String>, audience: &str, expiry_hours: u64) -> Result<Self, AuthError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AuthError::TokenGeneration(format!("expiry of {} hours is out of range", expiry_hours)))?;

        Ok(Self {
            sub: user_id.to_string(),
            email,
            role: "authenticated".to_string(),
            aud: audience.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Authorization header must use Bearer token format")]
    MalformedHeader,

    #[error("Empty bearer token")]
    EmptyToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token subject is not a valid user id")]
    InvalidSubject,

    #[error("Token secret not configured")]
    InvalidSecret,

    #[error("Token generation error: {0}")]
    TokenGeneration(String),
}

/// The identity a valid token resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: String,
}

/// Signing material and validation settings, built once from configuration.
#[derive(Clone)]
pub struct AuthKeys {
    secret: String,
    audience: String,
    expiry_hours: u64,
}

impl AuthKeys {
    pub fn new(secret: impl Into<String>, audience: impl Into<String>, expiry_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            audience: audience.into(),
            expiry_hours,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(
            security.jwt_secret.clone(),
            security.jwt_audience.clone(),
            security.jwt_expiry_hours,
        )
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Mint a token for `user_id` valid for the configured number of hours.
    pub fn issue(&self, user_id: Uuid, email: Option<String>) -> Result<String, AuthError> {
        self.issue_with_expiry(user_id, email, self.expiry_hours)
    }

    pub fn issue_with_expiry(
        &self,
        user_id: Uuid,
        email: Option<String>,
        expiry_hours: u64,
    ) -> Result<String, AuthError> {
        let claims = Claims::new(user_id, email, &self.audience, expiry_hours)?;
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), claims, &encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Validate signature, expiry and audience, then resolve the subject.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let mut validation = Validation::default();
        validation.set_audience(&[self.audience.as_str()]);

        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let claims = token_data.claims;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidSubject)?;

        Ok(Identity {
            user_id,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// Pull the bearer token out of an `Authorization` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header.ok_or(AuthError::MissingHeader)?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .ok_or(AuthError::MalformedHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::EmptyToken);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> AuthKeys {
        AuthKeys::new("test-secret", "authenticated", 1)
    }

    #[test]
    fn issued_token_verifies() {
        let user_id = Uuid::new_v4();
        let token = keys().issue(user_id, Some("a@b.co".to_string())).unwrap();
        let identity = keys().verify(&token).unwrap();
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.email.as_deref(), Some("a@b.co"));
        assert_eq!(identity.role, "authenticated");
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = keys().issue(Uuid::new_v4(), None).unwrap();
        let other = AuthKeys::new("another-secret", "authenticated", 1);
        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn wrong_audience_rejected() {
        let token = AuthKeys::new("test-secret", "anon", 1)
            .issue(Uuid::new_v4(), None)
            .unwrap();
        assert!(matches!(keys().verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn expired_token_rejected() {
        let mut claims = Claims::new(Uuid::new_v4(), None, "authenticated", 1).unwrap();
        claims.exp = Utc::now().timestamp() - 3600;
        let token = keys().sign(&claims).unwrap();
        assert!(matches!(keys().verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn non_uuid_subject_rejected() {
        let mut claims = Claims::new(Uuid::new_v4(), None, "authenticated", 1).unwrap();
        claims.sub = "service-account".to_string();
        let token = keys().sign(&claims).unwrap();
        assert!(matches!(keys().verify(&token), Err(AuthError::InvalidSubject)));
    }

    #[test]
    fn oversized_expiry_is_an_error() {
        let result = keys().issue_with_expiry(Uuid::new_v4(), None, u64::MAX);
        assert!(matches!(result, Err(AuthError::TokenGeneration(_))));

        let result = keys().issue_with_expiry(Uuid::new_v4(), None, i64::MAX as u64);
        assert!(matches!(result, Err(AuthError::TokenGeneration(_))));

        assert!(keys().issue_with_expiry(Uuid::new_v4(), None, 24 * 365).is_ok());
    }

    #[test]
    fn empty_secret_refuses_to_sign() {
        let keys = AuthKeys::new("", "authenticated", 1);
        assert!(matches!(keys.issue(Uuid::new_v4(), None), Err(AuthError::InvalidSecret)));
    }

    #[test]
    fn parses_bearer_header() {
        assert_eq!(bearer_token(Some("Bearer abc.def")).unwrap(), "abc.def");
        assert!(matches!(bearer_token(None), Err(AuthError::MissingHeader)));
        assert!(matches!(bearer_token(Some("Basic xyz")), Err(AuthError::MalformedHeader)));
        assert!(matches!(bearer_token(Some("Bearer   ")), Err(AuthError::EmptyToken)));
    }
}
