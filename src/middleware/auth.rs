use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::auth::{bearer_token, AuthError};
use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user context resolved from the bearer token.
///
/// Resolution validates the token, then upserts the caller's `users` row so
/// that every row the handler writes has a valid owner to point at.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: String,
    /// The `users` row as of this request.
    pub user: User,
}

impl AuthUser {
    /// Ownership check for publicly visible rows.
    pub fn ensure_owns(&self, owner_id: Uuid, resource: &str) -> Result<(), ApiError> {
        if self.user_id != owner_id {
            tracing::warn!("User {} attempted to modify a {} owned by {}", self.user_id, resource, owner_id);
            return Err(ApiError::forbidden(format!("You do not own this {}", resource)));
        }
        Ok(())
    }
}

/// Optional variant for public reads: no header means anonymous, a bad header is still 401.
#[derive(Clone, Debug)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|u| u.user_id)
    }
}

async fn resolve(parts: &Parts, state: &AppState) -> Result<AuthUser, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .map(|value| value.to_str())
        .transpose()
        .map_err(|_| AuthError::MalformedHeader)?;

    let token = bearer_token(header)?;
    let identity = state.keys().verify(token)?;
    let user = state.store().upsert_user(&identity).await?;

    tracing::debug!("Authenticated user {}", identity.user_id);
    Ok(AuthUser {
        user_id: identity.user_id,
        email: identity.email,
        role: identity.role,
        user,
    })
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve(parts, state).await
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(MaybeAuthUser(None));
        }
        resolve(parts, state).await.map(|user| MaybeAuthUser(Some(user)))
    }
}
