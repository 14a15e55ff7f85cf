use axum::extract::State;

use crate::database::models::PublicProfile;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, IdPath};
use crate::state::AppState;

/// GET /api/profiles/:id - Public profile of any user, with their roles
pub async fn show(State(state): State<AppState>, IdPath(user_id): IdPath) -> ApiResult<PublicProfile> {
    let store = state.store();

    let profile = store
        .get_profile(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    let roles = store.list_roles(user_id).await?.into_iter().map(|r| r.role).collect();

    Ok(ApiResponse::success(PublicProfile { profile, roles }))
}
