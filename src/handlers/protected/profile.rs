use axum::extract::State;
use serde_json::{json, Value};

use crate::database::models::profile::MAX_ROLES;
use crate::database::models::{Profile, ProfileInput, RoleInput, RolesInput, UserRole};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody, TextPath};
use crate::state::AppState;

/// GET /api/profile - The caller's own profile
pub async fn show(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Profile> {
    let profile = state
        .store()
        .get_profile(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    Ok(ApiResponse::success(profile))
}

/// PUT /api/profile - Create or replace the caller's profile
pub async fn upsert(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<ProfileInput>,
) -> ApiResult<Profile> {
    let input = input.validate()?;
    let profile = state.store().upsert_profile(auth.user_id, &input).await?;

    tracing::info!("Profile saved for {}", auth.user_id);
    Ok(ApiResponse::success(profile).with_message("Profile saved"))
}

/// GET /api/profile/roles - The caller's crew roles
pub async fn roles(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Vec<UserRole>> {
    let roles = state.store().list_roles(auth.user_id).await?;
    Ok(ApiResponse::success(roles))
}

/// PUT /api/profile/roles - Replace the caller's role set
pub async fn replace_roles(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<RolesInput>,
) -> ApiResult<Vec<UserRole>> {
    let roles = input.validate()?;
    let saved = state.store().replace_roles(auth.user_id, &roles).await?;

    Ok(ApiResponse::success(saved).with_message("Roles updated"))
}

/// POST /api/profile/roles - Add a single role
pub async fn add_role(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<RoleInput>,
) -> ApiResult<UserRole> {
    let role = input.validate()?;

    let existing = state.store().list_roles(auth.user_id).await?;
    if existing.len() >= MAX_ROLES {
        return Err(ApiError::invalid_field(
            "roles",
            format!("at most {} entries allowed", MAX_ROLES),
        ));
    }

    let saved = state
        .store()
        .add_role(auth.user_id, &role)
        .await
        .map_err(|e| e.conflict_as("Role already added"))?;

    Ok(ApiResponse::created(saved))
}

/// DELETE /api/profile/roles/:role - Remove a single role
pub async fn remove_role(
    State(state): State<AppState>,
    auth: AuthUser,
    TextPath(role): TextPath,
) -> ApiResult<Value> {
    state.store().remove_role(auth.user_id, role.trim()).await?;
    Ok(ApiResponse::success(json!({ "role": role })).with_message("Role removed"))
}
