use axum::extract::State;
use serde_json::{json, Value};

use crate::database::models::{Availability, AvailabilityPatch, AvailabilityWindow, NewAvailability};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, IdPath, JsonBody, ValidQuery};
use crate::state::AppState;

/// GET /api/availability - The caller's entries, optionally within `from`..`to`
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidQuery(window): ValidQuery<AvailabilityWindow>,
) -> ApiResult<Vec<Availability>> {
    let window = window.validate()?;
    let entries = state
        .store()
        .list_availability(auth.user_id, window.from, window.to)
        .await?;
    Ok(ApiResponse::success(entries))
}

/// POST /api/availability - Add an entry
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<NewAvailability>,
) -> ApiResult<Availability> {
    let input = input.validate()?;
    let entry = state.store().create_availability(auth.user_id, &input).await?;
    Ok(ApiResponse::created(entry).with_message("Availability added"))
}

/// PATCH /api/availability/:id - Partial update of the caller's entry
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
    JsonBody(patch): JsonBody<AvailabilityPatch>,
) -> ApiResult<Availability> {
    let patch = patch.validate()?;

    let current = state
        .store()
        .get_availability(auth.user_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Availability entry not found"))?;
    patch.check_against(&current)?;

    let updated = state.store().update_availability(auth.user_id, id, &patch).await?;
    Ok(ApiResponse::success(updated).with_message("Availability updated"))
}

/// DELETE /api/availability/:id
pub async fn delete(State(state): State<AppState>, auth: AuthUser, IdPath(id): IdPath) -> ApiResult<Value> {
    state.store().delete_availability(auth.user_id, id).await?;
    Ok(ApiResponse::success(json!({ "id": id })).with_message("Availability deleted"))
}
