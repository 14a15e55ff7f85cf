use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{Gig, GigFilter, GigPatch, GigStatus, ListParams, NewGig, Paged};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, IdPath, JsonBody, MaybeAuthUser, ValidQuery};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct GigQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub search: Option<String>,
    pub status: Option<GigStatus>,
    pub role: Option<String>,
    pub owner_id: Option<Uuid>,
}

/// GET /api/gigs - Browse gigs, newest first
pub async fn list(
    State(state): State<AppState>,
    _viewer: MaybeAuthUser,
    ValidQuery(query): ValidQuery<GigQuery>,
) -> ApiResult<Paged<Gig>> {
    let params = ListParams {
        limit: query.limit,
        offset: query.offset,
        search: query.search,
    };
    let page = params.page(state.pagination())?;

    let filter = GigFilter {
        search: params.search(),
        status: query.status,
        role: query.role.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()),
        owner_id: query.owner_id,
    };

    let (gigs, total) = state.store().list_gigs(&filter, page).await?;
    Ok(ApiResponse::success(Paged::new(gigs, total, page)))
}

/// POST /api/gigs - Post a new gig owned by the caller
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<NewGig>,
) -> ApiResult<Gig> {
    let input = input.validate()?;
    let gig = state.store().create_gig(auth.user_id, &input).await?;

    tracing::info!("Gig {} created by {}", gig.id, auth.user_id);
    Ok(ApiResponse::created(gig).with_message("Gig created"))
}

/// GET /api/gigs/:id - Single gig
pub async fn show(State(state): State<AppState>, _viewer: MaybeAuthUser, IdPath(id): IdPath) -> ApiResult<Gig> {
    let gig = find(&state, id).await?;
    Ok(ApiResponse::success(gig))
}

/// PATCH /api/gigs/:id - Partial update, owner only
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
    JsonBody(patch): JsonBody<GigPatch>,
) -> ApiResult<Gig> {
    let patch = patch.validate()?;

    let gig = find(&state, id).await?;
    auth.ensure_owns(gig.owner_id, "gig")?;

    let updated = state.store().update_gig(id, &patch).await?;
    tracing::debug!("Gig {} updated", id);
    Ok(ApiResponse::success(updated).with_message("Gig updated"))
}

/// DELETE /api/gigs/:id - Remove a gig, owner only
pub async fn delete(State(state): State<AppState>, auth: AuthUser, IdPath(id): IdPath) -> ApiResult<Value> {
    let gig = find(&state, id).await?;
    auth.ensure_owns(gig.owner_id, "gig")?;

    state.store().delete_gig(id).await?;
    tracing::info!("Gig {} deleted by {}", id, auth.user_id);
    Ok(ApiResponse::success(json!({ "id": id })).with_message("Gig deleted"))
}

async fn find(state: &AppState, id: Uuid) -> Result<Gig, ApiError> {
    state
        .store()
        .get_gig(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gig not found"))
}
