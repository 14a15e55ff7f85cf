use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{
    CollabFilter, CollabPatch, CollabPost, CollabPostDetail, CollabStatus, Collaborator, JoinCollab, ListParams,
    NewCollabPost, NewNotification, Paged,
};
use crate::database::models::notification::KIND_COLLAB_JOIN;
use crate::error::ApiError;
use crate::middleware::{
    ApiResponse, ApiResult, AuthUser, IdPath, JsonBody, MaybeAuthUser, OptionalJsonBody, ValidQuery,
};
use crate::state::AppState;

use super::notify;

#[derive(Debug, Default, Deserialize)]
pub struct CollabQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub search: Option<String>,
    pub status: Option<CollabStatus>,
    pub owner_id: Option<Uuid>,
}

/// GET /api/collab - Browse collaboration posts, newest first
pub async fn list(
    State(state): State<AppState>,
    _viewer: MaybeAuthUser,
    ValidQuery(query): ValidQuery<CollabQuery>,
) -> ApiResult<Paged<CollabPost>> {
    let params = ListParams {
        limit: query.limit,
        offset: query.offset,
        search: query.search,
    };
    let page = params.page(state.pagination())?;

    let filter = CollabFilter {
        search: params.search(),
        status: query.status,
        owner_id: query.owner_id,
    };

    let (posts, total) = state.store().list_collab_posts(&filter, page).await?;
    Ok(ApiResponse::success(Paged::new(posts, total, page)))
}

/// POST /api/collab
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<NewCollabPost>,
) -> ApiResult<CollabPost> {
    let input = input.validate()?;
    let post = state.store().create_collab_post(auth.user_id, &input).await?;

    tracing::info!("Collab post {} created by {}", post.id, auth.user_id);
    Ok(ApiResponse::created(post).with_message("Collab post created"))
}

/// GET /api/collab/:id - Post plus everyone who joined
pub async fn show(
    State(state): State<AppState>,
    _viewer: MaybeAuthUser,
    IdPath(id): IdPath,
) -> ApiResult<CollabPostDetail> {
    let post = find(&state, id).await?;
    let collaborators = state.store().list_collaborators(id).await?;
    Ok(ApiResponse::success(CollabPostDetail { post, collaborators }))
}

/// PATCH /api/collab/:id - Owner only
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
    JsonBody(patch): JsonBody<CollabPatch>,
) -> ApiResult<CollabPost> {
    let patch = patch.validate()?;

    let post = find(&state, id).await?;
    auth.ensure_owns(post.owner_id, "collab post")?;

    let updated = state.store().update_collab_post(id, &patch).await?;
    tracing::debug!("Collab post {} updated", id);
    Ok(ApiResponse::success(updated).with_message("Collab post updated"))
}

/// DELETE /api/collab/:id - Owner only; collaborators go with it
pub async fn delete(State(state): State<AppState>, auth: AuthUser, IdPath(id): IdPath) -> ApiResult<Value> {
    let post = find(&state, id).await?;
    auth.ensure_owns(post.owner_id, "collab post")?;

    state.store().delete_collab_post(id).await?;
    tracing::info!("Collab post {} deleted by {}", id, auth.user_id);
    Ok(ApiResponse::success(json!({ "id": id })).with_message("Collab post deleted"))
}

/// GET /api/collab/:id/collaborators
pub async fn collaborators(
    State(state): State<AppState>,
    _viewer: MaybeAuthUser,
    IdPath(id): IdPath,
) -> ApiResult<Vec<Collaborator>> {
    find(&state, id).await?;
    let collaborators = state.store().list_collaborators(id).await?;
    Ok(ApiResponse::success(collaborators))
}

/// POST /api/collab/:id/collaborators - Join a post, optionally naming a role
pub async fn join(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
    OptionalJsonBody(body): OptionalJsonBody<JoinCollab>,
) -> ApiResult<Collaborator> {
    let role = body.unwrap_or_default().validate()?;

    let post = find(&state, id).await?;
    if post.owner_id == auth.user_id {
        return Err(ApiError::bad_request("You cannot join your own collab post"));
    }
    if post.status == CollabStatus::Closed {
        return Err(ApiError::bad_request("This collab post is closed"));
    }

    let store = state.store();
    let collaborator = store
        .add_collaborator(id, auth.user_id, role.as_deref())
        .await
        .map_err(|e| e.conflict_as("Already collaborating on this post"))?;

    let name = notify::actor_name(store, auth.user_id).await;
    let body = match &collaborator.role {
        Some(role) => format!("{} joined \"{}\" as {}", name, post.title, role),
        None => format!("{} joined \"{}\"", name, post.title),
    };
    notify::send(
        store,
        NewNotification {
            user_id: post.owner_id,
            kind: KIND_COLLAB_JOIN,
            title: "New collaborator".to_string(),
            body: Some(body),
            link: Some(format!("/collab/{}", id)),
            actor_id: Some(auth.user_id),
        },
    )
    .await;

    tracing::info!("User {} joined collab post {}", auth.user_id, id);
    Ok(ApiResponse::created(collaborator).with_message("Joined collab post"))
}

/// DELETE /api/collab/:id/collaborators - Leave a post
pub async fn leave(State(state): State<AppState>, auth: AuthUser, IdPath(id): IdPath) -> ApiResult<Value> {
    state.store().remove_collaborator(id, auth.user_id).await?;
    Ok(ApiResponse::success(json!({ "id": id })).with_message("Left collab post"))
}

async fn find(state: &AppState, id: Uuid) -> Result<CollabPost, ApiError> {
    state
        .store()
        .get_collab_post(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Collab post not found"))
}
