use axum::extract::State;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::notification::KIND_SLATE_LIKE;
use crate::database::models::{ListParams, NewNotification, NewSlatePost, Paged, SlateLike, SlatePost, SlateQuery};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, IdPath, JsonBody, MaybeAuthUser, ValidQuery};
use crate::state::AppState;

use super::notify;

/// GET /api/slate - Feed, newest first; `liked_by_me` is only ever true for a signed-in viewer
pub async fn list(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    ValidQuery(query): ValidQuery<SlateQuery>,
) -> ApiResult<Paged<SlatePost>> {
    let page = ListParams {
        limit: query.limit,
        offset: query.offset,
        search: None,
    }
    .page(state.pagination())?;

    let (posts, total) = state
        .store()
        .list_slate_posts(query.author_id, viewer.user_id(), page)
        .await?;
    Ok(ApiResponse::success(Paged::new(posts, total, page)))
}

/// POST /api/slate
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<NewSlatePost>,
) -> ApiResult<SlatePost> {
    let input = input.validate()?;
    let post = state.store().create_slate_post(auth.user_id, &input).await?;

    tracing::info!("Slate post {} created by {}", post.id, auth.user_id);
    Ok(ApiResponse::created(post).with_message("Slate post created"))
}

/// GET /api/slate/:id
pub async fn show(State(state): State<AppState>, viewer: MaybeAuthUser, IdPath(id): IdPath) -> ApiResult<SlatePost> {
    let post = find(&state, id, viewer.user_id()).await?;
    Ok(ApiResponse::success(post))
}

/// DELETE /api/slate/:id - Author only
pub async fn delete(State(state): State<AppState>, auth: AuthUser, IdPath(id): IdPath) -> ApiResult<Value> {
    let post = find(&state, id, None).await?;
    auth.ensure_owns(post.author_id, "slate post")?;

    state.store().delete_slate_post(id).await?;
    tracing::info!("Slate post {} deleted by {}", id, auth.user_id);
    Ok(ApiResponse::success(json!({ "id": id })).with_message("Slate post deleted"))
}

/// POST /api/slate/:id/like
pub async fn like(State(state): State<AppState>, auth: AuthUser, IdPath(id): IdPath) -> ApiResult<SlateLike> {
    let post = find(&state, id, None).await?;

    let store = state.store();
    let like = store
        .like_slate_post(id, auth.user_id)
        .await
        .map_err(|e| e.conflict_as("Post already liked"))?;

    if post.author_id != auth.user_id {
        let name = notify::actor_name(store, auth.user_id).await;
        notify::send(
            store,
            NewNotification {
                user_id: post.author_id,
                kind: KIND_SLATE_LIKE,
                title: "New like".to_string(),
                body: Some(format!("{} liked your post", name)),
                link: Some(format!("/slate/{}", id)),
                actor_id: Some(auth.user_id),
            },
        )
        .await;
    }

    Ok(ApiResponse::created(like).with_message("Post liked"))
}

/// DELETE /api/slate/:id/like
pub async fn unlike(State(state): State<AppState>, auth: AuthUser, IdPath(id): IdPath) -> ApiResult<Value> {
    state.store().unlike_slate_post(id, auth.user_id).await?;
    Ok(ApiResponse::success(json!({ "id": id })).with_message("Post unliked"))
}

async fn find(state: &AppState, id: Uuid, viewer: Option<Uuid>) -> Result<SlatePost, ApiError> {
    state
        .store()
        .get_slate_post(id, viewer)
        .await?
        .ok_or_else(|| ApiError::not_found("Slate post not found"))
}
