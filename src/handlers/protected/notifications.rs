use axum::extract::State;
use serde_json::{json, Value};

use crate::database::models::{ListParams, Notification, NotificationQuery, Paged};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, IdPath, ValidQuery};
use crate::state::AppState;

/// GET /api/notifications - Newest first, `unread=true` to hide read ones
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidQuery(query): ValidQuery<NotificationQuery>,
) -> ApiResult<Paged<Notification>> {
    let page = ListParams {
        limit: query.limit,
        offset: query.offset,
        search: None,
    }
    .page(state.pagination())?;

    let (items, total) = state
        .store()
        .list_notifications(auth.user_id, query.unread, page)
        .await?;
    Ok(ApiResponse::success(Paged::new(items, total, page)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Value> {
    let count = state.store().unread_count(auth.user_id).await?;
    Ok(ApiResponse::success(json!({ "count": count })))
}

/// POST /api/notifications/read-all
pub async fn read_all(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Value> {
    let updated = state.store().mark_all_read(auth.user_id).await?;
    tracing::debug!("Marked {} notifications read for {}", updated, auth.user_id);
    Ok(ApiResponse::success(json!({ "updated": updated })))
}

/// PATCH /api/notifications/:id/read
pub async fn mark_read(State(state): State<AppState>, auth: AuthUser, IdPath(id): IdPath) -> ApiResult<Notification> {
    let notification = state.store().mark_notification_read(auth.user_id, id).await?;
    Ok(ApiResponse::success(notification))
}

/// DELETE /api/notifications/:id
pub async fn delete(State(state): State<AppState>, auth: AuthUser, IdPath(id): IdPath) -> ApiResult<Value> {
    state.store().delete_notification(auth.user_id, id).await?;
    Ok(ApiResponse::success(json!({ "id": id })).with_message("Notification deleted"))
}
