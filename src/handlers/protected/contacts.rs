use axum::extract::State;
use serde_json::{json, Value};

use crate::database::models::{ContactPatch, CrewContact, ListParams, NewContact, Paged};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, IdPath, JsonBody, ValidQuery};
use crate::state::AppState;

/// GET /api/contacts - The caller's crew contact book, alphabetical
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidQuery(params): ValidQuery<ListParams>,
) -> ApiResult<Paged<CrewContact>> {
    let page = params.page(state.pagination())?;
    let search = params.search();

    let (contacts, total) = state
        .store()
        .list_contacts(auth.user_id, search.as_deref(), page)
        .await?;
    Ok(ApiResponse::success(Paged::new(contacts, total, page)))
}

/// POST /api/contacts
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<NewContact>,
) -> ApiResult<CrewContact> {
    let input = input.validate()?;
    let contact = state.store().create_contact(auth.user_id, &input).await?;
    Ok(ApiResponse::created(contact).with_message("Contact added"))
}

/// PATCH /api/contacts/:id
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
    JsonBody(patch): JsonBody<ContactPatch>,
) -> ApiResult<CrewContact> {
    let patch = patch.validate()?;
    let contact = state.store().update_contact(auth.user_id, id, &patch).await?;
    Ok(ApiResponse::success(contact).with_message("Contact updated"))
}

/// DELETE /api/contacts/:id
pub async fn delete(State(state): State<AppState>, auth: AuthUser, IdPath(id): IdPath) -> ApiResult<Value> {
    state.store().delete_contact(auth.user_id, id).await?;
    Ok(ApiResponse::success(json!({ "id": id })).with_message("Contact deleted"))
}
