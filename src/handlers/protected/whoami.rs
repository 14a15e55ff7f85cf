use axum::extract::State;
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{Profile, User};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub id: Uuid,
    pub email: Option<String>,
    pub role: String,
    pub user: User,
    pub profile: Option<Profile>,
    pub roles: Vec<String>,
}

/// GET /api/auth/whoami - Identity behind the bearer token plus its profile
pub async fn show(State(state): State<AppState>, auth: AuthUser) -> ApiResult<WhoAmI> {
    let store = state.store();

    let profile = store.get_profile(auth.user_id).await?;
    let roles = store.list_roles(auth.user_id).await?.into_iter().map(|r| r.role).collect();

    Ok(ApiResponse::success(WhoAmI {
        id: auth.user_id,
        email: auth.email,
        role: auth.role,
        user: auth.user,
        profile,
        roles,
    }))
}
