use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - Service name, version and endpoint index
pub async fn index() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Gigboard API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "health": "/health (public)",
                "whoami": "/api/auth/whoami (protected)",
                "profile": "/api/profile, /api/profile/roles (protected), /api/profiles/:id (public)",
                "gigs": "/api/gigs[/:id] (reads public, writes protected)",
                "availability": "/api/availability[/:id] (protected)",
                "contacts": "/api/contacts[/:id] (protected)",
                "collab": "/api/collab[/:id[/collaborators]] (reads public, writes protected)",
                "notifications": "/api/notifications[/:id] (protected)",
                "slate": "/api/slate[/:id[/like]] (reads public, writes protected)",
            }
        }
    }))
}

/// GET /health - Store connectivity check
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store().ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
