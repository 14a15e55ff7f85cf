use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::AuthKeys;
use crate::config::{AppConfig, Environment, SecurityConfig};
use crate::database::{DatabaseManager, MemoryStore, PgStore, Store};
use crate::handlers::{protected, public};
use crate::state::AppState;

/// All routes, without the HTTP layers. Integration tests drive this directly.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(public::root::index))
        .route("/health", get(public::root::health))
        .merge(profile_routes())
        .merge(gig_routes())
        .merge(availability_routes())
        .merge(contact_routes())
        .merge(collab_routes())
        .merge(notification_routes())
        .merge(slate_routes())
        .with_state(state)
}

/// Full application: routes plus CORS, request tracing and the body size limit.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let app = router(state)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer(&config.security));

    if config.api.enable_request_logging {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    }
}

fn profile_routes() -> Router<AppState> {
    use protected::{profile, whoami};

    Router::new()
        .route("/api/auth/whoami", get(whoami::show))
        .route("/api/profile", get(profile::show).put(profile::upsert))
        .route(
            "/api/profile/roles",
            get(profile::roles).put(profile::replace_roles).post(profile::add_role),
        )
        .route("/api/profile/roles/:role", axum::routing::delete(profile::remove_role))
        .route("/api/profiles/:id", get(public::profiles::show))
}

fn gig_routes() -> Router<AppState> {
    use protected::gigs;

    Router::new()
        .route("/api/gigs", get(gigs::list).post(gigs::create))
        .route("/api/gigs/:id", get(gigs::show).patch(gigs::update).delete(gigs::delete))
}

fn availability_routes() -> Router<AppState> {
    use protected::availability;

    Router::new()
        .route("/api/availability", get(availability::list).post(availability::create))
        .route(
            "/api/availability/:id",
            patch(availability::update).delete(availability::delete),
        )
}

fn contact_routes() -> Router<AppState> {
    use protected::contacts;

    Router::new()
        .route("/api/contacts", get(contacts::list).post(contacts::create))
        .route("/api/contacts/:id", patch(contacts::update).delete(contacts::delete))
}

fn collab_routes() -> Router<AppState> {
    use protected::collab;

    Router::new()
        .route("/api/collab", get(collab::list).post(collab::create))
        .route(
            "/api/collab/:id",
            get(collab::show).patch(collab::update).delete(collab::delete),
        )
        .route(
            "/api/collab/:id/collaborators",
            get(collab::collaborators).post(collab::join).delete(collab::leave),
        )
}

fn notification_routes() -> Router<AppState> {
    use protected::notifications;

    Router::new()
        .route("/api/notifications", get(notifications::list))
        .route("/api/notifications/unread-count", get(notifications::unread_count))
        .route("/api/notifications/read-all", post(notifications::read_all))
        .route("/api/notifications/:id/read", patch(notifications::mark_read))
        .route("/api/notifications/:id", axum::routing::delete(notifications::delete))
}

fn slate_routes() -> Router<AppState> {
    use protected::slate;

    Router::new()
        .route("/api/slate", get(slate::list).post(slate::create))
        .route("/api/slate/:id", get(slate::show).delete(slate::delete))
        .route("/api/slate/:id/like", post(slate::like).delete(slate::unlike))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
}

/// Pick the backing store: Postgres when `DATABASE_URL` is set, otherwise the
/// in-memory store (development only).
pub async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let store: Arc<dyn Store> = match config.database.url {
        Some(_) => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to the database")?;
            if config.database.run_migrations {
                DatabaseManager::migrate(&pool).await?;
            }
            Arc::new(PgStore::new(pool))
        }
        None if config.environment == Environment::Development => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store, data is lost on restart");
            Arc::new(MemoryStore::new())
        }
        None => anyhow::bail!("DATABASE_URL is required in {:?} mode", config.environment),
    };

    Ok(AppState::new(
        store,
        AuthKeys::from_config(&config.security),
        config.pagination.clone(),
    ))
}

/// Bind and serve until Ctrl+C or SIGTERM.
pub async fn serve(config: &AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    config.check().map_err(anyhow::Error::msg)?;

    let state = build_state(config).await?;
    let app = app(state, config);

    let bind_addr = format!("0.0.0.0:{}", port.unwrap_or(config.api.port));
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Gigboard API listening on http://{} ({:?})", bind_addr, config.environment);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, starting shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, starting shutdown"),
    }
}
