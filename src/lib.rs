pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod storage;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{BackendKind, Config};
use crate::services::{AuthService, PhotoService};
use crate::storage::{StorageManager, Stores};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub photos: Arc<PhotoService>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Connect the configured backend and build the services
    pub async fn build(config: Config) -> error::Result<Self> {
        let stores = StorageManager::connect(&config).await?;
        Self::with_stores(config, stores)
    }

    /// Build the services on top of an existing collaborator pair
    pub fn with_stores(config: Config, stores: Stores) -> error::Result<Self> {
        let auth = AuthService::from_config(&config)?;
        let photos = PhotoService::new(
            stores,
            Duration::from_secs(config.gallery.cache_ttl_secs),
        );
        Ok(Self {
            config: Arc::new(config),
            photos: Arc::new(photos),
            auth: Arc::new(auth),
        })
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = state.config.server.max_upload_mb * 1024 * 1024;

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route(
            "/photos",
            post(handlers::photo::upload_photo).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/admin/login", post(handlers::auth::login));

    // Admin routes (session required)
    let admin_routes = Router::new()
        .route("/admin/logout", post(handlers::auth::logout))
        .route("/admin/photos", get(handlers::admin::list_photos))
        .route(
            "/admin/photos/:id",
            axum::routing::delete(handlers::admin::delete_photo),
        )
        .route(
            "/admin/photos/:id/download",
            get(handlers::admin::download_photo),
        )
        .route(
            "/admin/inconsistencies",
            get(handlers::admin::list_inconsistencies),
        )
        .route("/admin/reconcile", post(handlers::admin::reconcile))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    let mut router = Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api/v1", public_routes.merge(admin_routes));

    // Local blobs are served by the app itself unless the base URL points elsewhere
    if state.config.backend.kind == BackendKind::Local {
        match state.config.local.media_mount() {
            Some(mount) => {
                router = router.nest_service(&mount, ServeDir::new(&state.config.local.storage_path));
            }
            None => tracing::info!(
                "Local blobs are expected to be served at {}",
                state.config.local.public_base_url
            ),
        }
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
