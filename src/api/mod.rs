use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use time;

use crate::config::Config;
use crate::constants::sesiones::INACTIVITY_MINUTES;
use crate::state::SharedState;

pub mod auth;
mod clientes;
mod documentos;
mod error;
mod productos;
mod reporte;
mod system;
mod types;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn documento_service(&self) -> &Arc<dyn crate::services::DocumentoService> {
        &self.shared.documento_service
    }

    #[must_use]
    pub fn reporte_service(&self) -> &Arc<crate::services::ReporteService> {
        &self.shared.reporte_service
    }
}

pub fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
    })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = {
        let config = state.config().read().await;
        config.server.cors_allowed_origins.clone()
    };

    let protected_routes = create_protected_router(state.clone());

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            INACTIVITY_MINUTES,
        )));

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/register", post(auth::register))
        .layer(session_layer)
        .with_state(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/clientes", get(clientes::list_clientes))
        .route("/clientes", post(clientes::create_cliente))
        .route("/clientes/{id}", get(clientes::get_cliente))
        .route("/clientes/{id}", put(clientes::update_cliente))
        .route("/clientes/{id}", delete(clientes::delete_cliente))
        .route("/productos", get(productos::list_productos))
        .route("/productos", post(productos::create_producto))
        .route("/productos/{id}", get(productos::get_producto))
        .route("/productos/{id}", put(productos::update_producto))
        .route("/productos/{id}", delete(productos::delete_producto))
        .route("/documentos", get(documentos::list_documentos))
        .route("/documentos", post(documentos::emitir_documento))
        .route("/documentos/{id}", get(documentos::get_documento))
        .route("/documentos/{id}/anular", post(documentos::anular_documento))
        .route("/reportes/ventas", get(reporte::exportar_ventas))
        .route("/system/status", get(system::get_status))
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/password", put(auth::change_password))
        .route(
            "/auth/api-key/regenerate",
            post(auth::regenerate_api_key),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::auth_middleware,
        ))
}
