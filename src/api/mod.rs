mod extract;
mod handlers;

pub use extract::ValidJson;

use axum::http::HeaderValue;
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Database;

/// CORS layer for the configured origin. An unparseable origin falls back to
/// allowing any, same as leaving it unset.
fn cors_layer(config: &Config) -> CorsLayer {
    let Some(origin) = config.cors_origin.as_deref() else {
        return CorsLayer::permissive();
    };

    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            tracing::warn!("invalid CORS_ORIGIN {:?}, allowing any origin", origin);
            CorsLayer::permissive()
        }
    }
}

pub fn create_router(db: Database, config: &Config) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health))
        // Opportunities
        .route("/opportunities", get(handlers::list_opportunities))
        .route("/opportunities", post(handlers::create_opportunity))
        .route("/opportunities/{id}", get(handlers::get_opportunity))
        .route("/opportunities/{id}", put(handlers::update_opportunity))
        .route("/opportunities/{id}", delete(handlers::delete_opportunity))
        // Notes
        .route("/opportunities/{id}/notes", post(handlers::add_note))
        .route("/notes/{id}", delete(handlers::delete_note))
        // Next steps
        .route("/opportunities/{id}/steps", post(handlers::add_step))
        .route("/steps/{id}", patch(handlers::toggle_step))
        .route("/steps/{id}", delete(handlers::delete_step))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
        .with_state(db)
}
