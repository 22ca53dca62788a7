//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::live_reload;
use crate::middleware::security;
use crate::state::AppState;
use crate::static_files;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        .route("/api/navigation", get(handlers::navigation::get_navigation))
        .route("/api/docs", get(handlers::docs::get_root_doc))
        .route("/api/docs/", get(handlers::docs::get_root_doc))
        .route("/api/docs/{*path}", get(handlers::docs::get_doc));

    // HTML pages and raw content
    let page_routes = Router::new()
        .route("/", get(handlers::pages::home))
        .route("/docs", get(handlers::pages::docs_root))
        .route("/docs/", get(handlers::pages::docs_root))
        .route("/docs/{*path}", get(handlers::pages::doc))
        .route("/changelog", get(handlers::pages::changelog))
        .route("/CHANGELOG.md", get(handlers::content::changelog_source))
        .route("/assets/{*file}", get(static_files::serve_asset));

    let mut router = Router::new().merge(api_routes).merge(page_routes);

    // WebSocket for live reload
    if state.live_reload.is_some() {
        router = router.route("/ws/live-reload", get(live_reload::ws_handler));
    }

    router = router.fallback(handlers::pages::not_found);
    for layer in security::layers() {
        router = router.layer(layer);
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}
