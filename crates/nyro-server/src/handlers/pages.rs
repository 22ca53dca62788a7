//! HTML page handlers.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::response::Response;
use nyro_site::DocRoute;

use super::{content, html_response};
use crate::error::ServerError;
use crate::state::AppState;
use crate::views::{self, Shell};

/// Handle GET /.
pub(crate) async fn home(State(state): State<Arc<AppState>>) -> Response {
    let body = views::home_page(&state.info);
    let html = views::render(
        &state.info,
        state.live_reload_enabled(),
        &Shell {
            title: None,
            page_path: "/",
            body,
        },
    );
    html_response(StatusCode::OK, html)
}

/// Handle GET /docs and GET /docs/.
pub(crate) async fn docs_root(State(state): State<Arc<AppState>>) -> Response {
    render_doc(&state, &DocRoute::from_sub_path(""))
}

/// Handle GET /docs/{path}.
///
/// Paths whose last segment has a known file type are served as raw content
/// files, so markdown sources and images next to them stay reachable. Any
/// other path, dotted version segments included, is a page.
pub(crate) async fn doc(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    if nyro_assets::has_known_type(&path) {
        return content::serve_file(&state, &PathBuf::from(format!("docs/{path}")));
    }
    Ok(render_doc(&state, &DocRoute::from_sub_path(&path)))
}

/// Handle GET /changelog.
pub(crate) async fn changelog(State(state): State<Arc<AppState>>) -> Response {
    let page = state.site.render_changelog();
    let html = views::render(
        &state.info,
        state.live_reload_enabled(),
        &Shell {
            title: Some("Changelog"),
            page_path: "/changelog",
            body: views::changelog_page(&state.info, &page),
        },
    );
    html_response(StatusCode::OK, html)
}

/// Fallback for unknown routes.
pub(crate) async fn not_found(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "No route");
    html_response(
        StatusCode::NOT_FOUND,
        views::not_found_page(&state.info, state.live_reload_enabled(), uri.path()),
    )
}

fn render_doc(state: &AppState, route: &DocRoute) -> Response {
    let page = state.site.render_doc(route);
    let navigation = state.site.navigation();
    let title = page.title.as_deref().or_else(|| {
        navigation
            .find(&page.current_path)
            .map(|item| item.title.as_str())
    });

    let html = views::render(
        &state.info,
        state.live_reload_enabled(),
        &Shell {
            title: Some(title.unwrap_or("Documentation")),
            page_path: &page.current_path,
            body: views::docs_page(navigation, &page),
        },
    );

    let status = if page.found {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    html_response(status, html)
}
