//! Static file serving.
//!
//! Serves the bundled stylesheets and scripts from `nyro-assets` plus the
//! syntax highlighting stylesheet generated at startup.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::ServerError;
use crate::handlers::content_type;
use crate::state::AppState;

/// Stylesheet for highlighted code blocks.
pub(crate) const HIGHLIGHT_CSS: &str = "highlight.css";

/// Handle GET /assets/{file}.
pub(crate) async fn serve_asset(
    Path(file): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    if file == HIGHLIGHT_CSS {
        return Ok((
            [(header::CONTENT_TYPE, content_type("text/css"))],
            state.highlight_css.clone(),
        )
            .into_response());
    }

    let content = nyro_assets::get(&file).ok_or_else(|| ServerError::AssetNotFound(file.clone()))?;
    let mime = nyro_assets::mime_for(&file);
    Ok((
        [(header::CONTENT_TYPE, content_type(mime))],
        content.into_owned(),
    )
        .into_response())
}
