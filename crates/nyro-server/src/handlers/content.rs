//! Raw content files.
//!
//! Serves files from the content root as-is: images next to the docs,
//! markdown sources and the changelog.

use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};

use super::content_type;
use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /CHANGELOG.md.
pub(crate) async fn changelog_source(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    serve_file(&state, state.site.changelog_path())
}

/// Read `path` from storage and return it with a guessed content type.
pub(crate) fn serve_file(state: &AppState, path: &Path) -> Result<Response, ServerError> {
    let bytes = state.site.storage().read_bytes(path).map_err(|e| {
        if e.is_not_found() {
            ServerError::FileNotFound(path.to_path_buf())
        } else {
            ServerError::Storage(e)
        }
    })?;

    let mime = nyro_assets::mime_for(&path.to_string_lossy());
    Ok((
        [
            (header::CONTENT_TYPE, content_type(mime)),
            (header::CACHE_CONTROL, "no-cache".to_owned()),
        ],
        bytes,
    )
        .into_response())
}
