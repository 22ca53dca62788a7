//! Documents API endpoint.
//!
//! Returns a rendered documentation page as JSON with metadata, table of
//! contents and neighbouring pages.

use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use nyro_renderer::TocEntry;
use nyro_site::{DocPage, DocRoute, NavItem};
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /api/docs/{path}.
#[derive(Serialize)]
struct DocResponse<'a> {
    meta: DocMeta<'a>,
    toc: &'a [TocEntry],
    /// Rendered HTML content.
    content: &'a str,
    prev: Option<&'a NavItem>,
    next: Option<&'a NavItem>,
    /// False when the source file is missing.
    found: bool,
}

/// Document metadata.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocMeta<'a> {
    /// Title from the first H1.
    title: Option<&'a str>,
    /// URL path.
    path: &'a str,
    /// Source file relative to the content root.
    source_file: String,
    /// Last modification time (RFC 3339).
    last_modified: Option<String>,
}

/// Handle GET /api/docs/ (default page).
pub(crate) async fn get_root_doc(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    get_doc_impl(&state, &DocRoute::from_sub_path(""), &headers)
}

/// Handle GET /api/docs/{path}.
pub(crate) async fn get_doc(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    get_doc_impl(&state, &DocRoute::from_sub_path(&path), &headers)
}

fn get_doc_impl(state: &AppState, route: &DocRoute, headers: &HeaderMap) -> Response {
    let page = state.site.render_doc(route);

    let etag = compute_etag(&state.info.version, &page.html);
    if page.found
        && let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return StatusCode::NOT_MODIFIED.into_response();
    }

    let last_modified = page.last_modified.and_then(to_datetime);
    let body = Json(doc_response(&page, last_modified));
    let status = if page.found {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };

    let mut response = (
        status,
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        body,
    )
        .into_response();

    if let Some(modified) = last_modified
        && let Ok(value) = modified
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string()
            .parse()
    {
        response.headers_mut().insert(header::LAST_MODIFIED, value);
    }
    response
}

fn doc_response(page: &DocPage, last_modified: Option<DateTime<Utc>>) -> DocResponse<'_> {
    DocResponse {
        meta: DocMeta {
            title: page.title.as_deref(),
            path: &page.current_path,
            source_file: page.source_file.display().to_string(),
            last_modified: last_modified.map(|t| t.to_rfc3339()),
        },
        toc: &page.toc,
        content: &page.html,
        prev: page.prev.as_ref(),
        next: page.next.as_ref(),
        found: page.found,
    }
}

/// Seconds since the epoch to UTC time. Negative or non-finite values are
/// dropped.
fn to_datetime(mtime: f64) -> Option<DateTime<Utc>> {
    let since_epoch = Duration::try_from_secs_f64(mtime).ok()?;
    Some((UNIX_EPOCH + since_epoch).into())
}

/// Compute `ETag` from version and content.
///
/// MD5 truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
