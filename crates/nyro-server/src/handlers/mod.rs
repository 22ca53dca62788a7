//! HTTP request handlers.

pub(crate) mod content;
pub(crate) mod docs;
pub(crate) mod navigation;
pub(crate) mod pages;

use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};

/// HTML response that browsers must revalidate.
pub(crate) fn html_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CACHE_CONTROL, "no-cache")], Html(body)).into_response()
}

/// `Content-Type` value, with charset for text types.
pub(crate) fn content_type(mime: &str) -> String {
    if mime.starts_with("text/") || mime == "application/json" {
        format!("{mime}; charset=utf-8")
    } else {
        mime.to_owned()
    }
}
