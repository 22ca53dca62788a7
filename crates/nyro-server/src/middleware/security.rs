//! Security response headers.

use axum::http::HeaderValue;
use axum::http::header::HeaderName;
use tower_http::set_header::SetResponseHeaderLayer;

/// Pages load scripts and styles from `/assets` only; inline markup carries
/// no script or style attributes. Images may come from any HTTPS origin so
/// docs can embed badges.
const CSP: &str = "default-src 'self'; \
                   script-src 'self'; \
                   style-src 'self'; \
                   font-src 'self' data:; \
                   img-src 'self' data: https:; \
                   connect-src 'self' ws: wss:; \
                   frame-ancestors 'none'; \
                   base-uri 'self'";

/// Headers set on every response.
const HEADERS: [(&str, &str); 4] = [
    ("content-security-policy", CSP),
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
];

/// One overriding layer per security header.
pub(crate) fn layers() -> impl Iterator<Item = SetResponseHeaderLayer<HeaderValue>> {
    HEADERS.into_iter().map(|(name, value)| {
        SetResponseHeaderLayer::overriding(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csp_value() {
        assert!(CSP.contains("script-src 'self';"));
        assert!(!CSP.contains("'unsafe-eval'"));
        assert!(!CSP.contains("'unsafe-inline'"));
        assert!(CSP.contains("connect-src 'self' ws: wss:"));
        assert!(CSP.contains("frame-ancestors 'none'"));
    }

    #[test]
    fn test_layer_per_header() {
        assert_eq!(layers().count(), HEADERS.len());
    }
}
