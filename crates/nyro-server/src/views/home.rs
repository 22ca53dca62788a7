//! Landing page.

use std::fmt::Write;

use nyro_renderer::escape_html;

use super::icons::Glyph;
use crate::SiteInfo;

const STATS: [(&str, &str); 4] = [
    ("1M+", "Ops/Sec"),
    ("&lt;1μs", "Latency"),
    ("0", "Copy Overh."),
    ("∞", "Scalability"),
];

const TAGS: [&str; 6] = [
    "Throughput",
    "ACID",
    "O(1) indexing",
    "WebSocket",
    "Zero-copy",
    "Multi-tenant",
];

const FEATURES: [&str; 4] = [
    "RESTful endpoints for instant CRUD",
    "Schema-less JSON native storage",
    "Instant pub/sub over WebSockets",
    "Metrics endpoint for real-time monitoring",
];

const API_DEMO: &str = r#"<span class="method">POST</span> /insert/metrics <span class="muted">HTTP/1.1</span>
<span class="header-name">Content-Type:</span> application/json

{
  <span class="key">"service"</span>: <span class="string">"auth-node-1"</span>,
  <span class="key">"tps"</span>: <span class="number">1250000</span>,
  <span class="key">"status"</span>: <span class="string">"healthy"</span>
}"#;

pub(crate) fn home_page(info: &SiteInfo) -> String {
    let name = escape_html(&info.name);
    let mut out = String::new();

    let _ = write!(
        out,
        r#"<section class="hero"><div class="release-pill"><span class="dot"></span>{} Stable Release</div><h1>The Unified Storage Engine <br><span>for Hyper-Scale Apps.</span></h1><p class="lead">Stop splitting your data between slow databases and fragile caches.<strong>{name} is a zero-copy, memory-mapped engine that delivers 1M+ ops/sec with persistent reliability.</strong></p><div class="actions"><a class="button primary" href="/docs/getting_started/installation">Build Fast {}</a><a class="button secondary" href="/docs">Explore Docs</a></div></section>"#,
        escape_html(&info.version),
        Glyph::ArrowRight.svg("")
    );

    let _ = write!(
        out,
        r#"<section class="section alt"><div class="inner split"><div><h2>Killing the Cache-Aside Complexity.</h2><p>Modern infrastructure is broken. We store data in "slow" databases and then build massive, complex sync layers to keep "fast" caches (Redis/Memcached) updated.</p><p><span class="highlight-text">{name} was born to kill this pattern.</span> By combining memory-mapped files with zero-copy serialization, we've created a system that is as fast as your RAM but as reliable as your NVMe.</p><p>Whether you're building high-frequency trading platforms or massive real-time games, {name} gives you a single source of truth that never lags.</p></div><div class="stats">"#
    );
    for (value, label) in STATS {
        let _ = write!(
            out,
            r#"<div class="stat"><span class="value">{value}</span><span class="label">{label}</span></div>"#
        );
    }
    out.push_str("</div></div></section>");

    out.push_str(r#"<section class="section"><div class="centered"><h2>Core Architecture</h2><p>High throughput, ACID persistence, O(1) indexing, real-time WebSockets, zero-copy Rust, and multi-tenant auth in one engine.</p><div class="tags">"#);
    for tag in TAGS {
        let _ = write!(out, r#"<span class="tag">{tag}</span>"#);
    }
    out.push_str("</div></div></section>");

    let _ = write!(
        out,
        r#"<section class="section alt"><div class="inner split"><div><h2>Simple, Declarative API</h2><p>{name} abstracts the complexity of mmap and thread-safety behind a clean REST and WebSocket interface.</p><ul class="checklist">"#
    );
    for feature in FEATURES {
        let _ = write!(out, "<li>{feature}</li>");
    }
    let _ = write!(
        out,
        r#"</ul></div><div class="terminal">{API_DEMO}</div></div></section>"#
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_content() {
        let html = home_page(&SiteInfo::default());

        assert!(html.contains("The Unified Storage Engine"));
        assert!(html.contains("v1.0.0 Stable Release"));
        assert!(html.contains(r#"<span class="value">1M+</span>"#));
        assert!(html.contains(r#"<span class="tag">O(1) indexing</span>"#));
        assert!(html.contains("/insert/metrics"));
        assert!(html.contains(r#"href="/docs/getting_started/installation""#));
    }

    #[test]
    fn test_home_uses_site_name() {
        let info = SiteInfo {
            name: "Nyro & Co".to_owned(),
            ..SiteInfo::default()
        };
        assert!(home_page(&info).contains("Nyro &amp; Co is a zero-copy"));
    }
}
