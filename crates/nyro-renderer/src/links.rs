//! Rewriting of relative markdown links to site routes.

/// Prefixes of links that never point at a content file.
const EXTERNAL: [&str; 5] = ["http://", "https://", "//", "mailto:", "#"];

/// Resolve a markdown link relative to the directory of the current page.
///
/// `base_path` is the route directory without leading slash, e.g.
/// `docs/getting_started` for `/docs/getting_started/installation`:
/// - `./configuration.md` -> `/docs/getting_started/configuration`
/// - `../api/rest.md#insert` -> `/docs/api/rest#insert`
/// - `/docs/overview.md` -> `/docs/overview`
///
/// External links, fragment-only links and non-markdown links are returned
/// unchanged. `..` never climbs above the content root.
pub(crate) fn resolve_link(url: &str, base_path: &str) -> String {
    let (target, fragment) = match url.find('#') {
        Some(hash) => url.split_at(hash),
        None => (url, ""),
    };
    let Some(page) = target.strip_suffix(".md") else {
        return url.to_owned();
    };
    if EXTERNAL.iter().any(|prefix| url.starts_with(prefix)) {
        return url.to_owned();
    }

    let mut segments: Vec<&str> = if page.starts_with('/') {
        Vec::new()
    } else {
        base_path.split('/').filter(|s| !s.is_empty()).collect()
    };
    for part in page.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(part),
        }
    }

    format!("/{}{fragment}", segments.join("/"))
}
