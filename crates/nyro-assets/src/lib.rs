//! Site assets for the NyroDB documentation server.
//!
//! Provides a single API for the stylesheet and scripts in `assets/`:
//!
//! - **`embed` feature on**: files are compiled into the binary via `rust-embed`
//! - **`embed` feature off**: files are read from the crate's `assets/` directory
//!   at request time, so edits show up without a rebuild

use std::borrow::Cow;
#[cfg(not(feature = "embed"))]
use std::path::{Component, Path};

/// Site stylesheet.
pub const SITE_CSS: &str = "site.css";
/// Mobile menu toggles.
pub const SITE_JS: &str = "site.js";
/// Live reload client.
pub const LIVE_RELOAD_JS: &str = "live-reload.js";
/// Assets every page shell links to.
pub const REQUIRED: [&str; 3] = [SITE_CSS, SITE_JS, LIVE_RELOAD_JS];

#[cfg(feature = "embed")]
#[derive(rust_embed::RustEmbed)]
#[folder = "assets"]
struct Assets;

#[cfg(not(feature = "embed"))]
const DEV_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

/// Get an asset by path relative to `assets/`.
#[cfg(feature = "embed")]
pub fn get(path: &str) -> Option<Cow<'static, [u8]>> {
    Assets::get(path).map(|f| f.data)
}

/// Get an asset by path relative to `assets/`.
///
/// Paths that leave the asset directory are treated as missing.
#[cfg(not(feature = "embed"))]
pub fn get(path: &str) -> Option<Cow<'static, [u8]>> {
    let relative = Path::new(path);
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }
    std::fs::read(Path::new(DEV_DIR).join(relative))
        .ok()
        .map(Cow::Owned)
}

/// Iterate all available asset paths.
#[cfg(feature = "embed")]
pub fn iter() -> impl Iterator<Item = Cow<'static, str>> {
    Assets::iter()
}

/// Iterate all available asset paths.
#[cfg(not(feature = "embed"))]
pub fn iter() -> impl Iterator<Item = Cow<'static, str>> {
    let mut names: Vec<String> = std::fs::read_dir(DEV_DIR)
        .into_iter()
        .flatten()
        .flatten()
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names.into_iter().map(Cow::Owned)
}

/// MIME type for a file path, `application/octet-stream` when unknown.
pub fn mime_for(path: &str) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
}

/// Whether the last segment of `path` has an extension with a known MIME type.
///
/// Markdown sources count as known.
#[must_use]
pub fn has_known_type(path: &str) -> bool {
    let path = std::path::Path::new(path);
    path.extension().is_some_and(|ext| ext == "md")
        || mime_guess::from_path(path).first_raw().is_some()
}
