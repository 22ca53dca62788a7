//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use nyro_site::Site;

use crate::SiteInfo;
use crate::live_reload::LiveReloadManager;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Page rendering and navigation.
    pub(crate) site: Arc<Site>,
    /// Branding for the page shell.
    pub(crate) info: SiteInfo,
    /// Stylesheet for highlighted code, generated at startup.
    pub(crate) highlight_css: String,
    /// Live reload manager (if enabled).
    pub(crate) live_reload: Option<LiveReloadManager>,
}

impl AppState {
    /// Check if live reload is enabled.
    #[must_use]
    pub(crate) fn live_reload_enabled(&self) -> bool {
        self.live_reload.is_some()
    }
}
