//! HTTP server for the NyroDB site.
//!
//! Serves the landing page, the documentation browser and the changelog as
//! server-rendered HTML, plus:
//! - JSON endpoints for navigation and rendered documents
//! - Raw content files (markdown sources, images)
//! - Bundled stylesheets and scripts
//! - WebSocket endpoint for live reload during development
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use nyro_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         source_dir: PathBuf::from("public"),
//!         live_reload_enabled: true,
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum server (nyro-server)
//!                        │
//!                        ├─► Pages + API ──► Site (render + cache) ──► Storage
//!                        │
//!                        ├─► WebSocket ◄── LiveReloadManager ◄── Storage::watch
//!                        │
//!                        └─► Assets (nyro-assets, highlight theme CSS)
//! ```

mod app;
mod error;
mod handlers;
mod live_reload;
mod middleware;
mod state;
mod static_files;
mod views;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use nyro_site::{Site, SiteOptions};
use nyro_storage::FsStorage;
use state::AppState;
use tokio::sync::broadcast;

pub use error::ServerError;

/// Branding shown in the page shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteInfo {
    /// Product name.
    pub name: String,
    /// Version label in the header.
    pub version: String,
    /// Source repository link. Empty hides it.
    pub repository_url: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "NyroDB".to_owned(),
            version: "v1.0.0".to_owned(),
            repository_url: "https://github.com/TheRemyyy/nyro-db".to_owned(),
        }
    }
}

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Content root holding `docs/` and the changelog.
    pub source_dir: PathBuf,
    /// Changelog path relative to the content root.
    pub changelog: PathBuf,
    /// Enable live reload.
    pub live_reload_enabled: bool,
    /// Watch patterns for live reload.
    pub watch_patterns: Option<Vec<String>>,
    /// syntect theme for code highlighting.
    pub highlight_theme: String,
    /// Branding.
    pub site: SiteInfo,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            source_dir: PathBuf::from("public"),
            changelog: PathBuf::from("CHANGELOG.md"),
            live_reload_enabled: false,
            watch_patterns: None,
            highlight_theme: nyro_renderer::DEFAULT_THEME.to_owned(),
            site: SiteInfo::default(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the highlight theme is unknown, the watcher cannot
/// start, or the address cannot be bound.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let storage: Arc<dyn nyro_storage::Storage> = match &config.watch_patterns {
        Some(patterns) => Arc::new(FsStorage::with_patterns(
            config.source_dir.clone(),
            patterns,
        )?),
        None => Arc::new(FsStorage::new(config.source_dir.clone())),
    };

    let site = Arc::new(Site::new(
        storage,
        SiteOptions {
            changelog_path: config.changelog.clone(),
            highlight: true,
        },
    ));

    let highlight_css = nyro_renderer::theme_css(&config.highlight_theme)?;

    let live_reload = if config.live_reload_enabled {
        let (tx, _rx) = broadcast::channel::<live_reload::ReloadEvent>(100);
        let mut manager = live_reload::LiveReloadManager::new(Arc::clone(&site), tx);
        manager.start()?;
        Some(manager)
    } else {
        None
    };

    let state = Arc::new(AppState {
        site,
        info: config.site.clone(),
        highlight_css,
        live_reload,
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, source_dir = %config.source_dir.display(), "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from the loaded site configuration.
#[must_use]
pub fn server_config_from_config(config: &nyro_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        source_dir: config.content.source_dir.clone(),
        changelog: config.content.changelog.clone(),
        live_reload_enabled: config.live_reload.enabled,
        watch_patterns: config.live_reload.watch_patterns.clone(),
        highlight_theme: config.highlight.theme.clone(),
        site: SiteInfo {
            name: config.site.name.clone(),
            version: config.site.version.clone(),
            repository_url: config.site.repository_url.clone(),
        },
    }
}
