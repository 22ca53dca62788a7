//! `nyrodocs serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use nyro_config::{CliSettings, Config};
use nyro_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover nyro.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content directory holding docs/ and the changelog (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long, env = "NYRODOCS_PORT")]
    port: Option<u16>,

    /// Enable verbose output (request and render logs).
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable live reload (default: enabled).
    #[arg(long)]
    live_reload: Option<bool>,

    /// Disable live reload.
    #[arg(long, conflicts_with = "live_reload")]
    no_live_reload: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            live_reload_enabled: self.resolve_live_reload_enabled(),
            host: self.host,
            port: self.port,
            source_dir: self.source_dir,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let content_dir = &config.content.source_dir;
        output.heading(&format!("{} {}", config.site.name, config.site.version));
        output.field(
            "Listening",
            &format!("http://{}:{}", config.server.host, config.server.port),
        );
        output.field("Content", &content_dir.display());
        output.field("Changelog", &config.content.changelog.display());
        output.field("Theme", &config.highlight.theme);
        let live_reload = if config.live_reload.enabled {
            "enabled"
        } else {
            "disabled"
        };
        output.field("Live reload", &live_reload);
        if !content_dir.join("docs").is_dir() {
            output.warning("No docs/ directory found, documentation pages will be empty");
        }

        let server_config = server_config_from_config(&config);
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// Resolve `live_reload_enabled` from --live-reload/--no-live-reload flags.
    fn resolve_live_reload_enabled(&self) -> Option<bool> {
        self.no_live_reload.then_some(false).or(self.live_reload)
    }
}
