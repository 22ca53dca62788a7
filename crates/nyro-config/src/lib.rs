//! Configuration for the NyroDB documentation site.
//!
//! Settings live in `nyro.toml`, found in the working directory or the
//! nearest parent that has one. Every section and field is optional:
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [content]
//! source_dir = "public"      # relative to nyro.toml
//! changelog = "CHANGELOG.md" # relative to source_dir
//!
//! [site]
//! name = "NyroDB"
//! version = "v1.0.0"
//! repository_url = "https://github.com/TheRemyyy/nyro-db"
//!
//! [live_reload]
//! enabled = true
//! watch_patterns = ["**/*.md"]
//!
//! [highlight]
//! theme = "base16-ocean.dark"
//! ```
//!
//! Precedence is [`CliSettings`], then the file, then these defaults.
//!
//! ## Environment Variable Expansion
//!
//! `server.host` and `site.repository_url` accept `${VAR}` (an error when
//! unset) and `${VAR:-default}`.

mod expand;

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "nyro.toml";

/// Default highlight theme (must exist in syntect's bundled theme set).
const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Values from the command line that win over the file.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Content root, used as given (not relative to the config file).
    pub source_dir: Option<PathBuf>,
    pub live_reload_enabled: Option<bool>,
}

impl CliSettings {
    fn apply_to(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(source_dir) = &self.source_dir {
            config.content.source_dir.clone_from(source_dir);
        }
        if let Some(enabled) = self.live_reload_enabled {
            config.live_reload.enabled = enabled;
        }
    }
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub content: ContentConfig,
    pub site: SiteConfig,
    pub live_reload: LiveReloadConfig,
    pub highlight: HighlightConfig,

    /// File the configuration was read from, if any.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

/// Where the site's markdown lives.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Content root holding `docs/` and the changelog. Absolute once loaded.
    pub source_dir: PathBuf,
    /// Changelog file, relative to `source_dir`.
    pub changelog: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("public"),
            changelog: PathBuf::from("CHANGELOG.md"),
        }
    }
}

/// Branding shown in the header, footer and page titles.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    /// Version label in the header.
    pub version: String,
    /// Source repository link. Empty hides it.
    pub repository_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "NyroDB".to_owned(),
            version: "v1.0.0".to_owned(),
            repository_url: "https://github.com/TheRemyyy/nyro-db".to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LiveReloadConfig {
    pub enabled: bool,
    /// Glob patterns, relative to the content root, that trigger a reload.
    /// `None` watches everything.
    pub watch_patterns: Option<Vec<String>>,
}

impl Default for LiveReloadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            watch_patterns: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme the highlight stylesheet is generated from.
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_owned(),
        }
    }
}

/// Why `nyro.toml` could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An explicitly given config file does not exist.
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Validation(String),
    /// `${VAR}` reference to an unset variable.
    #[error("{field}: {message}")]
    EnvVar {
        /// Dotted field path, e.g. `server.host`.
        field: String,
        message: String,
    },
}

impl Config {
    /// Load `config_path`, or the discovered `nyro.toml`, or the defaults.
    ///
    /// Without a file, paths are relative to the working directory.
    /// `cli_settings` are applied last.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` is missing, or the file
    /// cannot be read, parsed, expanded or validated.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => discover(&std::env::current_dir()?),
        };

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::rooted_at(&std::env::current_dir()?),
        };
        if let Some(settings) = cli_settings {
            settings.apply_to(&mut config);
        }
        Ok(config)
    }

    /// Defaults with the content root under `base`.
    fn rooted_at(base: &Path) -> Self {
        let mut config = Self::default();
        config.content.source_dir = base.join(&config.content.source_dir);
        config
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&text)?;

        config.server.host = expand::expand_env(&config.server.host, "server.host")?;
        config.site.repository_url =
            expand::expand_env(&config.site.repository_url, "site.repository_url")?;

        let base = path.parent().unwrap_or(Path::new("."));
        config.content.source_dir = base.join(&config.content.source_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;
        Ok(config)
    }

    /// Check values that parse fine but cannot work.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.first_problem() {
            Some((field, problem)) => Err(ConfigError::Validation(format!("{field} {problem}"))),
            None => Ok(()),
        }
    }

    fn first_problem(&self) -> Option<(&'static str, &'static str)> {
        let url = &self.site.repository_url;
        let changelog = &self.content.changelog;
        [
            (self.server.host.is_empty(), "server.host", "cannot be empty"),
            // Port 0 asks the OS for any free port
            (self.server.port == 0, "server.port", "cannot be 0"),
            (
                changelog.as_os_str().is_empty(),
                "content.changelog",
                "cannot be empty",
            ),
            (
                !is_contained(changelog),
                "content.changelog",
                "must be a relative path inside the content directory",
            ),
            (self.site.name.is_empty(), "site.name", "cannot be empty"),
            (
                !url.is_empty() && !url.starts_with("https://") && !url.starts_with("http://"),
                "site.repository_url",
                "must start with http:// or https://",
            ),
            (
                self.highlight.theme.is_empty(),
                "highlight.theme",
                "cannot be empty",
            ),
        ]
        .into_iter()
        .find_map(|(failed, field, problem)| failed.then_some((field, problem)))
    }
}

/// Nearest `nyro.toml` in `start` or one of its ancestors.
fn discover(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
}

/// Whether `path` stays inside the directory it is relative to.
fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
