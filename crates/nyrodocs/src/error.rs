//! CLI error types.

use nyro_config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("server stopped: {0}")]
    Server(String),

    #[error("check found {0} errors")]
    Check(usize),
}
