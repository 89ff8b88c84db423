use thiserror::Error;

use crate::validation::ConfigReport;

/// Failure to produce a usable configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config: {0}")]
    Read(#[from] config::ConfigError),

    #[error("invalid config:\n{0}")]
    Invalid(ConfigReport),
}
