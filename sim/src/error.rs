use std::path::PathBuf;

use kinematic::ConfigError;
use thiserror::Error;

/// Errors that can occur while loading or building a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("tick rate must be positive")]
    TickRate,

    #[error("duration must be finite and non-negative, got {0}")]
    Duration(f32),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
