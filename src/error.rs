use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = LogError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum LogError {
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot format message: {0}")]
    Format(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl LogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LogError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(msg: impl Into<String>) -> Self {
        LogError::Format(msg.into())
    }
}

/// Errors raised while resolving a [`crate::LoggerConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("cannot read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unknown log level '{0}'")]
    InvalidLevel(String),
}
