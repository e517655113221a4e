//! Configuration error model.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type used when loading static configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Static configuration could not be loaded.
///
/// These errors are only produced at startup; a process that hits one must not
/// serve traffic.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for the expected schema.
    #[error("malformed {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The file parsed but violates a structural rule.
    #[error("invalid {what}: {reason}")]
    Invalid { what: &'static str, reason: String },
}

impl ConfigError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn parse(what: &'static str, source: serde_json::Error) -> Self {
        Self::Parse { what, source }
    }

    pub fn invalid(what: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            what,
            reason: reason.into(),
        }
    }
}

pub(crate) fn read_file(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
}
