//! Domain-specific errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions that abort a build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("action '{action}' failed for {}: {message}", path.display())]
    ActionFailure {
        action: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("i/o error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn action(
        action: &'static str,
        path: impl Into<PathBuf>,
        message: impl std::fmt::Display,
    ) -> Self {
        Self::ActionFailure {
            action,
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type BuildResult<T> = Result<T, BuildError>;
