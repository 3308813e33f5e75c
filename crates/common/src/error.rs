use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("could not parse configuration {path}: {source}")]
    ConfigurationParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed board: {0}")]
    MalformedInput(String),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of [`Error`], for callers that only care about
/// which operation failed and why.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    MalformedInput,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) | Self::ConfigurationParse { .. } => ErrorKind::Configuration,
            Self::MalformedInput(_) => ErrorKind::MalformedInput,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
