use std::{io, str::Utf8Error};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Out of memory: could not allocate {0} bytes")]
    AllocationFailed(usize),
    #[error("Could not open {resource}: {source}")]
    ResourceOpenFailed {
        resource: String,
        #[source]
        source: io::Error,
    },
    #[error("Line too long: more than {max_line_length} bytes")]
    LineTooLong { max_line_length: usize },
    #[error("Missing '=' in line")]
    MissingDelimiter,
    #[error("Missing name in line")]
    EmptyName,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Parsing error")]
    Parse,
    #[error("Invalid value for {name}: {source}")]
    InvalidValue {
        name: String,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<Utf8Error> for ConfigError {
    fn from(_: Utf8Error) -> Self {
        Self::Parse
    }
}

/// Why a [`Reader`](crate::Reader) stopped producing settings.
///
/// Once a reader is exhausted the reason never changes until it is
/// closed, so callers can tell a clean end of file from malformed input
/// after `next_setting` has returned `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream,
    LineTooLong,
    MissingDelimiter,
    EmptyName,
    ReadFailed(io::ErrorKind),
    Closed,
}

impl StopReason {
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::EndOfStream | Self::Closed)
    }
}

impl From<&ConfigError> for StopReason {
    fn from(error: &ConfigError) -> Self {
        match error {
            ConfigError::LineTooLong { .. } => Self::LineTooLong,
            ConfigError::MissingDelimiter => Self::MissingDelimiter,
            ConfigError::EmptyName => Self::EmptyName,
            ConfigError::Io(e) => Self::ReadFailed(e.kind()),
            _ => Self::ReadFailed(io::ErrorKind::Other),
        }
    }
}
