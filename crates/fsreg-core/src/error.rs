//! Error types for handle creation and registry lifecycle.

use std::io;
use std::sync::Arc;

use fsreg_types::UriError;
use thiserror::Error;

/// Failure to open a filesystem handle.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error(transparent)]
    InvalidUri(#[from] UriError),

    #[error("namenode {addr} unreachable: {source}")]
    Unreachable {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Escape hatch for third-party factories.
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("filesystem registry is not initialized")]
    NotInitialized,

    #[error("filesystem registry is already initialized")]
    AlreadyInitialized,

    /// Every caller that waited on the same failed attempt shares `source`.
    #[error("failed to open filesystem for {id:?}: {source}")]
    Connect {
        id: String,
        #[source]
        source: Arc<ConnectError>,
    },
}

impl RegistryError {
    /// The underlying connection error, if this is one.
    pub fn connect_error(&self) -> Option<&ConnectError> {
        match self {
            Self::Connect { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
