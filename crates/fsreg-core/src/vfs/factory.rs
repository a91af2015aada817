//! Opening handles.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use fsreg_types::{RemoteUri, Settings};
use tokio::net::TcpStream;

use super::local::LocalFs;
use super::remote::RemoteFs;
use super::traits::Filesystem;
use crate::error::ConnectError;

/// Opens filesystem handles for the registry.
///
/// The registry calls each method at most once per identifier; errors are
/// returned to the caller of `resolve` untouched.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    /// Open a handle on the local disk.
    async fn get_local(&self, settings: &Settings) -> Result<Arc<dyn Filesystem>, ConnectError>;

    /// Open a handle on the remote filesystem at `uri`.
    async fn get(
        &self,
        uri: &RemoteUri,
        settings: &Settings,
    ) -> Result<Arc<dyn Filesystem>, ConnectError>;
}

/// Factory for [`LocalFs`] and [`RemoteFs`] handles.
///
/// Remote handles are only returned once the namenode accepts a TCP
/// connection, so a wrong host or a down cluster surfaces at `resolve` time.
#[derive(Debug, Clone, Default)]
pub struct DefaultClientFactory {
    local_root: Option<PathBuf>,
}

impl DefaultClientFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root local handles at `root` instead of `/`.
    pub fn with_local_root(root: impl Into<PathBuf>) -> Self {
        Self {
            local_root: Some(root.into()),
        }
    }
}

#[async_trait]
impl ClientFactory for DefaultClientFactory {
    async fn get_local(&self, settings: &Settings) -> Result<Arc<dyn Filesystem>, ConnectError> {
        let fs = match &self.local_root {
            Some(root) => {
                let meta = tokio::fs::metadata(root).await?;
                if !meta.is_dir() {
                    return Err(ConnectError::Io(std::io::Error::new(
                        std::io::ErrorKind::NotADirectory,
                        format!("local root is not a directory: {}", root.display()),
                    )));
                }
                LocalFs::with_root(root.clone(), settings.clone())
            }
            None => LocalFs::new(settings.clone()),
        };
        Ok(Arc::new(fs))
    }

    async fn get(
        &self,
        uri: &RemoteUri,
        settings: &Settings,
    ) -> Result<Arc<dyn Filesystem>, ConnectError> {
        let addr = uri.authority();
        let stream = TcpStream::connect(&addr)
            .await
            .map_err(|source| ConnectError::Unreachable {
                addr: addr.clone(),
                source,
            })?;
        let namenode = stream.peer_addr()?;
        tracing::debug!(%addr, %namenode, "namenode reachable");

        Ok(Arc::new(RemoteFs::new(uri.clone(), namenode, settings.clone())))
    }
}
