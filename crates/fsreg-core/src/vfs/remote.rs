//! HDFS backend.

use std::net::SocketAddr;

use fsreg_types::{RemoteUri, Settings};

use super::traits::{BackendKind, Filesystem};

/// Handle bound to an HDFS cluster.
#[derive(Debug, Clone)]
pub struct RemoteFs {
    uri: RemoteUri,
    namenode: SocketAddr,
    settings: Settings,
}

impl RemoteFs {
    /// Create a handle for `uri` whose namenode answered at `namenode`.
    pub fn new(uri: RemoteUri, namenode: SocketAddr, settings: Settings) -> Self {
        Self {
            uri,
            namenode,
            settings,
        }
    }

    pub fn remote_uri(&self) -> &RemoteUri {
        &self.uri
    }

    /// Resolved namenode address.
    pub fn namenode(&self) -> SocketAddr {
        self.namenode
    }
}

impl Filesystem for RemoteFs {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    fn scheme(&self) -> &str {
        self.uri.scheme()
    }

    fn uri(&self) -> String {
        self.uri.to_string()
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn qualify(&self, path: &str) -> String {
        self.uri.join(path)
    }
}
