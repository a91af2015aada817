//! Remote backend URIs.
//!
//! A backend URI is remote when it starts with `hdfs:`. Anything else, including
//! no URI at all, selects the local disk.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

/// Prefix that marks a URI as a remote (HDFS) backend.
pub const REMOTE_SCHEME_PREFIX: &str = "hdfs:";

/// Namenode RPC port used when the URI carries none.
pub const DEFAULT_NAMENODE_PORT: u16 = 8020;

/// Returns true when `uri` denotes a remote backend.
pub fn is_remote_uri(uri: &str) -> bool {
    uri.starts_with(REMOTE_SCHEME_PREFIX)
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UriError {
    #[error("invalid URI {uri:?}: {source}")]
    Parse {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    #[error("URI {uri:?} is not an hdfs URI")]
    Scheme { uri: String },

    #[error("URI {uri:?} has no namenode host")]
    MissingHost { uri: String },
}

/// A parsed `hdfs://host[:port]/path` connection target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUri {
    url: Url,
}

impl RemoteUri {
    pub fn parse(uri: &str) -> Result<Self, UriError> {
        if !is_remote_uri(uri) {
            return Err(UriError::Scheme {
                uri: uri.to_string(),
            });
        }

        let url = Url::parse(uri).map_err(|source| UriError::Parse {
            uri: uri.to_string(),
            source,
        })?;

        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(Self { url }),
            _ => Err(UriError::MissingHost {
                uri: uri.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn host(&self) -> &str {
        // Checked non-empty in `parse`.
        self.url.host_str().unwrap_or_default()
    }

    /// Explicit port, if the URI carries one.
    pub fn port(&self) -> Option<u16> {
        self.url.port()
    }

    pub fn port_or_default(&self) -> u16 {
        self.port().unwrap_or(DEFAULT_NAMENODE_PORT)
    }

    /// `host:port` of the namenode.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host(), self.port_or_default())
    }

    /// Path component, `/` when the URI has none.
    pub fn path(&self) -> &str {
        match self.url.path() {
            "" => "/",
            p => p,
        }
    }

    /// `scheme://host[:port]` with no path.
    pub fn root(&self) -> String {
        match self.port() {
            Some(port) => format!("{}://{}:{}", self.scheme(), self.host(), port),
            None => format!("{}://{}", self.scheme(), self.host()),
        }
    }

    /// Qualify `path` against this URI.
    ///
    /// Absolute paths are taken from the filesystem root; relative paths are
    /// resolved under the URI's path.
    pub fn join(&self, path: &str) -> String {
        let full = if path.starts_with('/') {
            path.to_string()
        } else {
            let base = self.path().trim_end_matches('/');
            format!("{}/{}", base, path)
        };
        format!("{}{}", self.root(), full)
    }
}

impl FromStr for RemoteUri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RemoteUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
