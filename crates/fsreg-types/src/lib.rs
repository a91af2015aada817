//! fsreg-types: pure data types shared across fsreg crates.
//!
//! This crate has no runtime dependencies beyond serde and url. It holds:
//!
//! - **Settings**: the frozen connection property set handed to every handle
//! - **RemoteUri**: a parsed `hdfs://host:port/path` connection target
//!
//! Everything that does I/O (handles, factories, the registry) lives in
//! `fsreg-core`.

pub mod settings;
pub mod uri;

pub use settings::{keys, Settings, SettingsError, DEFAULT_BUFFER_SIZE, OFFLINE_REPLICATION};
pub use uri::{is_remote_uri, RemoteUri, UriError, DEFAULT_NAMENODE_PORT, REMOTE_SCHEME_PREFIX};
