//! fsreg-core: the filesystem-handle registry.
//!
//! This crate provides:
//!
//! - **ConfigProvider**: where backend URIs, base directories and global
//!   flags come from (`StaticConfig` is the in-memory implementation)
//! - **ClientFactory**: how handles get opened (`DefaultClientFactory` opens
//!   local disk and probes HDFS namenodes)
//! - **Filesystem**: the opaque handle shared by every caller of an identifier
//! - **FilesystemRegistry**: maps identifiers to handles, creating each one
//!   at most once, and computes base paths
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fsreg_core::{DefaultClientFactory, FilesystemRegistry, StaticConfig, StorageConfig};
//!
//! let config = StaticConfig::new()
//!     .with_local_base_dir("/data/cat")
//!     .with_storage("logs", StorageConfig::local().with_base_dir("applogs"));
//!
//! let registry = FilesystemRegistry::new(Arc::new(config), Arc::new(DefaultClientFactory::new()));
//! registry.initialize()?;
//!
//! let resolved = registry.resolve("logs").await?;
//! assert_eq!(resolved.base_path, "/data/cat/applogs");
//! ```

pub mod config;
pub mod error;
pub mod paths;
pub mod registry;
pub mod vfs;

pub use config::{ConfigProvider, StaticConfig, StorageConfig};
pub use error::{ConnectError, RegistryError};
pub use registry::{FilesystemRegistry, InitReport, Resolved, SettingsMode};
pub use vfs::{BackendKind, ClientFactory, DefaultClientFactory, Filesystem, LocalFs, RemoteFs};

pub use fsreg_types::{RemoteUri, Settings, SettingsError, UriError};
