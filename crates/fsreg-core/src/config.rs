//! Where the registry's configuration comes from.
//!
//! The registry never reads files. It asks a [`ConfigProvider`] for everything:
//! per-identifier backend URIs and directory overrides, the property overrides
//! merged into the connection settings, and the global mode flags.
//!
//! [`StaticConfig`] is an in-memory provider. It derives serde so an embedding
//! application can deserialize it from whatever source it already uses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::paths;

/// Maximum file size used when neither the identifier nor the config sets one.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 128 * 1024 * 1024;

/// Supplies storage configuration to the registry.
pub trait ConfigProvider: Send + Sync {
    /// Maximum size of a single stored file for `id`, in bytes.
    fn hdfs_file_max_size(&self, id: &str) -> u64;

    /// Backend URI for `id`. `None` (or a non-`hdfs:` URI) means local disk.
    fn hdfs_server_uri(&self, id: &str) -> Option<String>;

    /// Directory override for `id`. `None` means the identifier itself is used.
    fn hdfs_base_dir(&self, id: &str) -> Option<String>;

    /// Root directory for local-disk storage named `name`.
    fn hdfs_local_base_dir(&self, name: &str) -> String;

    /// Property overrides merged into the remote connection settings.
    fn hdfs_properties(&self) -> BTreeMap<String, String>;

    /// Whether remote filesystems are enabled at all.
    fn is_hdfs_on(&self) -> bool;

    /// Whether the process runs in local-only mode.
    fn is_local_mode(&self) -> bool;

    /// Whether the process runs offline (relaxed durability).
    fn is_offline(&self) -> bool;
}

/// Per-identifier storage entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub server_uri: Option<String>,
    pub base_dir: Option<String>,
    pub max_file_size: Option<u64>,
}

impl StorageConfig {
    /// An entry that stores on local disk.
    pub fn local() -> Self {
        Self::default()
    }

    /// An entry that stores on the remote backend at `uri`.
    pub fn remote(uri: impl Into<String>) -> Self {
        Self {
            server_uri: Some(uri.into()),
            ..Self::default()
        }
    }

    pub fn with_base_dir(mut self, dir: impl Into<String>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = Some(size);
        self
    }
}

/// In-memory [`ConfigProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    pub hdfs_on: bool,
    pub local_mode: bool,
    pub offline: bool,
    pub local_base_dir: String,
    /// Named local base dirs. Separate from `storages`, so an identifier
    /// never shadows a base-dir name.
    pub local_base_dirs: BTreeMap<String, String>,
    pub default_max_file_size: u64,
    pub properties: BTreeMap<String, String>,
    pub storages: BTreeMap<String, StorageConfig>,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            hdfs_on: false,
            local_mode: false,
            offline: false,
            local_base_dir: paths::default_local_base_dir()
                .to_string_lossy()
                .into_owned(),
            local_base_dirs: BTreeMap::new(),
            default_max_file_size: DEFAULT_MAX_FILE_SIZE,
            properties: BTreeMap::new(),
            storages: BTreeMap::new(),
        }
    }
}

impl StaticConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hdfs(mut self, on: bool) -> Self {
        self.hdfs_on = on;
        self
    }

    pub fn with_local_mode(mut self, local_mode: bool) -> Self {
        self.local_mode = local_mode;
        self
    }

    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn with_local_base_dir(mut self, dir: impl Into<String>) -> Self {
        self.local_base_dir = dir.into();
        self
    }

    /// Local base dir answered for `name` instead of the global one.
    pub fn with_local_base_dir_for(
        mut self,
        name: impl Into<String>,
        dir: impl Into<String>,
    ) -> Self {
        self.local_base_dirs.insert(name.into(), dir.into());
        self
    }

    pub fn with_default_max_file_size(mut self, size: u64) -> Self {
        self.default_max_file_size = size;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_storage(mut self, id: impl Into<String>, storage: StorageConfig) -> Self {
        self.storages.insert(id.into(), storage);
        self
    }

    fn storage(&self, id: &str) -> Option<&StorageConfig> {
        self.storages.get(id)
    }
}

impl ConfigProvider for StaticConfig {
    fn hdfs_file_max_size(&self, id: &str) -> u64 {
        self.storage(id)
            .and_then(|s| s.max_file_size)
            .unwrap_or(self.default_max_file_size)
    }

    fn hdfs_server_uri(&self, id: &str) -> Option<String> {
        self.storage(id).and_then(|s| s.server_uri.clone())
    }

    fn hdfs_base_dir(&self, id: &str) -> Option<String> {
        self.storage(id).and_then(|s| s.base_dir.clone())
    }

    fn hdfs_local_base_dir(&self, name: &str) -> String {
        self.local_base_dirs
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.local_base_dir.clone())
    }

    fn hdfs_properties(&self) -> BTreeMap<String, String> {
        self.properties.clone()
    }

    fn is_hdfs_on(&self) -> bool {
        self.hdfs_on
    }

    fn is_local_mode(&self) -> bool {
        self.local_mode
    }

    fn is_offline(&self) -> bool {
        self.offline
    }
}
