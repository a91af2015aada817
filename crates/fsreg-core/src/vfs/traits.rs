//! Core handle trait.

use std::fmt;
use std::path::PathBuf;

use fsreg_types::Settings;

/// Which kind of backend a handle is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Local,
    Remote,
}

/// A live filesystem handle.
///
/// Handles are shared read-only between every caller that resolves the same
/// identifier, so implementations must be `Send + Sync`.
pub trait Filesystem: Send + Sync + fmt::Debug {
    /// Backend kind.
    fn kind(&self) -> BackendKind;

    /// URI scheme (`file`, `hdfs`).
    fn scheme(&self) -> &str;

    /// URI of the filesystem root this handle is bound to.
    fn uri(&self) -> String;

    /// Settings the handle was opened with.
    fn settings(&self) -> &Settings;

    /// Fully qualify `path` against this filesystem.
    ///
    /// For example, a local handle qualifies `/data/cat/logs` to
    /// `file:///data/cat/logs`, and a remote handle bound to
    /// `hdfs://nn:9000/user/cat` qualifies `search` to
    /// `hdfs://nn:9000/user/cat/search`.
    fn qualify(&self, path: &str) -> String;

    fn is_remote(&self) -> bool {
        self.kind() == BackendKind::Remote
    }

    /// Get the real on-disk path for `path`.
    ///
    /// Returns `Some(path)` for backends backed by the local filesystem, `None`
    /// for remote ones.
    fn real_path(&self, path: &str) -> Option<PathBuf> {
        let _ = path;
        None
    }
}
