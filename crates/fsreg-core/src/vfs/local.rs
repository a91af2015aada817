//! Local disk backend.

use std::path::{Component, Path, PathBuf};

use fsreg_types::Settings;

use super::traits::{BackendKind, Filesystem};

/// Local filesystem handle.
///
/// Paths are taken relative to `root`. With the default root of `/` this is
/// the host filesystem as-is; a narrower root confines every path under it.
#[derive(Debug, Clone)]
pub struct LocalFs {
    root: PathBuf,
    settings: Settings,
}

impl LocalFs {
    /// Create a handle over the whole host filesystem.
    pub fn new(settings: Settings) -> Self {
        Self::with_root("/", settings)
    }

    /// Create a handle rooted at `root`.
    pub fn with_root(root: impl Into<PathBuf>, settings: Settings) -> Self {
        Self {
            root: root.into(),
            settings,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `path` under the root, dropping `.` and `..` so nothing escapes it.
    fn resolve(&self, path: &str) -> PathBuf {
        let mut resolved = self.root.clone();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(c) => resolved.push(c),
                Component::ParentDir => {
                    if resolved != self.root {
                        resolved.pop();
                    }
                }
                Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
            }
        }
        resolved
    }
}

impl Filesystem for LocalFs {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn scheme(&self) -> &str {
        "file"
    }

    fn uri(&self) -> String {
        format!("file://{}", self.root.display())
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn qualify(&self, path: &str) -> String {
        format!("file://{}", self.resolve(path).display())
    }

    fn real_path(&self, path: &str) -> Option<PathBuf> {
        Some(self.resolve(path))
    }
}
