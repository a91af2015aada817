//! Default on-disk locations.
//!
//! | Purpose | XDG Variable | Default | fsreg Path |
//! |---------|--------------|---------|------------|
//! | Data | `$XDG_DATA_HOME` | `~/.local/share` | `$XDG_DATA_HOME/fsreg` |
//! | Local buckets | `$XDG_DATA_HOME` | `~/.local/share` | `$XDG_DATA_HOME/fsreg/bucket` |

use std::path::PathBuf;

use directories::BaseDirs;

/// Get the data directory.
///
/// Uses `$XDG_DATA_HOME/fsreg` or falls back to `~/.local/share/fsreg`.
pub fn data_dir() -> PathBuf {
    BaseDirs::new()
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| home_fallback().join(".local").join("share"))
        .join("fsreg")
}

/// Default base directory for identifiers stored on local disk.
pub fn default_local_base_dir() -> PathBuf {
    data_dir().join("bucket")
}

fn home_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}
