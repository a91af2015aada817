//! Connection settings shared by every filesystem handle.
//!
//! `Settings` is an ordered string→string property map, the same shape HDFS
//! clients take. It is built once at registry initialization and never mutated
//! afterwards; handles receive a clone.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Well-known property keys.
pub mod keys {
    /// Read/write buffer size in bytes.
    pub const IO_FILE_BUFFER_SIZE: &str = "io.file.buffer.size";
    /// Block replication factor.
    pub const DFS_REPLICATION: &str = "dfs.replication";

    /// Keys whose values must parse as positive integers.
    pub const INTEGER_KEYS: &[&str] = &[IO_FILE_BUFFER_SIZE, DFS_REPLICATION];
}

/// Baseline buffer size applied before provider overrides.
pub const DEFAULT_BUFFER_SIZE: u64 = 8192;

/// Replication factor forced in offline mode.
pub const OFFLINE_REPLICATION: u64 = 1;

/// Errors raised while assembling settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("property override with value {value:?} has an empty key")]
    EmptyKey { value: String },

    #[error("property {key} must be a positive integer, got {value:?}")]
    InvalidInt { key: String, value: String },
}

/// Frozen set of connection properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    properties: BTreeMap<String, String>,
}

impl Settings {
    /// Create an empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the merged remote settings.
    ///
    /// Starts from the baseline (`io.file.buffer.size = 8192`, plus
    /// `dfs.replication = 1` when `offline`), then applies every override in
    /// order. Overrides win over the baseline.
    pub fn merged<I, K, V>(offline: bool, overrides: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut settings = Self::new();
        settings.set_int(keys::IO_FILE_BUFFER_SIZE, DEFAULT_BUFFER_SIZE);

        if offline {
            settings.set_int(keys::DFS_REPLICATION, OFFLINE_REPLICATION);
        }

        for (key, value) in overrides {
            let key = key.into();
            let value = value.into();
            if key.trim().is_empty() {
                return Err(SettingsError::EmptyKey { value });
            }
            settings.set(key, value);
        }

        for key in keys::INTEGER_KEYS {
            settings.get_int(key)?;
        }

        Ok(settings)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: u64) {
        self.set(key, value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Get a property, falling back to `default` when unset.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Get a property as a positive integer.
    ///
    /// Returns `Ok(None)` when unset and an error when the value is not a
    /// positive integer.
    pub fn get_int(&self, key: &str) -> Result<Option<u64>, SettingsError> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        match raw.trim().parse::<u64>() {
            Ok(n) if n > 0 => Ok(Some(n)),
            _ => Err(SettingsError::InvalidInt {
                key: key.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    /// Configured buffer size, if set and valid.
    pub fn buffer_size(&self) -> Option<u64> {
        self.get_int(keys::IO_FILE_BUFFER_SIZE).ok().flatten()
    }

    /// Configured replication factor, if set and valid.
    pub fn replication(&self) -> Option<u64> {
        self.get_int(keys::DFS_REPLICATION).ok().flatten()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterate properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn merged_baseline_online() {
        let settings = Settings::merged(false, Vec::<(String, String)>::new()).unwrap();
        assert_eq!(settings.buffer_size(), Some(8192));
        assert_eq!(settings.replication(), None);
        assert_eq!(settings.len(), 1);
    }

    #[test]
    fn merged_offline_sets_replication() {
        let settings = Settings::merged(true, Vec::<(String, String)>::new()).unwrap();
        assert_eq!(settings.replication(), Some(1));
    }

    #[test]
    fn overrides_win_over_baseline() {
        let settings = Settings::merged(
            true,
            [
                ("io.file.buffer.size", "65536"),
                ("dfs.replication", "3"),
                ("fs.defaultFS", "hdfs://nn:9000"),
            ],
        )
        .unwrap();

        assert_eq!(settings.buffer_size(), Some(65536));
        assert_eq!(settings.replication(), Some(3));
        assert_eq!(settings.get("fs.defaultFS"), Some("hdfs://nn:9000"));
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = Settings::merged(false, [("  ", "x")]).unwrap_err();
        assert_eq!(err, SettingsError::EmptyKey { value: "x".into() });
    }

    #[rstest]
    #[case::not_a_number("io.file.buffer.size", "big")]
    #[case::zero("dfs.replication", "0")]
    #[case::negative("dfs.replication", "-2")]
    fn bad_integer_overrides_fail(#[case] key: &str, #[case] value: &str) {
        let err = Settings::merged(false, [(key, value)]).unwrap_err();
        assert!(
            matches!(&err, SettingsError::InvalidInt { key: k, .. } if k == key),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn get_or_falls_back() {
        let mut settings = Settings::new();
        settings.set("a", "1");
        assert_eq!(settings.get_or("a", "z"), "1");
        assert_eq!(settings.get_or("b", "z"), "z");
    }

    #[test]
    fn iter_is_key_ordered() {
        let mut settings = Settings::new();
        settings.set("zeta", "1");
        settings.set("alpha", "2");
        let keys: Vec<_> = settings.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }

    #[test]
    fn serializes_as_flat_map() {
        let mut settings = Settings::new();
        settings.set_int(keys::DFS_REPLICATION, 2);
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(json, r#"{"dfs.replication":"2"}"#);
    }
}
