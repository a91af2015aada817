//! The filesystem registry.
//!
//! Maps logical storage identifiers to filesystem handles. Each identifier gets
//! at most one handle for the lifetime of the registry; it is opened on first
//! `resolve` and shared by every later caller.
//!
//! # Lifecycle
//!
//! ```text
//! new() ──► UNINITIALIZED ──initialize()──► INITIALIZED
//!                                            │
//!                  per identifier:  NO-HANDLE ──resolve()──► HANDLE-CACHED
//! ```
//!
//! # Concurrency
//!
//! The handle map is guarded by a `std::sync::Mutex` that is only held long
//! enough to fetch the identifier's slot. A slot is empty, opening, or ready.
//! The first caller starts a shared open attempt; concurrent callers for the
//! same identifier await that same attempt and get its result, success or
//! error. A failed attempt leaves the slot empty again. Opening a handle for
//! one identifier never blocks callers resolving another.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use fsreg_types::{is_remote_uri, RemoteUri, Settings, SettingsError};
use futures::future::{BoxFuture, FutureExt, Shared};

use crate::config::ConfigProvider;
use crate::error::{ConnectError, RegistryError};
use crate::vfs::{ClientFactory, Filesystem};

/// Name passed to the provider when asking for the local base dir.
const LOCAL_BASE_DIR_NAME: &str = "hdfs";

type OpenResult = Result<Arc<dyn Filesystem>, Arc<ConnectError>>;
type Attempt = Shared<BoxFuture<'static, OpenResult>>;
type Slot = Arc<Mutex<SlotState>>;

#[derive(Default)]
enum SlotState {
    #[default]
    Empty,
    Opening(Attempt),
    Ready(Arc<dyn Filesystem>),
}

fn lock_slot(slot: &Slot) -> MutexGuard<'_, SlotState> {
    // Slot updates are single assignments, so a poisoned lock still holds a valid state.
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

fn is_ready(slot: &Slot) -> bool {
    matches!(*lock_slot(slot), SlotState::Ready(_))
}

/// How the connection settings were built during `initialize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsMode {
    /// Remote mode enabled; settings merged from baseline and overrides.
    Remote,
    /// Remote mode disabled or local-only; settings are empty.
    LocalOnly,
    /// Remote mode enabled but the settings could not be built; they are empty.
    Degraded(SettingsError),
}

/// Outcome of a successful `initialize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub mode: SettingsMode,
    pub default_base_dir: String,
}

impl InitReport {
    pub fn is_degraded(&self) -> bool {
        matches!(self.mode, SettingsMode::Degraded(_))
    }
}

/// A resolved identifier: its handle and base path.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub handle: Arc<dyn Filesystem>,
    pub base_path: String,
}

impl Resolved {
    /// The base path qualified against the handle, e.g. `file:///data/cat/logs`.
    pub fn qualified_base_path(&self) -> String {
        self.handle.qualify(&self.base_path)
    }
}

/// State published once by `initialize`.
#[derive(Debug)]
struct Initialized {
    default_base_dir: String,
    settings: Settings,
    remote_available: bool,
}

/// Registry of filesystem handles keyed by identifier.
pub struct FilesystemRegistry {
    config: Arc<dyn ConfigProvider>,
    factory: Arc<dyn ClientFactory>,
    state: OnceLock<Initialized>,
    init_lock: Mutex<()>,
    handles: Mutex<HashMap<String, Slot>>,
}

impl FilesystemRegistry {
    /// Create an uninitialized registry.
    pub fn new(config: Arc<dyn ConfigProvider>, factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            config,
            factory,
            state: OnceLock::new(),
            init_lock: Mutex::new(()),
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Build the connection settings and mark the registry ready.
    ///
    /// When remote mode is on and the process is not local-only, the settings
    /// are the baseline merged with the provider's overrides. A failure to build
    /// them is logged and the registry continues with empty settings; the
    /// returned report says so.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyInitialized`] on every call after the first.
    pub fn initialize(&self) -> Result<InitReport, RegistryError> {
        // Held until the state is published so the provider is read once.
        let _init = self.init_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.state.get().is_some() {
            return Err(RegistryError::AlreadyInitialized);
        }

        let default_base_dir = self.config.hdfs_local_base_dir(LOCAL_BASE_DIR_NAME);
        let remote_available = self.config.is_hdfs_on() && !self.config.is_local_mode();

        let (settings, mode) = if remote_available {
            match Settings::merged(self.config.is_offline(), self.config.hdfs_properties()) {
                Ok(settings) => (settings, SettingsMode::Remote),
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "failed to build filesystem settings, continuing with defaults"
                    );
                    (Settings::new(), SettingsMode::Degraded(e))
                }
            }
        } else {
            (Settings::new(), SettingsMode::LocalOnly)
        };

        let state = Initialized {
            default_base_dir: default_base_dir.clone(),
            settings,
            remote_available,
        };
        self.state
            .set(state)
            .map_err(|_| RegistryError::AlreadyInitialized)?;

        tracing::info!(
            mode = ?mode,
            default_base_dir = %default_base_dir,
            remote_available,
            "filesystem registry initialized"
        );

        Ok(InitReport {
            mode,
            default_base_dir,
        })
    }

    /// Resolve `id` to its handle and base path.
    ///
    /// Identifiers with an `hdfs:` URI get a remote handle and a base path of
    /// the directory override (or the identifier). All others get a local
    /// handle and a base path under the default base dir.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotInitialized`] before `initialize`, and
    /// [`RegistryError::Connect`] when the handle cannot be opened. Failures
    /// are not cached; the next call tries again.
    pub async fn resolve(&self, id: &str) -> Result<Resolved, RegistryError> {
        let state = self.state.get().ok_or(RegistryError::NotInitialized)?;

        let server_uri = self.config.hdfs_server_uri(id);
        let base_dir = self.config.hdfs_base_dir(id);
        let dir = base_dir.as_deref().unwrap_or(id);

        let remote = server_uri.as_deref().filter(|uri| is_remote_uri(uri));
        let handle = self.handle_for(id, remote, &state.settings).await?;

        // Only local paths get the default base dir prefix.
        let base_path = match remote {
            Some(_) => dir.to_string(),
            None => format!("{}/{}", state.default_base_dir, dir),
        };

        Ok(Resolved { handle, base_path })
    }

    /// Configured maximum file size for `id`.
    pub fn max_file_size(&self, id: &str) -> u64 {
        self.config.hdfs_file_max_size(id)
    }

    pub fn is_initialized(&self) -> bool {
        self.state.get().is_some()
    }

    /// Settings built by `initialize`, if it has run.
    pub fn settings(&self) -> Option<&Settings> {
        self.state.get().map(|s| &s.settings)
    }

    /// Whether remote mode was enabled at initialization.
    pub fn remote_available(&self) -> bool {
        self.state.get().is_some_and(|s| s.remote_available)
    }

    pub fn default_base_dir(&self) -> Option<&str> {
        self.state.get().map(|s| s.default_base_dir.as_str())
    }

    /// Identifiers that currently hold a handle, sorted.
    pub fn cached_ids(&self) -> Vec<String> {
        let handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<_> = handles
            .iter()
            .filter(|(_, slot)| is_ready(slot))
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Number of cached handles.
    pub fn len(&self) -> usize {
        let handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        handles.values().filter(|slot| is_ready(slot)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch or insert the slot for `id`. The map lock is released on return.
    fn slot(&self, id: &str) -> Slot {
        // The map is append-only, so a poisoned lock still guards valid data.
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(handles.entry(id.to_string()).or_default())
    }

    async fn handle_for(
        &self,
        id: &str,
        remote: Option<&str>,
        settings: &Settings,
    ) -> Result<Arc<dyn Filesystem>, RegistryError> {
        let slot = self.slot(id);

        let attempt = {
            let mut state = lock_slot(&slot);
            match &*state {
                SlotState::Ready(handle) => {
                    tracing::trace!(id, "filesystem cache hit");
                    return Ok(Arc::clone(handle));
                }
                SlotState::Opening(attempt) => {
                    tracing::trace!(id, "waiting on open in flight");
                    attempt.clone()
                }
                SlotState::Empty => {
                    let attempt = self.open(id, remote, settings).shared();
                    *state = SlotState::Opening(attempt.clone());
                    attempt
                }
            }
        };

        let result = attempt.clone().await;

        {
            // Only the first waiter to finish settles the slot; a newer attempt is left alone.
            let mut state = lock_slot(&slot);
            if matches!(&*state, SlotState::Opening(current) if current.ptr_eq(&attempt)) {
                *state = match &result {
                    Ok(handle) => SlotState::Ready(Arc::clone(handle)),
                    Err(_) => SlotState::Empty,
                };
            }
        }

        result.map_err(|source| RegistryError::Connect {
            id: id.to_string(),
            source,
        })
    }

    /// Start opening the handle for `id`. The returned future owns everything it needs.
    fn open(
        &self,
        id: &str,
        remote: Option<&str>,
        settings: &Settings,
    ) -> BoxFuture<'static, OpenResult> {
        let factory = Arc::clone(&self.factory);
        let id = id.to_string();
        let remote = remote.map(str::to_string);
        let settings = settings.clone();

        async move {
            let result = connect(factory.as_ref(), remote.as_deref(), &settings).await;

            match &result {
                Ok(handle) => {
                    tracing::debug!(id = %id, scheme = handle.scheme(), uri = %handle.uri(), "opened filesystem");
                }
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "failed to open filesystem");
                }
            }

            result.map_err(Arc::new)
        }
        .boxed()
    }
}

async fn connect(
    factory: &dyn ClientFactory,
    remote: Option<&str>,
    settings: &Settings,
) -> Result<Arc<dyn Filesystem>, ConnectError> {
    match remote {
        Some(raw) => {
            let uri = RemoteUri::parse(raw)?;
            factory.get(&uri, settings).await
        }
        None => factory.get_local(settings).await,
    }
}

impl fmt::Debug for FilesystemRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilesystemRegistry")
            .field("initialized", &self.is_initialized())
            .field("handles", &self.cached_ids())
            .finish()
    }
}
