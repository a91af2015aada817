//! Shared fakes for registry integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fsreg_core::{
    BackendKind, ClientFactory, ConfigProvider, ConnectError, Filesystem, RemoteUri, Settings,
    StaticConfig,
};
use tokio::sync::Barrier;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// A handle that remembers what it was opened for.
#[derive(Debug)]
pub struct FakeFs {
    pub kind: BackendKind,
    pub uri: String,
    pub settings: Settings,
    pub serial: usize,
}

impl Filesystem for FakeFs {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn scheme(&self) -> &str {
        match self.kind {
            BackendKind::Local => "file",
            BackendKind::Remote => "hdfs",
        }
    }

    fn uri(&self) -> String {
        self.uri.clone()
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn qualify(&self, path: &str) -> String {
        format!("{}/{}", self.uri.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

/// Factory that counts calls, can be told to fail, and can be slowed down or gated.
#[derive(Default)]
pub struct CountingFactory {
    pub local_calls: AtomicUsize,
    pub remote_calls: AtomicUsize,
    pub remote_uris: Mutex<Vec<String>>,
    pub fail_next: AtomicUsize,
    pub delay: Option<Duration>,
    pub gate: Option<Arc<Barrier>>,
}

impl CountingFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::default()
        })
    }

    /// Every open waits until `parties` opens are in flight at once.
    pub fn gated(parties: usize) -> Arc<Self> {
        Arc::new(Self {
            gate: Some(Arc::new(Barrier::new(parties))),
            ..Self::default()
        })
    }

    /// Make the next `n` calls fail.
    pub fn fail_times(&self, n: usize) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    pub fn local_calls(&self) -> usize {
        self.local_calls.load(Ordering::SeqCst)
    }

    pub fn remote_calls(&self) -> usize {
        self.remote_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.local_calls() + self.remote_calls()
    }

    async fn step(&self) -> Result<(), ConnectError> {
        if let Some(gate) = &self.gate {
            gate.wait().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let failed = self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            Err(ConnectError::Other("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ClientFactory for CountingFactory {
    async fn get_local(&self, settings: &Settings) -> Result<Arc<dyn Filesystem>, ConnectError> {
        let serial = self.local_calls.fetch_add(1, Ordering::SeqCst);
        self.step().await?;
        Ok(Arc::new(FakeFs {
            kind: BackendKind::Local,
            uri: "file:///".into(),
            settings: settings.clone(),
            serial,
        }))
    }

    async fn get(
        &self,
        uri: &RemoteUri,
        settings: &Settings,
    ) -> Result<Arc<dyn Filesystem>, ConnectError> {
        let serial = self.remote_calls.fetch_add(1, Ordering::SeqCst);
        self.remote_uris
            .lock()
            .unwrap()
            .push(uri.to_string());
        self.step().await?;
        Ok(Arc::new(FakeFs {
            kind: BackendKind::Remote,
            uri: uri.to_string(),
            settings: settings.clone(),
            serial,
        }))
    }
}

/// Provider wrapper that counts reads of the property overrides.
pub struct CountingConfig {
    pub inner: StaticConfig,
    pub property_reads: AtomicUsize,
}

impl CountingConfig {
    pub fn new(inner: StaticConfig) -> Arc<Self> {
        Arc::new(Self {
            inner,
            property_reads: AtomicUsize::new(0),
        })
    }

    pub fn property_reads(&self) -> usize {
        self.property_reads.load(Ordering::SeqCst)
    }
}

impl ConfigProvider for CountingConfig {
    fn hdfs_file_max_size(&self, id: &str) -> u64 {
        self.inner.hdfs_file_max_size(id)
    }

    fn hdfs_server_uri(&self, id: &str) -> Option<String> {
        self.inner.hdfs_server_uri(id)
    }

    fn hdfs_base_dir(&self, id: &str) -> Option<String> {
        self.inner.hdfs_base_dir(id)
    }

    fn hdfs_local_base_dir(&self, name: &str) -> String {
        self.inner.hdfs_local_base_dir(name)
    }

    fn hdfs_properties(&self) -> BTreeMap<String, String> {
        self.property_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.hdfs_properties()
    }

    fn is_hdfs_on(&self) -> bool {
        self.inner.is_hdfs_on()
    }

    fn is_local_mode(&self) -> bool {
        self.inner.is_local_mode()
    }

    fn is_offline(&self) -> bool {
        self.inner.is_offline()
    }
}

/// Provider whose server URI can be changed after the registry is built.
pub struct SwitchableConfig {
    pub inner: StaticConfig,
    pub server_uri: Mutex<Option<String>>,
}

impl SwitchableConfig {
    pub fn new(inner: StaticConfig) -> Arc<Self> {
        Arc::new(Self {
            inner,
            server_uri: Mutex::new(None),
        })
    }

    /// Answer `uri` for every identifier from now on.
    pub fn set_server_uri(&self, uri: &str) {
        *self.server_uri.lock().unwrap() = Some(uri.to_string());
    }
}

impl ConfigProvider for SwitchableConfig {
    fn hdfs_file_max_size(&self, id: &str) -> u64 {
        self.inner.hdfs_file_max_size(id)
    }

    fn hdfs_server_uri(&self, id: &str) -> Option<String> {
        self.server_uri
            .lock()
            .unwrap()
            .clone()
            .or_else(|| self.inner.hdfs_server_uri(id))
    }

    fn hdfs_base_dir(&self, id: &str) -> Option<String> {
        self.inner.hdfs_base_dir(id)
    }

    fn hdfs_local_base_dir(&self, name: &str) -> String {
        self.inner.hdfs_local_base_dir(name)
    }

    fn hdfs_properties(&self) -> BTreeMap<String, String> {
        self.inner.hdfs_properties()
    }

    fn is_hdfs_on(&self) -> bool {
        self.inner.is_hdfs_on()
    }

    fn is_local_mode(&self) -> bool {
        self.inner.is_local_mode()
    }

    fn is_offline(&self) -> bool {
        self.inner.is_offline()
    }
}

/// A tracing layer that records every event's level and message.
#[derive(Clone, Default)]
pub struct CaptureLayer {
    pub events: Arc<Mutex<Vec<(Level, String)>>>,
}

impl CaptureLayer {
    pub fn events(&self) -> Vec<(Level, String)> {
        self.events.lock().unwrap().clone()
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }
}
