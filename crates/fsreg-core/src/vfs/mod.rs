//! Filesystem handles and the factory that opens them.
//!
//! Two backends exist:
//!
//! - **LocalFs**: the host's local disk (`file://`)
//! - **RemoteFs**: an HDFS cluster reached through its namenode (`hdfs://`)
//!
//! Handles are opaque to the registry. It stores them as `Arc<dyn Filesystem>`
//! and hands the same `Arc` to every caller of an identifier.

mod factory;
mod local;
mod remote;
mod traits;

pub use factory::{ClientFactory, DefaultClientFactory};
pub use local::LocalFs;
pub use remote::RemoteFs;
pub use traits::{BackendKind, Filesystem};
