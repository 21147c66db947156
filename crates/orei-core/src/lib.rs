//! Polling coordinator between `orei-api` and presentation layers.
//!
//! This crate owns the normalized state model and the reconciliation
//! engine for an OREI HDMI matrix:
//!
//! - **[`Coordinator`]**: One per configured device.
//!   [`connect()`](Coordinator::connect) validates connectivity, fetches the
//!   first snapshot, then spawns the periodic refresh task.
//!   [`set_route()`](Coordinator::set_route) and
//!   [`set_power()`](Coordinator::set_power) drive the device and feed the
//!   result back into the snapshot.
//!
//! - **[`Snapshot`]**: Immutable, atomically published device state built
//!   from three irregular payloads (parallel arrays, sentinel-terminated
//!   routing list, duplicated HDMI/HDBaseT flags).
//!
//! - **[`SnapshotStore`]**: The single writable snapshot slot
//!   (`tokio::sync::watch`) plus registered listener callbacks.
//!
//! - **[`SnapshotStream`]**: Subscription handle exposing
//!   `current()` / `latest()` / `changed()` and a `Stream` adapter.

pub mod command;
pub mod config;
pub mod convert;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, resolve_source};
pub use config::MatrixConfig;
pub use coordinator::Coordinator;
pub use error::CoreError;
pub use model::{DeviceInfo, PortLayout, RawPayloads, Snapshot};
pub use store::{CoordinatorEvent, ListenerId, SnapshotStore, UpdateStatus};
pub use stream::SnapshotStream;
