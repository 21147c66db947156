// ── Snapshot store ──
//
// The single writable snapshot slot, the coordinator's update status and
// the registered listener callbacks.

mod event;
mod snapshot_store;

pub use event::{CoordinatorEvent, UpdateStatus};
pub use snapshot_store::{ListenerId, SnapshotStore};
