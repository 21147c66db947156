use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::watch;
use tracing::debug;

use super::event::{CoordinatorEvent, UpdateStatus};
use crate::model::Snapshot;
use crate::stream::SnapshotStream;

type Listener = Arc<dyn Fn(&CoordinatorEvent) + Send + Sync>;

/// Handle returned by [`SnapshotStore::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Holder of the current snapshot.
///
/// Every write replaces the slot's value in one `watch` send, so readers
/// see either the previous snapshot or the new one and nothing in between.
/// Listeners run synchronously on the publishing task, in registration
/// order.
pub struct SnapshotStore {
    snapshot: watch::Sender<Option<Arc<Snapshot>>>,
    status: watch::Sender<UpdateStatus>,
    listeners: DashMap<ListenerId, Listener>,
    next_listener: AtomicU64,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(None);
        let (status, _) = watch::channel(UpdateStatus::default());

        Self {
            snapshot,
            status,
            listeners: DashMap::new(),
            next_listener: AtomicU64::new(1),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.snapshot.subscribe())
    }

    pub fn status(&self) -> UpdateStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<UpdateStatus> {
        self.status.subscribe()
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Replace the current snapshot with a freshly fetched one.
    pub fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        let fetched_at = snapshot.fetched_at;
        self.snapshot.send_replace(Some(Arc::clone(&snapshot)));
        self.status.send_replace(UpdateStatus {
            last_update_success: true,
            last_success_at: Some(fetched_at),
            last_error: None,
        });
        self.notify(&CoordinatorEvent::Updated(Arc::clone(&snapshot)));
        snapshot
    }

    /// Route `output` to `input` in whatever snapshot is current.
    ///
    /// Returns `None` (and publishes nothing) when no snapshot exists yet.
    pub fn patch_route(&self, output: u8, input: u8) -> Option<Arc<Snapshot>> {
        let mut patched = None;
        self.snapshot.send_if_modified(|slot| match slot {
            Some(current) => {
                let next = Arc::new(current.with_route(output, input));
                patched = Some(Arc::clone(&next));
                *slot = Some(next);
                true
            }
            None => false,
        });

        if let Some(ref snapshot) = patched {
            debug!(output, input, "optimistic route patch published");
            self.notify(&CoordinatorEvent::Updated(Arc::clone(snapshot)));
        }
        patched
    }

    /// Record a failed refresh. The current snapshot is left as is.
    pub fn mark_failed(&self, error: impl Into<String>) {
        let error = error.into();
        self.status.send_modify(|status| {
            status.last_update_success = false;
            status.last_error = Some(error.clone());
        });
        self.notify(&CoordinatorEvent::UpdateFailed { error });
    }

    // ── Listeners ────────────────────────────────────────────────────

    pub fn add_listener<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&CoordinatorEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.insert(id, Arc::new(callback));
        id
    }

    /// Returns `true` if the listener was registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&self, event: &CoordinatorEvent) {
        // Collect first so callbacks may add or remove listeners.
        let mut listeners: Vec<(ListenerId, Listener)> = self
            .listeners
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();
        listeners.sort_by_key(|(id, _)| *id);

        for (_, listener) in listeners {
            listener(event);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;
    use crate::model::{PortLayout, RawPayloads};

    fn snapshot(routing: &[(u8, u8)]) -> Snapshot {
        Snapshot {
            power: true,
            routing: routing.iter().copied().collect(),
            input_names: BTreeMap::new(),
            output_names: BTreeMap::new(),
            input_active: BTreeMap::new(),
            output_connected: BTreeMap::new(),
            layout: PortLayout::default(),
            fetched_at: Utc::now(),
            raw: RawPayloads::default(),
        }
    }

    #[test]
    fn publish_replaces_and_marks_success() {
        let store = SnapshotStore::new();
        assert!(store.current().is_none());
        assert!(store.status().is_stale());

        store.publish(snapshot(&[(1, 1)]));
        store.publish(snapshot(&[(2, 3)]));

        let current = store.current().unwrap();
        assert_eq!(current.routing, BTreeMap::from([(2, 3)]));
        assert!(store.status().last_update_success);
        assert!(store.status().last_success_at.is_some());
    }

    #[test]
    fn failure_keeps_previous_snapshot() {
        let store = SnapshotStore::new();
        store.publish(snapshot(&[(1, 2)]));
        store.mark_failed("timed out");

        assert_eq!(store.current().unwrap().routing, BTreeMap::from([(1, 2)]));
        let status = store.status();
        assert!(status.is_stale());
        assert_eq!(status.last_error.as_deref(), Some("timed out"));
        assert!(status.last_success_at.is_some());
    }

    #[test]
    fn patch_requires_existing_snapshot() {
        let store = SnapshotStore::new();
        assert!(store.patch_route(1, 2).is_none());
        assert!(store.current().is_none());

        store.publish(snapshot(&[(1, 1), (2, 2)]));
        let patched = store.patch_route(2, 4).unwrap();
        assert_eq!(patched.routing, BTreeMap::from([(1, 1), (2, 4)]));
        assert_eq!(store.current().unwrap().routing, patched.routing);
    }

    #[test]
    fn listeners_see_events_in_registration_order() {
        let store = SnapshotStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = {
            let seen = Arc::clone(&seen);
            store.add_listener(move |event| {
                let tag = match event {
                    CoordinatorEvent::Updated(_) => "a:updated",
                    CoordinatorEvent::UpdateFailed { .. } => "a:failed",
                };
                seen.lock().unwrap().push(tag);
            })
        };
        {
            let seen = Arc::clone(&seen);
            store.add_listener(move |_| seen.lock().unwrap().push("b"));
        }

        store.publish(snapshot(&[]));
        store.mark_failed("boom");
        assert!(store.remove_listener(first));
        assert!(!store.remove_listener(first));
        store.patch_route(1, 1);

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["a:updated", "b", "a:failed", "b", "b"]
        );
        assert_eq!(store.listener_count(), 1);
    }
}
