use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::Snapshot;

/// Outcome of the most recent refresh attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateStatus {
    /// `false` until the first successful refresh, and after any failure.
    pub last_update_success: bool,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl UpdateStatus {
    /// The published snapshot no longer reflects the device.
    pub fn is_stale(&self) -> bool {
        !self.last_update_success
    }
}

/// Delivered to listeners after every publication or failed refresh.
#[derive(Debug, Clone)]
pub enum CoordinatorEvent {
    /// A new snapshot is current (full refresh or optimistic patch).
    Updated(Arc<Snapshot>),
    /// A refresh failed; the previous snapshot is still current.
    UpdateFailed { error: String },
}
