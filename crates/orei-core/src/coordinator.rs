// ── Coordinator ──
//
// Lifecycle, polling and command handling for one matrix. Owns the
// snapshot store, the periodic refresh task and any pending
// confirmation refreshes scheduled after route commands.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use orei_api::{MatrixClient, TransportConfig};

use crate::command::{Command, resolve_source};
use crate::config::MatrixConfig;
use crate::convert::build_snapshot;
use crate::error::CoreError;
use crate::model::{DeviceInfo, PortLayout, RawPayloads, Snapshot};
use crate::store::{CoordinatorEvent, ListenerId, SnapshotStore, UpdateStatus};
use crate::stream::SnapshotStream;

/// Handle to one polled matrix.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`; every clone drives the
/// same device, snapshot and background tasks.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    config: MatrixConfig,
    client: MatrixClient,
    store: SnapshotStore,
    device: watch::Sender<Option<Arc<DeviceInfo>>>,
    /// Held for the duration of a refresh so fetches never interleave.
    refresh_lock: Mutex<()>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
    /// Confirmation refreshes scheduled by route commands.
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl Coordinator {
    /// Create a coordinator. Does NOT contact the device; call
    /// [`connect()`](Self::connect) to validate it and start polling.
    pub fn new(config: MatrixConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let transport = TransportConfig::with_timeout(config.timeout);
        let client = MatrixClient::new(config.host.trim(), config.port, &transport)?;
        let (device, _) = watch::channel(None);

        Ok(Self {
            inner: Arc::new(CoordinatorInner {
                config,
                client,
                store: SnapshotStore::new(),
                device,
                refresh_lock: Mutex::new(()),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
                pending: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &MatrixConfig {
        &self.inner.config
    }

    pub fn layout(&self) -> PortLayout {
        self.inner.config.layout
    }

    pub fn client(&self) -> &MatrixClient {
        &self.inner.client
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.inner.store
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Validate the device, load the first snapshot and start polling.
    ///
    /// Fails with [`CoreError::CannotConnect`] when the device does not
    /// answer `get status`; a failed first refresh is returned as is.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let info = self.identify().await?;
        self.refresh().await?;

        let interval = self.inner.config.scan_interval;
        if !interval.is_zero() {
            let mut handles = self.inner.task_handles.lock().await;
            if handles.is_empty() {
                let coordinator = self.clone();
                let cancel = self.inner.cancel.clone();
                handles.push(tokio::spawn(refresh_task(coordinator, interval, cancel)));
            }
        }

        info!(host = %self.inner.config.host, model = info.model(), "connected to matrix");
        Ok(())
    }

    /// Query device identity with `get status`.
    pub async fn identify(&self) -> Result<Arc<DeviceInfo>, CoreError> {
        let status = self
            .inner
            .client
            .validate_connection()
            .await
            .map_err(CoreError::cannot_connect)?;

        let info = Arc::new(DeviceInfo::new(self.inner.config.host.trim(), status));
        self.inner.device.send_replace(Some(Arc::clone(&info)));
        Ok(info)
    }

    /// Cancel background tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        drop(handles);

        let mut pending = self.inner.pending.lock().await;
        for handle in pending.drain(..) {
            let _ = handle.await;
        }

        info!(host = %self.inner.config.host, "coordinator shut down");
    }

    /// Wait for every scheduled confirmation refresh to complete.
    pub async fn settle(&self) {
        let handles: Vec<_> = self.inner.pending.lock().await.drain(..).collect();
        for handle in handles {
            let _ = handle.await;
        }
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Fetch all three status payloads and publish a new snapshot.
    ///
    /// On failure nothing is published, the update status is marked
    /// failed, listeners receive [`CoordinatorEvent::UpdateFailed`] and
    /// the error is returned.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, CoreError> {
        let _guard = self.inner.refresh_lock.lock().await;

        match self.fetch().await {
            Ok(raw) => {
                let snapshot = build_snapshot(raw, self.inner.config.layout, Utc::now());
                debug!(
                    power = snapshot.power,
                    routed = snapshot.routing.len(),
                    "snapshot refreshed"
                );
                Ok(self.inner.store.publish(snapshot))
            }
            Err(e) => {
                self.inner.store.mark_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Run a refresh in the background. Failures are logged and reported
    /// to listeners only.
    pub async fn request_refresh(&self) {
        let coordinator = self.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = coordinator.refresh().await {
                warn!(error = %e, "requested refresh failed");
            }
        });
        self.track_pending(handle).await;
    }

    async fn fetch(&self) -> Result<RawPayloads, CoreError> {
        let client = &self.inner.client;
        let video = client.get_video_status().await?;
        let output = client.get_output_status().await?;
        let input = client.get_input_status().await?;
        Ok(RawPayloads {
            video,
            output,
            input,
        })
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Route the input called `source` to `output`.
    ///
    /// Returns once the optimistic routing patch is published; a
    /// confirmation refresh follows after the configured settle delay.
    pub async fn set_route(&self, output: u8, source: &str) -> Result<(), CoreError> {
        let layout = self.inner.config.layout;
        if !layout.contains_output(output) {
            return Err(CoreError::validation(format!(
                "output {output} is out of range (1..={})",
                layout.outputs
            )));
        }

        let current = self.inner.store.current();
        let Some(input) = resolve_source(current.as_deref(), layout, source) else {
            warn!(source, output, "unknown source");
            return Err(CoreError::validation(format!("unknown source '{source}'")));
        };

        self.execute(Command::SetRoute { input, output }).await
    }

    /// Power the matrix on or put it into standby, then refresh.
    pub async fn set_power(&self, on: bool) -> Result<(), CoreError> {
        self.execute(Command::SetPower(on)).await
    }

    /// Send a command to the device and reconcile the snapshot.
    pub async fn execute(&self, cmd: Command) -> Result<(), CoreError> {
        let cmd = cmd.validate(self.inner.config.layout)?;
        let client = &self.inner.client;

        match cmd {
            Command::SetRoute { input, output } => {
                client.video_switch(input, output).await?;
                self.inner.store.patch_route(output, input);
                self.schedule_confirmation().await;
            }
            Command::SetPower(on) => {
                client.set_power(on).await?;
                if let Err(e) = self.refresh().await {
                    warn!(error = %e, "refresh after power change failed");
                }
            }
        }

        debug!(?cmd, "command applied");
        Ok(())
    }

    async fn schedule_confirmation(&self) {
        let coordinator = self.clone();
        let delay = self.inner.config.settle_delay;
        let cancel = self.inner.cancel.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    if let Err(e) = coordinator.refresh().await {
                        warn!(error = %e, "confirmation refresh failed");
                    }
                }
            }
        });
        self.track_pending(handle).await;
    }

    async fn track_pending(&self, handle: JoinHandle<()>) {
        let mut pending = self.inner.pending.lock().await;
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    // ── One-shot convenience ─────────────────────────────────────────

    /// Connect, run `f`, wait for confirmations, shut down.
    ///
    /// Periodic polling is disabled since only one cycle is needed.
    pub async fn oneshot<F, Fut, T>(config: MatrixConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Coordinator) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.scan_interval = Duration::ZERO;

        let coordinator = Coordinator::new(cfg)?;
        coordinator.connect().await?;
        let result = f(coordinator.clone()).await;
        coordinator.settle().await;
        coordinator.shutdown().await;
        result
    }

    // ── State observation ────────────────────────────────────────────

    pub fn current_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.store.current()
    }

    pub fn subscribe(&self) -> SnapshotStream {
        self.inner.store.subscribe()
    }

    pub fn update_status(&self) -> UpdateStatus {
        self.inner.store.status()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<UpdateStatus> {
        self.inner.store.subscribe_status()
    }

    /// Identity from the last successful `get status`.
    pub fn device_info(&self) -> Option<Arc<DeviceInfo>> {
        self.inner.device.borrow().clone()
    }

    /// Register a callback run after every publication or failed refresh.
    pub fn add_listener<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&CoordinatorEvent) + Send + Sync + 'static,
    {
        self.inner.store.add_listener(callback)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.store.remove_listener(id)
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Periodically refresh the snapshot until cancelled.
async fn refresh_task(coordinator: Coordinator, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = coordinator.refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}
