//! Status command handler and the shared status view.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use orei_core::{Coordinator, MatrixConfig, Snapshot, UpdateStatus};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── View model ──────────────────────────────────────────────────────

/// Snapshot flattened for display: one entry per port in the layout.
#[derive(Debug, Serialize)]
pub struct StatusView {
    pub title: Option<String>,
    pub power: bool,
    pub stale: bool,
    pub fetched_at: DateTime<Utc>,
    pub outputs: Vec<OutputView>,
    pub inputs: Vec<InputView>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct OutputView {
    pub output: u8,
    pub name: String,
    pub input: Option<u8>,
    pub source: Option<String>,
    pub connected: bool,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct InputView {
    pub input: u8,
    pub name: String,
    pub active: bool,
}

impl StatusView {
    pub fn new(snapshot: &Snapshot, status: &UpdateStatus, title: Option<String>) -> Self {
        let outputs = snapshot
            .layout
            .output_ids()
            .map(|id| OutputView {
                output: id,
                name: snapshot.output_name(id),
                input: snapshot.routing.get(&id).copied(),
                source: snapshot.current_source(id),
                connected: snapshot.output_connected.get(&id).copied().unwrap_or(false),
            })
            .collect();

        let inputs = snapshot
            .layout
            .input_ids()
            .map(|id| InputView {
                input: id,
                name: snapshot.input_name(id),
                active: snapshot.input_active.get(&id).copied().unwrap_or(false),
            })
            .collect();

        Self {
            title,
            power: snapshot.power,
            stale: status.is_stale(),
            fetched_at: snapshot.fetched_at,
            outputs,
            inputs,
        }
    }

    /// Same power, routing and signal state, ignoring when it was fetched.
    pub fn same_state(&self, other: &Self) -> bool {
        self.power == other.power && self.outputs == other.outputs && self.inputs == other.inputs
    }

    /// One line per output: `<output>\t<source>`.
    pub fn plain(&self) -> String {
        self.outputs
            .iter()
            .map(|o| format!("{}\t{}", o.output, o.source.as_deref().unwrap_or("-")))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Single-line summary, used by `watch`.
    pub fn summary(&self, color: bool) -> String {
        let routes: Vec<String> = self
            .outputs
            .iter()
            .map(|o| format!("{}<-{}", o.output, o.source.as_deref().unwrap_or("-")))
            .collect();
        format!(
            "{} power {} | {}",
            output::muted(&self.fetched_at.format("%H:%M:%S").to_string(), color),
            output::state_label(self.power, "on", "standby", color),
            routes.join("  ")
        )
    }
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct OutputRow {
    #[tabled(rename = "#")]
    id: u8,
    #[tabled(rename = "Output")]
    name: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Display")]
    sink: String,
}

#[derive(Tabled)]
struct InputRow {
    #[tabled(rename = "#")]
    id: u8,
    #[tabled(rename = "Input")]
    name: String,
    #[tabled(rename = "Signal")]
    signal: String,
}

fn detail(view: &StatusView, color: bool) -> String {
    let outputs: Vec<OutputRow> = view
        .outputs
        .iter()
        .map(|o| OutputRow {
            id: o.output,
            name: o.name.clone(),
            source: o.source.clone().unwrap_or_else(|| "-".into()),
            sink: output::state_label(o.connected, "connected", "none", color),
        })
        .collect();

    let inputs: Vec<InputRow> = view
        .inputs
        .iter()
        .map(|i| InputRow {
            id: i.input,
            name: i.name.clone(),
            signal: output::state_label(i.active, "live", "no signal", color),
        })
        .collect();

    let mut header = format!(
        "Power: {}",
        output::state_label(view.power, "on", "standby", color)
    );
    if let Some(ref title) = view.title {
        header = format!("{title}\n{header}");
    }
    if view.stale {
        header.push_str(&output::muted("  (stale)", color));
    }

    format!(
        "{header}\n{}\n{}",
        output::render_table(&outputs),
        output::render_table(&inputs)
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(matrix: MatrixConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let host = matrix.host.clone();

    let view = Coordinator::oneshot(matrix, |coordinator| async move {
        let title = coordinator.device_info().map(|info| info.title());
        let status = coordinator.update_status();
        Ok(coordinator
            .current_snapshot()
            .map(|snap| StatusView::new(&snap, &status, title)))
    })
    .await?
    .ok_or(CliError::Unavailable { host })?;

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &view,
        |v| detail(v, color),
        StatusView::plain,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
