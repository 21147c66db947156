use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use orei_api::{InputStatus, OutputStatus, VideoStatus};

use super::port::{PortLayout, default_input_name, default_output_name};

/// Prefix the firmware uses for unnamed outputs ("HDMI Output1", ...).
const FACTORY_OUTPUT_PREFIX: &str = "hdmi output";

/// The three payloads a snapshot was merged from, kept for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawPayloads {
    pub video: VideoStatus,
    pub output: OutputStatus,
    pub input: InputStatus,
}

/// One consistent view of the matrix.
///
/// Built in full by a refresh and replaced wholesale; the only in-place
/// change is the coordinator's optimistic routing patch, which still
/// publishes a new value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub power: bool,
    /// Output id to input id. Outputs without a valid source are absent.
    pub routing: BTreeMap<u8, u8>,
    pub input_names: BTreeMap<u8, String>,
    pub output_names: BTreeMap<u8, String>,
    /// `true` when the input carries a live signal.
    pub input_active: BTreeMap<u8, bool>,
    /// `true` when either the HDMI or the HDBaseT leg sees a sink.
    pub output_connected: BTreeMap<u8, bool>,
    pub layout: PortLayout,
    pub fetched_at: DateTime<Utc>,
    pub raw: RawPayloads,
}

impl Snapshot {
    /// Display name for an input, falling back to `Input {id}`.
    pub fn input_name(&self, id: u8) -> String {
        self.input_names
            .get(&id)
            .map(String::as_str)
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or_else(|| default_input_name(id), str::to_owned)
    }

    /// Display name for an output, falling back to `Output {id}` when the
    /// device still reports its factory label.
    pub fn output_name(&self, id: u8) -> String {
        self.output_names
            .get(&id)
            .map(String::as_str)
            .map(str::trim)
            .filter(|n| !n.is_empty() && !is_factory_output_name(n))
            .map_or_else(|| default_output_name(id), str::to_owned)
    }

    /// Selectable source names, ordered by input id.
    pub fn source_options(&self) -> Vec<String> {
        if self.input_names.is_empty() {
            return self.layout.input_ids().map(default_input_name).collect();
        }
        self.input_names.values().cloned().collect()
    }

    /// Name of the input currently routed to `output`.
    pub fn current_source(&self, output: u8) -> Option<String> {
        self.routing.get(&output).map(|&input| self.input_name(input))
    }

    /// Copy of this snapshot with `output` routed to `input`.
    pub(crate) fn with_route(&self, output: u8, input: u8) -> Self {
        let mut patched = self.clone();
        patched.routing.insert(output, input);
        patched
    }
}

fn is_factory_output_name(name: &str) -> bool {
    name.get(..FACTORY_OUTPUT_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(FACTORY_OUTPUT_PREFIX))
}
