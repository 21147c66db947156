// Response types for the matrix control API
//
// Every reply is a flat JSON object whose shape depends on the `comhead`
// that was sent. Only the fields the coordinator consumes are modelled
// explicitly; everything else lands in `extra` so the full payload stays
// available for diagnostics. Fields use `#[serde(default)]` throughout
// because firmware revisions omit whole keys rather than sending empties.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded reply to a command (`video switch`, `set poweronoff`).
///
/// The device echoes assorted state here; callers must not treat its
/// contents as confirmation.
pub type CommandReply = Map<String, Value>;

// ── Outgoing request ─────────────────────────────────────────────────

/// Request body posted to the endpoint.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Request {
    pub comhead: &'static str,
    pub language: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<[u8; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<u8>,
}

impl Request {
    pub(crate) fn query(comhead: &'static str) -> Self {
        Self {
            comhead,
            language: 0,
            source: None,
            power: None,
        }
    }
}

// ── get status ───────────────────────────────────────────────────────

/// Device identity from `get status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    /// Firmware, network identity and anything else the device reports.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── get video status ─────────────────────────────────────────────────

/// Routing, naming and power from `get video status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoStatus {
    /// 1 = on, 0 = standby.
    #[serde(default)]
    pub power: i64,
    /// Input number per output; `0` terminates the list.
    #[serde(default, rename = "allsource")]
    pub sources: Vec<i64>,
    #[serde(default, rename = "allinputname")]
    pub input_names: Vec<String>,
    #[serde(default, rename = "alloutputname")]
    pub output_names: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── get output status ────────────────────────────────────────────────

/// Sink detection for both transport legs from `get output status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputStatus {
    /// Direct HDMI leg, one flag per output.
    #[serde(default, rename = "allconnect")]
    pub hdmi_connected: Vec<i64>,
    /// HDBaseT leg, one flag per output.
    #[serde(default, rename = "allhdbtconnect")]
    pub hdbt_connected: Vec<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── get input status ─────────────────────────────────────────────────

/// Signal detection from `get input status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputStatus {
    /// 1 = no signal on that input, 0 = live signal.
    #[serde(default)]
    pub inactive: Vec<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
