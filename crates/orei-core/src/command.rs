// ── Command API ──
//
// Write operations against the matrix. Route commands carry resolved
// numeric ids; name resolution happens before a command is built.

use crate::error::CoreError;
use crate::model::{PortLayout, Snapshot};

/// A write operation against the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Route `input` to `output`.
    SetRoute { input: u8, output: u8 },
    /// Power the matrix on (`true`) or put it into standby.
    SetPower(bool),
}

impl Command {
    /// Check ids against the layout before anything reaches the device.
    pub fn validate(self, layout: PortLayout) -> Result<Self, CoreError> {
        if let Self::SetRoute { input, output } = self {
            if !layout.contains_output(output) {
                return Err(CoreError::validation(format!(
                    "output {output} is out of range (1..={})",
                    layout.outputs
                )));
            }
            if !layout.contains_input(input) {
                return Err(CoreError::validation(format!(
                    "input {input} is out of range (1..={})",
                    layout.inputs
                )));
            }
        }
        Ok(self)
    }
}

/// Resolve a source name to an input id.
///
/// Exact matches against the snapshot's input names win; otherwise the
/// positional label `Input {n}` is accepted for any in-range `n`, so a
/// route can be set before the first refresh has named anything.
pub fn resolve_source(snapshot: Option<&Snapshot>, layout: PortLayout, name: &str) -> Option<u8> {
    let named = snapshot.and_then(|snap| {
        snap.input_names
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(&id, _)| id)
    });
    named
        .filter(|id| layout.contains_input(*id))
        .or_else(|| parse_positional(name, layout))
}

/// Parse `Input {n}`, taking `n` from the last whitespace-separated token.
fn parse_positional(name: &str, layout: PortLayout) -> Option<u8> {
    let (label, number) = name.trim().rsplit_once(char::is_whitespace)?;
    if !label.trim().eq_ignore_ascii_case("input") {
        return None;
    }
    number
        .parse::<u8>()
        .ok()
        .filter(|id| layout.contains_input(*id))
}
