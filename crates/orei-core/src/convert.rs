// ── Payload-to-snapshot conversion ──
//
// Merges the three raw status payloads into one `Snapshot`. The device
// reports everything as positional arrays (index 0 is port 1), terminates
// the routing list with a `0`, and splits sink detection across the HDMI
// and HDBaseT legs of each output.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::model::{PortLayout, RawPayloads, Snapshot};

// ── Helpers ────────────────────────────────────────────────────────

/// Map a 0-based array position onto a 1-based id, if it fits in `limit`.
fn position_to_id(position: usize, limit: u8) -> Option<u8> {
    u8::try_from(position + 1).ok().filter(|id| *id <= limit)
}

fn flag(values: &[i64], position: usize) -> bool {
    values.get(position).is_some_and(|v| *v != 0)
}

// ── Field conversions ──────────────────────────────────────────────

/// Output-to-input routing from the device's `allsource` list.
///
/// The first `0` ends the list: every output at or after it is unrouted,
/// even if later entries are non-zero. Inputs outside the layout are
/// dropped for that output alone.
pub fn routing_from_sources(sources: &[i64], layout: PortLayout) -> BTreeMap<u8, u8> {
    let mut routing = BTreeMap::new();
    for (position, &source) in sources.iter().enumerate() {
        if source == 0 {
            break;
        }
        let Some(output) = position_to_id(position, layout.outputs) else {
            break;
        };
        let input = u8::try_from(source)
            .ok()
            .filter(|id| layout.contains_input(*id));
        if let Some(input) = input {
            routing.insert(output, input);
        }
    }
    routing
}

/// Names keyed by 1-based id, truncated to `limit` ids.
pub fn names_by_id(names: &[String], limit: u8) -> BTreeMap<u8, String> {
    names
        .iter()
        .enumerate()
        .map_while(|(position, name)| position_to_id(position, limit).map(|id| (id, name.clone())))
        .collect()
}

/// Live-signal flags from the device's `inactive` list (0 means live).
pub fn input_activity(inactive: &[i64], layout: PortLayout) -> BTreeMap<u8, bool> {
    inactive
        .iter()
        .enumerate()
        .map_while(|(position, &value)| {
            position_to_id(position, layout.inputs).map(|id| (id, value == 0))
        })
        .collect()
}

/// Sink detection per output, OR-ing the HDMI and HDBaseT legs.
///
/// The two arrays may differ in length; a missing entry counts as
/// disconnected.
pub fn output_connections(hdmi: &[i64], hdbt: &[i64], layout: PortLayout) -> BTreeMap<u8, bool> {
    let len = hdmi.len().max(hdbt.len());
    (0..len)
        .map_while(|position| {
            position_to_id(position, layout.outputs)
                .map(|id| (id, flag(hdmi, position) || flag(hdbt, position)))
        })
        .collect()
}

// ── Snapshot ───────────────────────────────────────────────────────

/// Build a complete snapshot from one round of fetched payloads.
pub fn build_snapshot(raw: RawPayloads, layout: PortLayout, fetched_at: DateTime<Utc>) -> Snapshot {
    Snapshot {
        power: raw.video.power != 0,
        routing: routing_from_sources(&raw.video.sources, layout),
        input_names: names_by_id(&raw.video.input_names, layout.inputs),
        output_names: names_by_id(&raw.video.output_names, layout.outputs),
        input_active: input_activity(&raw.input.inactive, layout),
        output_connected: output_connections(
            &raw.output.hdmi_connected,
            &raw.output.hdbt_connected,
            layout,
        ),
        layout,
        fetched_at,
        raw,
    }
}
