// ── Domain model ──
//
// Normalized, device-independent view of the matrix. Ids are 1-based
// throughout; positional defaults stand in for names the device omits.

mod device;
mod port;
mod snapshot;

pub use device::DeviceInfo;
pub use port::{PortLayout, default_input_name, default_output_name};
pub use snapshot::{RawPayloads, Snapshot};
