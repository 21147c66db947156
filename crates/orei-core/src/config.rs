// ── Runtime connection configuration ──
//
// Describes *how* to talk to one matrix and how often to poll it.
// The CLI (via orei-config) constructs a `MatrixConfig` and hands it in;
// core never reads config files.

use std::time::Duration;

use orei_api::DEFAULT_PORT;

use crate::error::CoreError;
use crate::model::PortLayout;

/// Configuration for a single matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixConfig {
    /// Hostname or IP address of the device.
    pub host: String,
    /// HTTP port of the device's web server.
    pub port: u16,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Interval between background refreshes. Zero disables the periodic task.
    pub scan_interval: Duration,
    /// Grace period between a route command and its confirmation refresh.
    pub settle_delay: Duration,
    /// Number of inputs and outputs on the device.
    pub layout: PortLayout,
}

impl MatrixConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(15);
    pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

    /// Config for `host` with the reference deployment's defaults.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
            scan_interval: Self::DEFAULT_SCAN_INTERVAL,
            settle_delay: Self::DEFAULT_SETTLE_DELAY,
            layout: PortLayout::default(),
        }
    }

    /// Reject configurations the coordinator cannot run with.
    pub fn validate(&self) -> Result<(), CoreError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(config_error("host must not be empty"));
        }
        if host.contains('/') || host.contains(' ') {
            return Err(config_error(format!("host '{host}' is not a bare hostname or IP")));
        }
        if self.port == 0 {
            return Err(config_error("port must be non-zero"));
        }
        if self.timeout.is_zero() {
            return Err(config_error("timeout must be non-zero"));
        }
        if self.layout.inputs == 0 || self.layout.outputs == 0 {
            return Err(config_error("the matrix needs at least one input and one output"));
        }
        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> CoreError {
    CoreError::Config {
        message: message.into(),
    }
}
