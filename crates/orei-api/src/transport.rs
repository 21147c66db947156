// Transport configuration for building the reqwest::Client used by
// MatrixClient. The device speaks plain HTTP on the LAN, so the only
// knobs are the per-request timeout and the user agent.

use std::time::Duration;

use crate::error::Error;

/// Default per-request timeout; the device answers well within this on a LAN.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("orei-matrix/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl TransportConfig {
    /// Config with the given timeout and the default user agent.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(Error::ClientBuild)
    }
}
