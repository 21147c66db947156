// ── Core error types ──
//
// Errors surfaced to coordinator callers. Transport detail from
// `orei_api` is folded into `Connectivity`; local failures that never
// touch the device are `Validation`.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    /// Initial connectivity check failed; the device cannot be activated.
    #[error("Cannot connect to matrix at {host}: {reason}")]
    CannotConnect { host: String, reason: String },

    /// A request to an already-activated device failed.
    #[error("Error communicating with matrix at {host}: {reason}")]
    Connectivity {
        host: String,
        reason: String,
        timed_out: bool,
    },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Promote a failed identity check to the fatal activation error.
    pub(crate) fn cannot_connect(err: orei_api::Error) -> Self {
        match Self::from(err) {
            Self::Connectivity { host, reason, .. } => Self::CannotConnect { host, reason },
            other => other,
        }
    }

    /// Returns `true` for failures caused by the device or the network.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::CannotConnect { .. } | Self::Connectivity { .. })
    }

    /// Returns `true` if the failing request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Connectivity { timed_out: true, .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<orei_api::Error> for CoreError {
    fn from(err: orei_api::Error) -> Self {
        let timed_out = err.is_timeout();
        match err {
            orei_api::Error::Connectivity { host, source } => CoreError::Connectivity {
                host,
                reason: source.to_string(),
                timed_out,
            },
            orei_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid device address: {e}"),
            },
            orei_api::Error::ClientBuild(e) => CoreError::Config {
                message: format!("Failed to build HTTP client: {e}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_connectivity_keeps_host_and_cause() {
        let err = CoreError::from(orei_api::Error::Connectivity {
            host: "10.0.0.7".into(),
            source: "connection refused".into(),
        });

        assert!(err.is_connectivity());
        assert!(!err.is_timeout());
        assert_eq!(
            err.to_string(),
            "Error communicating with matrix at 10.0.0.7: connection refused"
        );
    }
}
