//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use orei_config::ConfigError;
use orei_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to matrix at {host}")]
    #[diagnostic(
        code(orei::connection_failed),
        help(
            "Check that the matrix is powered and reachable on the network.\n\
             Host: {host}\n\
             Try: orei probe --host {host}"
        )
    )]
    ConnectionFailed {
        host: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to matrix at {host} timed out")]
    #[diagnostic(
        code(orei::timeout),
        help("Increase the timeout with --timeout or check the matrix's network link.")
    )]
    Timeout { host: String },

    #[error("No state received from matrix at {host}")]
    #[diagnostic(code(orei::unavailable))]
    Unavailable { host: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(
        code(orei::validation),
        help("Run: orei status to see output numbers and source names")
    )]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Device '{name}' not found in configuration")]
    #[diagnostic(
        code(orei::device_not_found),
        help(
            "Available devices: {available}\n\
             Add one with: orei config init --device-host <HOST>"
        )
    )]
    DeviceNotFound { name: String, available: String },

    #[error("No matrix configured")]
    #[diagnostic(
        code(orei::no_config),
        help(
            "Pass --host, or add a device with: orei config init --device-host <HOST>\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Host {host} is already configured as device '{existing}'")]
    #[diagnostic(code(orei::duplicate_host))]
    DuplicateHost { host: String, existing: String },

    #[error(transparent)]
    #[diagnostic(code(orei::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(orei::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(orei::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Unavailable { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            Self::DuplicateHost { .. } => exit_code::CONFLICT,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CannotConnect { host, reason } => CliError::ConnectionFailed {
                host,
                source: reason.into(),
            },

            CoreError::Connectivity {
                host,
                timed_out: true,
                ..
            } => CliError::Timeout { host },

            CoreError::Connectivity { host, reason, .. } => CliError::ConnectionFailed {
                host,
                source: reason.into(),
            },

            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::DuplicateHost { host, existing } => {
                CliError::DuplicateHost { host, existing }
            }
            ConfigError::NoDevice => CliError::NoConfig {
                path: orei_config::config_path().display().to_string(),
            },
            other => CliError::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_and_refusals_get_distinct_codes() {
        let timeout = CliError::from(CoreError::Connectivity {
            host: "10.0.0.2".into(),
            reason: "operation timed out".into(),
            timed_out: true,
        });
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);

        let refused = CliError::from(CoreError::CannotConnect {
            host: "10.0.0.2".into(),
            reason: "connection refused".into(),
        });
        assert_eq!(refused.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn validation_is_a_usage_error() {
        let err = CliError::from(CoreError::Validation {
            message: "unknown source 'Roku'".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert!(err.to_string().contains("unknown source"));
    }
}
