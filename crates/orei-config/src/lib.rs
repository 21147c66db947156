//! Shared configuration for the OREI matrix CLI.
//!
//! TOML device profiles layered with environment overrides, and
//! translation to `orei_core::MatrixConfig`. The CLI adds flag-aware
//! wrappers on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use orei_core::{MatrixConfig, PortLayout};

/// Prefix for environment overrides, e.g. `OREI_DEFAULTS__TIMEOUT=10`.
pub const ENV_PREFIX: &str = "OREI_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no device named '{name}' in config")]
    UnknownDevice { name: String },

    #[error("no device configured")]
    NoDevice,

    #[error("host {host} is already configured as device '{existing}'")]
    DuplicateHost { host: String, existing: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Device used when none is named on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_device: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named device profiles.
    #[serde(default)]
    pub devices: BTreeMap<String, DeviceProfile>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Polling interval in seconds.
    #[serde(default = "default_scan_interval")]
    pub scan_interval: u64,

    /// Delay before the confirmation refresh after a route change.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            scan_interval: default_scan_interval(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    MatrixConfig::DEFAULT_TIMEOUT.as_secs()
}
fn default_scan_interval() -> u64 {
    MatrixConfig::DEFAULT_SCAN_INTERVAL.as_secs()
}
fn default_settle_delay_ms() -> u64 {
    500
}

/// A named matrix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceProfile {
    /// Hostname or IP address (e.g., "192.168.1.50").
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_ports")]
    pub inputs: u8,

    #[serde(default = "default_ports")]
    pub outputs: u8,

    /// Override timeout (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Override polling interval (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_interval: Option<u64>,

    /// Override settle delay (milliseconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settle_delay_ms: Option<u64>,
}

fn default_port() -> u16 {
    80
}
fn default_ports() -> u8 {
    4
}

impl DeviceProfile {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            inputs: default_ports(),
            outputs: default_ports(),
            timeout: None,
            scan_interval: None,
            settle_delay_ms: None,
        }
    }

    /// Build a `MatrixConfig`, filling unset overrides from `defaults`.
    pub fn to_matrix_config(&self, defaults: &Defaults) -> Result<MatrixConfig, ConfigError> {
        let mut config = MatrixConfig::new(self.host.trim());
        config.port = self.port;
        config.timeout = Duration::from_secs(self.timeout.unwrap_or(defaults.timeout));
        config.scan_interval =
            Duration::from_secs(self.scan_interval.unwrap_or(defaults.scan_interval));
        config.settle_delay =
            Duration::from_millis(self.settle_delay_ms.unwrap_or(defaults.settle_delay_ms));
        config.layout = PortLayout {
            inputs: self.inputs,
            outputs: self.outputs,
        };

        config.validate().map_err(|e| ConfigError::Validation {
            field: "device".into(),
            reason: e.to_string(),
        })?;
        Ok(config)
    }
}

// ── Device selection ────────────────────────────────────────────────

impl Config {
    /// Resolve a device by name, then `default_device`, then the only
    /// configured device.
    pub fn device(&self, name: Option<&str>) -> Result<(&str, &DeviceProfile), ConfigError> {
        let wanted = name.or(self.default_device.as_deref());

        if let Some(wanted) = wanted {
            return self
                .devices
                .get_key_value(wanted)
                .map(|(k, v)| (k.as_str(), v))
                .ok_or_else(|| ConfigError::UnknownDevice {
                    name: wanted.into(),
                });
        }

        let mut devices = self.devices.iter();
        match (devices.next(), devices.next()) {
            (Some((k, v)), None) => Ok((k.as_str(), v)),
            _ => Err(ConfigError::NoDevice),
        }
    }

    /// Add or replace a named device.
    ///
    /// A host may only appear under one name.
    pub fn add_device(&mut self, name: &str, profile: DeviceProfile) -> Result<(), ConfigError> {
        let host = profile.host.trim();
        if host.is_empty() {
            return Err(ConfigError::Validation {
                field: "host".into(),
                reason: "must not be empty".into(),
            });
        }

        if let Some((existing, _)) = self
            .devices
            .iter()
            .find(|(n, p)| n.as_str() != name && p.host.trim().eq_ignore_ascii_case(host))
        {
            return Err(ConfigError::DuplicateHost {
                host: host.into(),
                existing: existing.clone(),
            });
        }

        self.devices.insert(name.into(), profile);
        if self.default_device.is_none() {
            self.default_device = Some(name.into());
        }
        Ok(())
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "orei", "orei").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("orei");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` (missing file is fine) + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
