//! CLI configuration: thin wrapper around `orei_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--host, --port, --timeout, --config).

use std::path::PathBuf;

use orei_config::ConfigError;
use orei_core::MatrixConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use orei_config::{Config, DeviceProfile};

/// Config file in effect: `--config` or the platform default.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(orei_config::config_path)
}

/// Load the config file in effect (missing file yields defaults).
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(orei_config::load_config_from(&config_path(global))?)
}

pub fn save(cfg: &Config, global: &GlobalOpts) -> Result<PathBuf, CliError> {
    let path = config_path(global);
    orei_config::save_config_to(cfg, &path)?;
    Ok(path)
}

/// Translate config + global flags into a `MatrixConfig`.
///
/// `--host` bypasses device profiles entirely; otherwise the named (or
/// default) device is used. Flag overrides take priority.
pub fn resolve_matrix_config(global: &GlobalOpts, cfg: &Config) -> Result<MatrixConfig, CliError> {
    let mut profile = match global.host {
        Some(ref host) => DeviceProfile::new(host.clone()),
        None => match cfg.device(global.device.as_deref()) {
            Ok((_, profile)) => profile.clone(),
            Err(ConfigError::UnknownDevice { name }) => {
                return Err(CliError::DeviceNotFound {
                    name,
                    available: available_devices(cfg),
                });
            }
            Err(ConfigError::NoDevice) => {
                return Err(CliError::NoConfig {
                    path: config_path(global).display().to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        },
    };

    if let Some(port) = global.port {
        profile.port = port;
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    Ok(profile.to_matrix_config(&cfg.defaults)?)
}

fn available_devices(cfg: &Config) -> String {
    if cfg.devices.is_empty() {
        "(none)".into()
    } else {
        cfg.devices.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
