//! Config subcommand handlers.

use std::fmt::Write;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, DeviceProfile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display in TOML layout.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_device {
        let _ = writeln!(out, "default_device = \"{default}\"");
        let _ = writeln!(out);
    }
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "scan_interval = {}", cfg.defaults.scan_interval);
    let _ = writeln!(out, "settle_delay_ms = {}", cfg.defaults.settle_delay_ms);

    for (name, device) in &cfg.devices {
        let _ = writeln!(out);
        let _ = writeln!(out, "[devices.{name}]");
        let _ = writeln!(out, "host = \"{}\"", device.host);
        let _ = writeln!(out, "port = {}", device.port);
        let _ = writeln!(out, "inputs = {}", device.inputs);
        let _ = writeln!(out, "outputs = {}", device.outputs);
        if let Some(timeout) = device.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(interval) = device.scan_interval {
            let _ = writeln!(out, "scan_interval = {interval}");
        }
        if let Some(delay) = device.settle_delay_ms {
            let _ = writeln!(out, "settle_delay_ms = {delay}");
        }
    }

    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init {
            name,
            host,
            port,
            inputs,
            outputs,
            default,
        } => {
            let mut cfg = config::load(global)?;

            let mut profile = DeviceProfile::new(host.trim());
            profile.port = port;
            profile.inputs = inputs;
            profile.outputs = outputs;

            // Reject unusable values before anything is written.
            profile.to_matrix_config(&cfg.defaults)?;
            cfg.add_device(&name, profile)?;
            if default {
                cfg.default_device = Some(name.clone());
            }

            let path = config::save(&cfg, global)?;
            if !global.quiet {
                eprintln!("✓ Device '{name}' ({}) written to {}", host.trim(), path.display());
                eprintln!("  Test it: orei probe --device {name}");
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let out = output::render_single(&global.output, &cfg, format_config, |c| {
                c.devices.keys().cloned().collect::<Vec<_>>().join("\n")
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path(global).display().to_string(), false);
            Ok(())
        }
    }
}
