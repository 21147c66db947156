//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one value per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Render a boolean state as a (possibly colored) label.
pub fn state_label(on: bool, on_label: &str, off_label: &str, color: bool) -> String {
    match (on, color) {
        (true, true) => on_label.green().to_string(),
        (false, true) => off_label.red().to_string(),
        (true, false) => on_label.to_owned(),
        (false, false) => off_label.to_owned(),
    }
}

/// Dim secondary text when color is enabled.
pub fn muted(text: &str, color: bool) -> String {
    if color {
        text.dimmed().to_string()
    } else {
        text.to_owned()
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, which returns a pre-formatted string.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    Ok(match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Plain => id_fn(data),
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Port {
        id: u8,
        name: &'static str,
    }

    #[derive(Tabled)]
    struct PortRow {
        #[tabled(rename = "#")]
        id: u8,
        #[tabled(rename = "Name")]
        name: &'static str,
    }

    #[test]
    fn single_formats() {
        let port = Port { id: 1, name: "Den" };
        let detail = |p: &Port| render_table(&[PortRow { id: p.id, name: p.name }]);
        let id = |p: &Port| p.name.to_owned();

        let table = render_single(&OutputFormat::Table, &port, detail, id).unwrap();
        assert!(table.contains("Name") && table.contains("Den"));

        let plain = render_single(&OutputFormat::Plain, &port, detail, id).unwrap();
        assert_eq!(plain, "Den");

        let compact = render_single(&OutputFormat::JsonCompact, &port, detail, id).unwrap();
        assert_eq!(compact, r#"{"id":1,"name":"Den"}"#);
    }

    #[test]
    fn labels_without_color_are_plain() {
        assert_eq!(state_label(true, "on", "standby", false), "on");
        assert_eq!(state_label(false, "on", "standby", false), "standby");
        assert_ne!(state_label(true, "on", "standby", true), "on");
    }
}
