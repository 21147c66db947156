//! Probe command handler.

use tabled::Tabled;

use orei_core::{Coordinator, DeviceInfo, MatrixConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn detail(info: &DeviceInfo) -> String {
    let mut rows = vec![
        FieldRow {
            field: "Device".into(),
            value: info.title(),
        },
        FieldRow {
            field: "Host".into(),
            value: info.host.clone(),
        },
        FieldRow {
            field: "Model".into(),
            value: info.model().to_owned(),
        },
    ];

    // Firmware and network identity, whatever the device chose to report.
    rows.extend(
        info.status
            .extra
            .iter()
            .filter(|(key, _)| key.as_str() != "comhead")
            .map(|(key, value)| FieldRow {
                field: key.clone(),
                value: value
                    .as_str()
                    .map_or_else(|| value.to_string(), str::to_owned),
            }),
    );

    output::render_table(&rows)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(matrix: MatrixConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let coordinator = Coordinator::new(matrix)?;
    let info = coordinator.identify().await?;

    let out = output::render_single(&global.output, &*info, detail, |i| {
        i.model().to_owned()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
