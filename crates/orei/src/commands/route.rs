//! Route command handler.

use orei_core::{Coordinator, MatrixConfig};

use crate::cli::{GlobalOpts, RouteArgs};
use crate::error::CliError;

pub async fn handle(matrix: MatrixConfig, args: RouteArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let RouteArgs { output, source } = args;

    // Wait for the confirmation refresh so the report reflects the device.
    let confirmed = Coordinator::oneshot(matrix, move |coordinator| async move {
        coordinator.set_route(output, &source).await?;
        coordinator.settle().await;
        Ok(coordinator
            .current_snapshot()
            .map(|snap| (snap.output_name(output), snap.current_source(output))))
    })
    .await?;

    if !global.quiet {
        match confirmed {
            Some((name, Some(source))) => eprintln!("Output {output} ({name}): {source}"),
            Some((name, None)) => eprintln!("Output {output} ({name}): no source reported"),
            None => eprintln!("Route command sent to output {output}"),
        }
    }
    Ok(())
}
