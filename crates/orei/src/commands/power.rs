//! Power command handler.

use orei_core::{Coordinator, MatrixConfig};

use crate::cli::{GlobalOpts, PowerArgs};
use crate::error::CliError;

pub async fn handle(matrix: MatrixConfig, args: PowerArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let on = args.state.is_on();

    let confirmed = Coordinator::oneshot(matrix, |coordinator| async move {
        coordinator.set_power(on).await?;
        Ok(coordinator.current_snapshot().map(|snap| snap.power))
    })
    .await?;

    if !global.quiet {
        match confirmed {
            Some(true) => eprintln!("Matrix powered on"),
            Some(false) => eprintln!("Matrix in standby"),
            None => eprintln!("Power command sent; state not confirmed"),
        }
    }
    Ok(())
}
