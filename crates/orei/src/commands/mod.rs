//! Command handlers.

pub mod config_cmd;
pub mod power;
pub mod probe;
pub mod route;
pub mod status;
pub mod watch;

use orei_core::MatrixConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Run a device command against the resolved matrix.
pub async fn dispatch(
    cmd: Command,
    matrix: MatrixConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Probe => probe::handle(matrix, global).await,
        Command::Status => status::handle(matrix, global).await,
        Command::Route(args) => route::handle(matrix, args, global).await,
        Command::Power(args) => power::handle(matrix, args, global).await,
        Command::Watch(args) => watch::handle(matrix, args, global).await,
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
