//! CLI command dispatch and handlers.
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod play;
pub mod simulate;
pub mod validate;
pub mod version;

use crate::cli::args::{Cli, Commands};
use crate::error::HandCricketError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), HandCricketError> {
    match cli.command {
        Commands::Simulate(args) => simulate::run(&args).await,
        Commands::Play(args) => play::run(&args).await,
        Commands::Validate(args) => validate::run(&args),
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}
