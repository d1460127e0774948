//! `simulate` — run a scripted match.
//!
//! Loads a scenario file, drives a real match actor through it, and
//! prints the resulting event stream in human or JSONL form. With
//! `--events` the JSONL record is additionally written to a file
//! whatever the terminal format.

use std::sync::Arc;

use crate::cli::args::{OutputFormat, SimulateArgs};
use crate::cli::render;
use crate::config::EngineConfig;
use crate::error::HandCricketError;
use crate::observability::events::EventLog;
use crate::scenario::{self, Scenario};

/// Run a scenario to completion and print the event stream.
///
/// # Errors
///
/// Config/scenario loading errors, or engine errors from the run.
pub async fn run(args: &SimulateArgs) -> Result<(), HandCricketError> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let scenario = Scenario::load(&args.scenario)?;

    tracing::info!(scenario = %args.scenario.display(), "running scenario");
    let run = scenario::run(&scenario, config).await?;

    let file_log = match &args.events {
        Some(path) => Some(Arc::new(EventLog::from_file(path)?)),
        None => None,
    };
    let stdout_log = matches!(args.format, OutputFormat::Json).then(EventLog::stdout);

    for event in &run.events {
        if let Some(log) = &file_log {
            log.record(run.handle.id, run.handle.group, event);
        }
        match &stdout_log {
            Some(log) => log.record(run.handle.id, run.handle.group, event),
            None => println!("{}", render::describe(event, &run.names)),
        }
    }

    tracing::info!(events = run.events.len(), "scenario complete");
    Ok(())
}
