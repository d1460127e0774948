//! `validate` — check files without running anything.

use std::path::Path;

use crate::cli::args::{FileKind, OutputFormat, ValidateArgs};
use crate::config::EngineConfig;
use crate::error::{ConfigError, HandCricketError};
use crate::scenario::Scenario;

/// Validate each file, report per-file results, and fail on the first
/// category of error encountered.
///
/// # Errors
///
/// Returns the first validation error after reporting all files.
pub fn run(args: &ValidateArgs) -> Result<(), HandCricketError> {
    let mut first_error: Option<ConfigError> = None;

    for path in &args.files {
        let result = check(path, args.kind);
        match (&result, args.format) {
            (Ok(summary), OutputFormat::Human) => {
                println!("{}: OK ({summary})", path.display());
            }
            (Ok(summary), OutputFormat::Json) => {
                println!(
                    "{}",
                    serde_json::json!({
                        "file": path.display().to_string(),
                        "valid": true,
                        "summary": summary,
                    })
                );
            }
            (Err(e), OutputFormat::Human) => {
                println!("{}: INVALID ({e})", path.display());
            }
            (Err(e), OutputFormat::Json) => {
                println!(
                    "{}",
                    serde_json::json!({
                        "file": path.display().to_string(),
                        "valid": false,
                        "error": e.to_string(),
                    })
                );
            }
        }
        if let Err(e) = result {
            first_error.get_or_insert(e);
        }
    }

    first_error.map_or(Ok(()), |e| Err(HandCricketError::Config(e)))
}

fn check(path: &Path, kind: FileKind) -> Result<String, ConfigError> {
    match kind {
        FileKind::Scenario => {
            let scenario = Scenario::load(path)?;
            Ok(format!(
                "{} overs, {} vs {}, {} actions",
                scenario.overs,
                scenario.team_a.name,
                scenario.team_b.name,
                scenario.actions.len()
            ))
        }
        FileKind::EngineConfig => {
            let config = EngineConfig::load(path)?;
            Ok(format!(
                "deadline {:?}, escalation after {} misses",
                config.forfeit_deadline, config.miss_escalation
            ))
        }
    }
}
