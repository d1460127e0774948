//! `play` — an interactive match on the terminal.
//!
//! The roster comes from a scenario file; any scripted actions in it run
//! first, then stdin takes over. One line per input:
//!
//! ```text
//! batter <name>        select a batter (striker, non-striker, replacement)
//! bowler <name>        select a bowler
//! bowl <name> <1-6>    the bowler's secret number
//! bat <name> <0-6>     the striker's number
//! score                print the live scorecard
//! next                 start the second innings
//! abort                tear the match down
//! quit                 leave (aborts a live match)
//! ```
//!
//! The deadline timers run for real, so a dawdling terminal player gets
//! warned and forfeits exactly like a remote one.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

use crate::cli::args::PlayArgs;
use crate::cli::render;
use crate::config::EngineConfig;
use crate::engine::machine::{self, MatchHandle};
use crate::engine::types::GroupId;
use crate::error::HandCricketError;
use crate::ports::{self, GroupPort, PrivatePort};
use crate::scenario::{NameTable, Scenario};

/// Run an interactive match until it ends or the player quits.
///
/// # Errors
///
/// Config/roster loading errors, stdin I/O errors, or engine errors.
pub async fn run(args: &PlayArgs) -> Result<(), HandCricketError> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let scenario = Scenario::load(&args.roster)?;
    let (roster, names) = scenario.roster();

    let (handle, events) = machine::spawn(GroupId(0), roster, config)?;
    let (group_port, private_port) = ports::split(&handle);

    let printer = spawn_printer(events, names.clone());

    // Scripted prelude, if the file carries actions.
    for action in &scenario.actions {
        if apply_scripted(&handle, &names, action).await.is_err() {
            break;
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if handle.is_closed() {
            break;
        }
        match parse_line(&line) {
            Some(Input::Quit) => break,
            Some(input) => {
                if let Err(e) = dispatch(&handle, &group_port, &private_port, &names, input).await
                {
                    // The actor being gone ends the session; everything
                    // else was already logged as a rejection.
                    tracing::debug!(error = %e, "input not delivered");
                    break;
                }
            }
            None => eprintln!("unrecognized input (try: batter/bowler/bowl/bat/score/next/abort/quit)"),
        }
    }

    if !handle.is_closed() {
        let _ = handle.abort().await;
    }
    // The handle keeps the event channel open, so the printer never sees
    // Closed on its own; give it a beat to drain, then stop it.
    tokio::task::yield_now().await;
    printer.abort();
    Ok(())
}

/// One parsed line of terminal input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Batter(String),
    Bowler(String),
    Bowl(String, String),
    Bat(String, String),
    Score,
    Next,
    Abort,
    Quit,
}

fn parse_line(line: &str) -> Option<Input> {
    let mut parts = line.split_whitespace();
    let verb = parts.next()?;
    let input = match (verb, parts.next(), parts.next()) {
        ("batter", Some(name), None) => Input::Batter(name.to_string()),
        ("bowler", Some(name), None) => Input::Bowler(name.to_string()),
        ("bowl", Some(name), Some(digit)) => Input::Bowl(name.to_string(), digit.to_string()),
        ("bat", Some(name), Some(digit)) => Input::Bat(name.to_string(), digit.to_string()),
        ("score", None, None) => Input::Score,
        ("next", None, None) => Input::Next,
        ("abort", None, None) => Input::Abort,
        ("quit" | "exit", None, None) => Input::Quit,
        _ => return None,
    };
    Some(input)
}

async fn dispatch(
    handle: &MatchHandle,
    group_port: &GroupPort,
    private_port: &PrivatePort,
    names: &NameTable,
    input: Input,
) -> Result<(), HandCricketError> {
    match input {
        Input::Batter(name) => match names.id_of(&name) {
            Ok(id) => handle.select_batter(id).await?,
            Err(e) => eprintln!("{e}"),
        },
        Input::Bowler(name) => match names.id_of(&name) {
            Ok(id) => handle.select_bowler(id).await?,
            Err(e) => eprintln!("{e}"),
        },
        Input::Bowl(name, digit) => match names.id_of(&name) {
            Ok(id) => {
                if !private_port.submit(id, &digit).await? {
                    eprintln!("a bowl is a single number 1-6");
                }
            }
            Err(e) => eprintln!("{e}"),
        },
        Input::Bat(name, digit) => match names.id_of(&name) {
            Ok(id) => {
                if !group_port.submit(id, &digit).await? {
                    eprintln!("a bat is a single number 0-6");
                }
            }
            Err(e) => eprintln!("{e}"),
        },
        Input::Score => {
            let card = handle.scorecard().await?;
            print!("{}", render::scoreboard(&card, names));
        }
        Input::Next => handle.start_second_innings().await?,
        Input::Abort => handle.abort().await?,
        Input::Quit => {}
    }
    Ok(())
}

async fn apply_scripted(
    handle: &MatchHandle,
    names: &NameTable,
    action: &crate::scenario::ScenarioAction,
) -> Result<(), HandCricketError> {
    use crate::scenario::ScenarioAction;
    match action {
        ScenarioAction::SelectBatter { player } => {
            handle.select_batter(names.id_of(player)?).await?;
        }
        ScenarioAction::SelectBowler { player } => {
            handle.select_bowler(names.id_of(player)?).await?;
        }
        ScenarioAction::Bowl { player, digit } => {
            handle.private_digit(names.id_of(player)?, *digit).await?;
        }
        ScenarioAction::Bat { player, digit } => {
            handle.group_digit(names.id_of(player)?, *digit).await?;
        }
        ScenarioAction::StartSecondInnings => handle.start_second_innings().await?,
        ScenarioAction::Abort => handle.abort().await?,
    }
    Ok(())
}

fn spawn_printer(
    mut events: broadcast::Receiver<crate::engine::event::EngineEvent>,
    names: NameTable,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => println!("{}", render::describe(&event, &names)),
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_whole_verb_set() {
        assert_eq!(parse_line("batter Asha"), Some(Input::Batter("Asha".into())));
        assert_eq!(parse_line("bowler Chand"), Some(Input::Bowler("Chand".into())));
        assert_eq!(
            parse_line("bowl Chand 3"),
            Some(Input::Bowl("Chand".into(), "3".into()))
        );
        assert_eq!(
            parse_line("  bat Asha 0 "),
            Some(Input::Bat("Asha".into(), "0".into()))
        );
        assert_eq!(parse_line("score"), Some(Input::Score));
        assert_eq!(parse_line("next"), Some(Input::Next));
        assert_eq!(parse_line("abort"), Some(Input::Abort));
        assert_eq!(parse_line("quit"), Some(Input::Quit));
        assert_eq!(parse_line("exit"), Some(Input::Quit));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("bowl Chand"), None);
        assert_eq!(parse_line("score now"), None);
        assert_eq!(parse_line("sweep Asha 4"), None);
    }
}
