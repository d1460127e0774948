//! Scripted matches.
//!
//! A scenario file describes a full match in YAML: both rosters, the
//! overs, and a list of actions to feed the engine in order. Running one
//! spawns a real match actor, drives it action by action, and returns
//! every event the engine emitted, which makes scenarios both a demo
//! vehicle and an end-to-end fixture format.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tokio::sync::broadcast;

use crate::config::EngineConfig;
use crate::engine::event::EngineEvent;
use crate::engine::machine::{self, MatchHandle};
use crate::engine::types::{GroupId, Player, PlayerId, RosterReady, Team, TeamId};
use crate::error::{ConfigError, EngineError, HandCricketError};

/// A parsed scenario file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Overs per innings.
    pub overs: u32,
    /// First side.
    pub team_a: ScenarioTeam,
    /// Second side.
    pub team_b: ScenarioTeam,
    /// Which side bats first (defaults to `a`).
    #[serde(default)]
    pub batting_first: ScenarioSide,
    /// Actions applied in order.
    ///
    /// `singleton_map_recursive` makes the `- action: { ... }` map form
    /// parse; plain tagged enums would demand `!action` YAML tags.
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub actions: Vec<ScenarioAction>,
}

/// A roster entry in a scenario file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioTeam {
    /// Team name.
    pub name: String,
    /// Player display names, unique across the whole file.
    pub players: Vec<String>,
}

/// Which side of the scenario.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioSide {
    /// `team_a`
    #[default]
    A,
    /// `team_b`
    B,
}

/// One scripted input.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioAction {
    /// Host selects a batter (striker, non-striker, or replacement).
    SelectBatter {
        /// Player name
        player: String,
    },
    /// Host selects a bowler.
    SelectBowler {
        /// Player name
        player: String,
    },
    /// A private-port bowl.
    Bowl {
        /// Player name
        player: String,
        /// Called number, 1-6
        digit: u8,
    },
    /// A group-port bat.
    Bat {
        /// Player name
        player: String,
        /// Played number, 0-6
        digit: u8,
    },
    /// Start the second innings.
    StartSecondInnings,
    /// Tear the match down.
    Abort,
}

impl Scenario {
    /// Loads a scenario from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing or malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;
        let scenario: Self =
            serde_yaml::from_str(&text).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        scenario.validate(path)?;
        Ok(scenario)
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for name in self
            .team_a
            .players
            .iter()
            .chain(self.team_b.players.iter())
        {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::ParseError {
                    path: path.to_path_buf(),
                    message: format!("duplicate player name: {name}"),
                });
            }
        }
        Ok(())
    }

    /// Builds the roster handoff plus the name → id mapping.
    #[must_use]
    pub fn roster(&self) -> (RosterReady, NameTable) {
        let mut table = NameTable::default();
        let mut build = |names: &[String], base: u64| -> Vec<Player> {
            names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let id = PlayerId(base + i as u64);
                    table.insert(id, name.clone());
                    Player {
                        id,
                        display_name: name.clone(),
                    }
                })
                .collect()
        };
        let players_a = build(&self.team_a.players, 1);
        let players_b = build(&self.team_b.players, 1001);

        let captain_a = players_a[0].id;
        let captain_b = players_b[0].id;
        let (batting_team, bowling_team) = match self.batting_first {
            ScenarioSide::A => (TeamId::A, TeamId::B),
            ScenarioSide::B => (TeamId::B, TeamId::A),
        };

        (
            RosterReady {
                team_a: Team {
                    id: TeamId::A,
                    name: self.team_a.name.clone(),
                    players: players_a,
                },
                team_b: Team {
                    id: TeamId::B,
                    name: self.team_b.name.clone(),
                    players: players_b,
                },
                captain_a,
                captain_b,
                batting_team,
                bowling_team,
                overs_total: self.overs,
            },
            table,
        )
    }
}

/// Bidirectional name/id mapping for rendering and scripting.
#[derive(Debug, Default, Clone)]
pub struct NameTable {
    by_name: HashMap<String, PlayerId>,
    by_id: HashMap<PlayerId, String>,
}

impl NameTable {
    fn insert(&mut self, id: PlayerId, name: String) {
        self.by_name.insert(name.clone(), id);
        self.by_id.insert(id, name);
    }

    /// Resolves a scripted name.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidInput`] naming the unknown player.
    pub fn id_of(&self, name: &str) -> Result<PlayerId, EngineError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::InvalidInput {
                sender: PlayerId(0),
                reason: format!("unknown player: {name}"),
            })
    }

    /// Renders an id back to its name.
    #[must_use]
    pub fn name_of(&self, id: PlayerId) -> &str {
        self.by_id.get(&id).map_or("player", String::as_str)
    }
}

/// Outcome of a scenario run: every event, in emission order.
#[derive(Debug)]
pub struct ScenarioRun {
    /// The driven match's handle (already stopped for finished matches).
    pub handle: MatchHandle,
    /// Name mapping used by the run.
    pub names: NameTable,
    /// All events collected.
    pub events: Vec<EngineEvent>,
}

/// Runs a scenario against a fresh match actor.
///
/// Each action is fully applied (scorecard barrier) before the next is
/// sent, so event order is deterministic. The deadline timers never get
/// a chance to fire.
///
/// # Errors
///
/// Roster errors, unknown player names, or a match that died mid-script.
pub async fn run(
    scenario: &Scenario,
    config: EngineConfig,
) -> Result<ScenarioRun, HandCricketError> {
    let (roster, names) = scenario.roster();
    let (handle, mut events) =
        machine::spawn(GroupId(0), roster, config).map_err(HandCricketError::Engine)?;

    for action in &scenario.actions {
        let sent = apply(&handle, &names, action).await;
        match sent {
            Ok(()) => {}
            // A finished match closes its queue; trailing actions after a
            // result are script slack, not an error.
            Err(EngineError::NoActiveMatch) if handle.is_closed() => break,
            Err(e) => return Err(HandCricketError::Engine(e)),
        }
        // Barrier so the collected stream is in scripted order.
        if let Err(EngineError::NoActiveMatch) = barrier(&handle).await {
            break;
        }
    }

    let mut collected = Vec::new();
    loop {
        match events.try_recv() {
            Ok(event) => collected.push(event),
            Err(broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed) => {
                break;
            }
            Err(broadcast::error::TryRecvError::Lagged(_)) => {}
        }
    }

    Ok(ScenarioRun {
        handle,
        names,
        events: collected,
    })
}

async fn apply(
    handle: &MatchHandle,
    names: &NameTable,
    action: &ScenarioAction,
) -> Result<(), EngineError> {
    match action {
        ScenarioAction::SelectBatter { player } => {
            handle.select_batter(names.id_of(player)?).await
        }
        ScenarioAction::SelectBowler { player } => {
            handle.select_bowler(names.id_of(player)?).await
        }
        ScenarioAction::Bowl { player, digit } => {
            handle.private_digit(names.id_of(player)?, *digit).await
        }
        ScenarioAction::Bat { player, digit } => {
            handle.group_digit(names.id_of(player)?, *digit).await
        }
        ScenarioAction::StartSecondInnings => handle.start_second_innings().await,
        ScenarioAction::Abort => handle.abort().await,
    }
}

async fn barrier(handle: &MatchHandle) -> Result<(), EngineError> {
    handle.scorecard().await.map(|_| ())
}
