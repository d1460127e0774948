//! Core identifier and value types for the match engine.
//!
//! Newtype wrappers keep player and group identifiers from being confused
//! with ordinary integers, and the small closed enums here (`TeamId`,
//! `Role`, `BallOutcome`) are the vocabulary every other engine module
//! speaks.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Newtype wrapper for player identifiers.
///
/// Player ids come from the external roster subsystem and are opaque to
/// the engine; equality and hashing are all it ever needs.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player:{}", self.0)
    }
}

/// Newtype wrapper for group identifiers.
///
/// One group hosts at most one active match at a time.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub i64);

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "group:{}", self.0)
    }
}

/// Unique id for one match instance, fresh per match.
///
/// Used for log and event correlation; a reset always mints a new one.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub Uuid);

impl MatchId {
    /// Mints a fresh match id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two sides of a match.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum TeamId {
    /// Team A
    A,
    /// Team B
    B,
}

impl TeamId {
    /// Returns the opposing side.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// A rostered player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Opaque player id
    pub id: PlayerId,
    /// Name used by the presentation layer
    pub display_name: String,
}

/// One team: id, name, and an ordered player list.
///
/// Order matters — the roster subsystem puts the captain first and
/// selection commands index into this order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Which side this is
    pub id: TeamId,
    /// Team name chosen during roster assembly
    pub name: String,
    /// Ordered player list, captain first
    pub players: Vec<Player>,
}

impl Team {
    /// Returns `true` when the given player is on this team.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == player)
    }

    /// Looks up a player's display name.
    #[must_use]
    pub fn display_name(&self, player: PlayerId) -> Option<&str> {
        self.players
            .iter()
            .find(|p| p.id == player)
            .map(|p| p.display_name.as_str())
    }
}

/// Everything the roster/toss subsystem hands over to start a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterReady {
    /// Team A roster
    pub team_a: Team,
    /// Team B roster
    pub team_b: Team,
    /// Captain of team A
    pub captain_a: PlayerId,
    /// Captain of team B
    pub captain_b: PlayerId,
    /// Side batting first (toss outcome)
    pub batting_team: TeamId,
    /// Side bowling first
    pub bowling_team: TeamId,
    /// Number of overs per innings
    pub overs_total: u32,
}

/// The awaited party for the in-flight delivery.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Role {
    /// The current striker (group port, digits 0-6)
    Batter,
    /// The current bowler (private port, digits 1-6)
    Bowler,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Batter => write!(f, "batter"),
            Self::Bowler => write!(f, "bowler"),
        }
    }
}

/// Outcome of one resolved delivery.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "runs", rename_all = "snake_case")]
pub enum BallOutcome {
    /// Batter and bowler picked the same number
    Wicket,
    /// Runs scored (the batter's number, 0-6)
    Runs(u8),
}

impl BallOutcome {
    /// Strike rotates after odd-run deliveries.
    #[must_use]
    pub const fn rotates_strike(self) -> bool {
        matches!(self, Self::Runs(1 | 3 | 5))
    }
}

/// One entry in an over's ball log.
///
/// Runs are signed: a counted batter-forfeit delivery is logged as `-6`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "runs", rename_all = "snake_case")]
pub enum BallRecord {
    /// Runs off the bat (or a forfeiture penalty)
    Runs(i8),
    /// A wicket fell on this delivery
    Wicket,
}

/// Final result of a match.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum MatchResult {
    /// One side finished ahead
    Won {
        /// The winning side
        team: TeamId,
        /// First-innings total
        first_innings: i32,
        /// Second-innings total
        second_innings: i32,
    },
    /// Scores level at the natural end of the second innings
    Tie,
}
