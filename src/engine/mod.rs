//! The match engine.
//!
//! A match is an actor ([`machine`]) owning a synchronous aggregate
//! ([`state`]). Digits come in through typed ports, deadlines through the
//! [`scheduler`], and everything the engine says goes out as
//! [`event::EngineEvent`]s.

pub mod command;
pub mod event;
pub mod machine;
pub mod phase;
pub mod resolver;
pub mod scheduler;
pub mod state;
pub mod stats;
pub mod types;

pub use command::{Command, TimerKind};
pub use event::EngineEvent;
pub use machine::{MatchHandle, spawn};
pub use phase::Phase;
pub use state::MatchState;
pub use stats::Scorecard;
pub use types::{
    BallOutcome, BallRecord, GroupId, MatchId, MatchResult, Player, PlayerId, Role, RosterReady,
    Team, TeamId,
};
