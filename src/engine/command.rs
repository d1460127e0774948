//! Engine input commands.
//!
//! Every way the outside world can poke a running match funnels into the
//! [`Command`] enum and through one mpsc queue per match, so the actor
//! observes a strictly serialized stream regardless of how many ports,
//! timers, and host commands race against each other.

use tokio::sync::oneshot;

use super::stats::Scorecard;
use super::types::{PlayerId, Role};

/// Which of the three delivery timers fired.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TimerKind {
    /// First warning (30 seconds remaining)
    WarningFirst,
    /// Final warning (10 seconds remaining)
    WarningFinal,
    /// Hard deadline: forfeit the delivery
    Forfeit,
}

/// A command consumed by a match actor.
#[derive(Debug)]
pub enum Command {
    /// Host selected a batter (striker, non-striker, or replacement,
    /// depending on the current phase).
    SelectBatter {
        /// The chosen player
        player: PlayerId,
    },

    /// Host selected a bowler for the coming over.
    SelectBowler {
        /// The chosen player
        player: PlayerId,
    },

    /// A digit arrived on the shared group port (striker's domain, 0-6).
    GroupDigit {
        /// Who sent it
        sender: PlayerId,
        /// The digit
        digit: u8,
    },

    /// A digit arrived on the private port (bowler's domain, 1-6).
    PrivateDigit {
        /// Who sent it
        sender: PlayerId,
        /// The digit
        digit: u8,
    },

    /// External trigger starting the second innings.
    StartSecondInnings,

    /// Tear the match down.
    Abort,

    /// Snapshot the live scorecard.
    Scorecard {
        /// Reply channel
        reply: oneshot::Sender<Scorecard>,
    },

    /// A scheduled timer fired. Carries the epoch captured at schedule
    /// time; the actor ignores it when the match has since moved on.
    TimerFired {
        /// Epoch at schedule time
        epoch: u64,
        /// The awaited role the timer was attached to
        role: Role,
        /// Which of the three timers fired
        kind: TimerKind,
    },
}
