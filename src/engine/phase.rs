//! Match phases and the guarded transition table.
//!
//! The original system tracked phases as ad hoc strings; here the phase set
//! is a closed enum and every transition goes through [`Phase::can_enter`],
//! so an illegal hop is caught at the single choke point instead of
//! scattering string comparisons through the engine.

use serde::Serialize;

/// The phase a match is currently in.
///
/// Selection phases (`SetStriker`, `SetNonStriker`, `SetBowler`,
/// `NewBatter`) gate host selection commands; `Play` is driven by the
/// delivery handshake and timers; `Switch` halts between innings until the
/// external second-innings trigger arrives.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No match running (also the post-result state)
    Idle,
    /// Awaiting the opening striker
    SetStriker,
    /// Awaiting the opening non-striker
    SetNonStriker,
    /// Awaiting a bowler for the coming over
    SetBowler,
    /// Delivery loop: bowl number, then bat number
    Play,
    /// A wicket fell; awaiting the replacement batter
    NewBatter,
    /// First innings done; halted until the switch trigger
    Switch,
}

impl Phase {
    /// Stable lowercase name for logs and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::SetStriker => "set_striker",
            Self::SetNonStriker => "set_non_striker",
            Self::SetBowler => "set_bowler",
            Self::Play => "play",
            Self::NewBatter => "new_batter",
            Self::Switch => "switch",
        }
    }

    /// Whether a transition from `self` to `to` is legal.
    ///
    /// Any phase may drop to `Idle` (abort, result, invariant bailout).
    /// Everything else follows the match flow:
    /// `set_striker → set_non_striker → set_bowler → play`, with `play`
    /// looping through `new_batter` / `set_bowler` and exiting via
    /// `switch` (first innings) or `Idle` (result).
    #[must_use]
    pub const fn can_enter(self, to: Self) -> bool {
        match (self, to) {
            // Reset is always legal.
            (_, Self::Idle) => true,
            (Self::Idle, Self::SetStriker)
            | (Self::SetStriker, Self::SetNonStriker)
            | (Self::SetNonStriker, Self::SetBowler)
            | (Self::SetBowler, Self::Play)
            | (Self::Play, Self::NewBatter | Self::SetBowler | Self::Switch)
            // Wicket on the last ball of an over: the replacement batter
            // comes in first, then the over boundary settles.
            | (Self::NewBatter, Self::Play | Self::SetBowler)
            | (Self::Switch, Self::SetStriker) => true,
            _ => false,
        }
    }

    /// Whether the delivery handshake is live in this phase.
    #[must_use]
    pub const fn is_play(self) -> bool {
        matches!(self, Self::Play)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Phase; 7] = [
        Phase::Idle,
        Phase::SetStriker,
        Phase::SetNonStriker,
        Phase::SetBowler,
        Phase::Play,
        Phase::NewBatter,
        Phase::Switch,
    ];

    #[test]
    fn forward_flow_is_legal() {
        assert!(Phase::Idle.can_enter(Phase::SetStriker));
        assert!(Phase::SetStriker.can_enter(Phase::SetNonStriker));
        assert!(Phase::SetNonStriker.can_enter(Phase::SetBowler));
        assert!(Phase::SetBowler.can_enter(Phase::Play));
        assert!(Phase::Play.can_enter(Phase::NewBatter));
        assert!(Phase::Play.can_enter(Phase::SetBowler));
        assert!(Phase::Play.can_enter(Phase::Switch));
        assert!(Phase::NewBatter.can_enter(Phase::Play));
        assert!(Phase::NewBatter.can_enter(Phase::SetBowler));
        assert!(Phase::Switch.can_enter(Phase::SetStriker));
    }

    #[test]
    fn every_phase_can_reset() {
        for p in ALL {
            assert!(p.can_enter(Phase::Idle), "{p} should reset");
        }
    }

    #[test]
    fn backward_hops_are_illegal() {
        assert!(!Phase::Play.can_enter(Phase::SetStriker));
        assert!(!Phase::SetBowler.can_enter(Phase::SetNonStriker));
        assert!(!Phase::Switch.can_enter(Phase::Play));
        assert!(!Phase::Idle.can_enter(Phase::Play));
        assert!(!Phase::NewBatter.can_enter(Phase::Switch));
    }

    #[test]
    fn names_are_stable() {
        let names: Vec<&str> = ALL.iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            [
                "idle",
                "set_striker",
                "set_non_striker",
                "set_bowler",
                "play",
                "new_batter",
                "switch"
            ]
        );
    }

    #[test]
    fn only_play_is_play() {
        for p in ALL {
            assert_eq!(p.is_play(), p == Phase::Play);
        }
    }
}
