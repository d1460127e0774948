//! Engine output events.
//!
//! Everything the engine has to say to the outside world — prompts,
//! warnings, resolutions, boundaries, results — is one of these variants.
//! The presentation layer (chat bot, CLI frontend, test harness)
//! subscribes to the match's event stream and renders them however it
//! likes; the engine never formats text.

use serde::Serialize;

use super::types::{BallOutcome, MatchResult, PlayerId, Role, TeamId};

/// A discrete event emitted by a running match.
///
/// Variants are tagged with `"type"` when serialized so consumers can
/// dispatch on the event kind.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A delivery has started; the bowler must send a number (1-6).
    PromptBowler {
        /// The awaited bowler
        bowler: PlayerId,
    },

    /// The bowl number is locked; the striker must send a number (0-6).
    PromptBatter {
        /// The awaited striker
        batter: PlayerId,
        /// Completed overs
        over: u32,
        /// One-based ball number within the over
        ball: u32,
    },

    /// A timeout warning for the awaited party.
    WarningIssued {
        /// Who is being warned
        role: Role,
        /// Seconds remaining until forfeiture
        seconds_left: u64,
    },

    /// A delivery resolved to an outcome.
    BallResolved {
        /// Wicket or runs
        outcome: BallOutcome,
        /// Score after applying the outcome
        score_after: i32,
    },

    /// Third consecutive wicket by the same spell.
    Hattrick {
        /// The bowler on a hattrick
        bowler: PlayerId,
    },

    /// The striker tried to play 0 on the hattrick ball; re-prompted.
    HattrickBallRejected {
        /// The re-prompted striker
        batter: PlayerId,
    },

    /// A wicket closed the running partnership.
    PartnershipBroken {
        /// Partnership runs
        runs: u32,
        /// Partnership balls
        balls: u32,
    },

    /// The running partnership crossed 50 or 100.
    PartnershipMilestone {
        /// The milestone crossed
        runs: u32,
    },

    /// Six counted deliveries done; the over is complete.
    OverCompleted {
        /// Zero-based index of the completed over
        over_index: u32,
        /// Whether the over conceded zero runs
        maiden: bool,
    },

    /// A batter took their place (striker, non-striker, or replacement).
    BatterIn {
        /// The incoming batter
        batter: PlayerId,
        /// One-based batting-order position
        order: u32,
    },

    /// A bowler was accepted for the current over.
    BowlerSet {
        /// The selected bowler
        bowler: PlayerId,
    },

    /// The host must select a bowler for the coming over.
    PromptNewBowler,

    /// The host must select a replacement batter.
    PromptNewBatter,

    /// The bowler missed the deadline: runs awarded, ball not counted.
    BowlerForfeited {
        /// The forfeiting bowler
        bowler: PlayerId,
        /// Runs awarded to the batting side
        penalty_runs: u32,
    },

    /// The batter missed the deadline: penalty applied, ball counted.
    BatterForfeited {
        /// The forfeiting striker
        batter: PlayerId,
        /// Runs deducted from the batting side
        penalty_runs: u32,
    },

    /// Repeated delays suspended the bowler.
    BowlerSuspended {
        /// The suspended bowler
        bowler: PlayerId,
        /// Last over index (zero-based) the suspension covers
        until_over: u32,
    },

    /// Repeated delays dismissed the striker.
    WicketOnNeglect {
        /// The dismissed striker
        batter: PlayerId,
    },

    /// An innings ended (all out, overs exhausted, or target passed).
    InningsEnded {
        /// Which innings ended (1 or 2)
        innings: u8,
        /// Final innings score
        score: i32,
        /// Wickets down
        wickets: u32,
    },

    /// The second innings is underway.
    SecondInningsStarted {
        /// Runs required to win
        target: i32,
        /// Side now batting
        batting_team: TeamId,
    },

    /// The match is over; the aggregate resets after this event.
    MatchEnded {
        /// Win or tie
        result: MatchResult,
    },

    /// The match was torn down by an explicit abort.
    MatchAborted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_tagged() {
        let event = EngineEvent::OverCompleted {
            over_index: 3,
            maiden: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "over_completed");
        assert_eq!(json["over_index"], 3);
        assert_eq!(json["maiden"], true);
    }

    #[test]
    fn ball_resolved_carries_outcome() {
        let event = EngineEvent::BallResolved {
            outcome: BallOutcome::Runs(4),
            score_after: 10,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ball_resolved");
        assert_eq!(json["score_after"], 10);
    }

    #[test]
    fn match_ended_carries_result() {
        let event = EngineEvent::MatchEnded {
            result: MatchResult::Tie,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["result"]["result"], "tie");
    }
}
