//! Batting/bowling figures, the over-by-over ball log, and the live
//! scorecard snapshot.
//!
//! Everything here is plain bookkeeping: the accumulators are mutated by
//! the match state after each counted delivery, and the derived metrics
//! (strike rate, economy, run rates) are computed on read. Scores are
//! signed because forfeiture penalties are applied unclamped.

use std::collections::HashMap;

use serde::Serialize;

use super::types::{BallRecord, PlayerId, TeamId};

// ---------------------------------------------------------------------------
// Per-player figures
// ---------------------------------------------------------------------------

/// Accumulated batting figures for one player.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BattingFigures {
    /// Runs scored (signed: forfeiture penalties subtract)
    pub runs_scored: i32,
    /// Deliveries faced, forfeited deliveries included
    pub balls_faced: u32,
}

impl BattingFigures {
    /// Strike rate: `runs / balls * 100`, `0.0` before the first ball.
    #[must_use]
    pub fn strike_rate(&self) -> f64 {
        if self.balls_faced == 0 {
            0.0
        } else {
            f64::from(self.runs_scored) / f64::from(self.balls_faced) * 100.0
        }
    }
}

/// Accumulated bowling figures for one player.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BowlingFigures {
    /// Counted deliveries bowled
    pub balls_bowled: u32,
    /// Runs conceded off the bat
    pub runs_conceded: u32,
    /// Wickets taken
    pub wickets_taken: u32,
    /// Bat number faced on each counted delivery, in order
    pub per_ball: Vec<u8>,
}

impl BowlingFigures {
    /// Economy: `runs conceded / balls bowled * 6`, `0.0` before the
    /// first ball.
    #[must_use]
    pub fn economy(&self) -> f64 {
        if self.balls_bowled == 0 {
            0.0
        } else {
            f64::from(self.runs_conceded) / f64::from(self.balls_bowled) * 6.0
        }
    }

    /// Overs figure as `(completed, balls)`, e.g. 14 balls → `(2, 2)`.
    #[must_use]
    pub const fn overs_figure(&self) -> (u32, u32) {
        (self.balls_bowled / 6, self.balls_bowled % 6)
    }

    /// Dot balls: counted deliveries on which the batter played 0.
    #[must_use]
    pub fn dot_balls(&self) -> u32 {
        u32::try_from(self.per_ball.iter().filter(|&&b| b == 0).count()).unwrap_or(u32::MAX)
    }
}

// ---------------------------------------------------------------------------
// Over history
// ---------------------------------------------------------------------------

/// The ball-by-ball log of one over.
#[derive(Debug, Clone, Serialize)]
pub struct OverRecord {
    /// Zero-based over index within the innings
    pub over_index: u32,
    /// Bowler attributed to this over (the most recent, if replaced mid-over)
    pub bowler: PlayerId,
    /// Counted deliveries, in order
    pub balls: Vec<BallRecord>,
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Per-innings statistics: player figures, partnership, over log.
///
/// Reset wholesale at the innings switch; player figure maps persist for
/// the whole match so both innings appear on the final card.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    /// Batting figures per player, match lifetime
    pub batters: HashMap<PlayerId, BattingFigures>,
    /// Bowling figures per player, match lifetime
    pub bowlers: HashMap<PlayerId, BowlingFigures>,
    /// Completed-and-current over log for the running innings
    pub over_history: Vec<OverRecord>,
    /// Runs by the current batting pair since the last wicket
    pub partnership_runs: u32,
    /// Balls faced by the current batting pair since the last wicket
    pub partnership_balls: u32,
}

/// Partnership milestones announced once each per partnership.
const PARTNERSHIP_MILESTONES: [u32; 2] = [50, 100];

impl StatsAggregator {
    /// Mutable batting figures for a player, created on first touch.
    pub fn batter_mut(&mut self, player: PlayerId) -> &mut BattingFigures {
        self.batters.entry(player).or_default()
    }

    /// Mutable bowling figures for a player, created on first touch.
    pub fn bowler_mut(&mut self, player: PlayerId) -> &mut BowlingFigures {
        self.bowlers.entry(player).or_default()
    }

    /// Opens the ball log for an over, or re-attributes the current over
    /// when a bowler is replaced mid-over (suspension). The existing ball
    /// log is kept in that case.
    pub fn begin_over(&mut self, over_index: u32, bowler: PlayerId) {
        if let Some(last) = self.over_history.last_mut() {
            if last.over_index == over_index {
                last.bowler = bowler;
                return;
            }
        }
        self.over_history.push(OverRecord {
            over_index,
            bowler,
            balls: Vec::new(),
        });
    }

    /// Appends a counted delivery to the current over's log.
    pub fn log_ball(&mut self, record: BallRecord) {
        if let Some(last) = self.over_history.last_mut() {
            last.balls.push(record);
        }
    }

    /// Adds runs and a ball to the running partnership, returning the
    /// milestone crossed by this delivery, if any.
    pub fn partnership_add(&mut self, runs: u32) -> Option<u32> {
        let before = self.partnership_runs;
        self.partnership_runs += runs;
        self.partnership_balls += 1;
        PARTNERSHIP_MILESTONES
            .into_iter()
            .find(|&m| before < m && self.partnership_runs >= m)
    }

    /// Closes the partnership on a wicket, returning its `(runs, balls)`.
    pub fn partnership_break(&mut self) -> (u32, u32) {
        let closed = (self.partnership_runs, self.partnership_balls);
        self.partnership_runs = 0;
        self.partnership_balls = 0;
        closed
    }

    /// Clears per-innings state; player figures survive.
    pub fn reset_for_innings(&mut self) {
        self.over_history.clear();
        self.partnership_runs = 0;
        self.partnership_balls = 0;
    }
}

// ---------------------------------------------------------------------------
// Scorecard snapshot
// ---------------------------------------------------------------------------

/// One batter's line on the live scorecard.
#[derive(Debug, Clone, Serialize)]
pub struct BatterLine {
    /// Player id
    pub player: PlayerId,
    /// Display name
    pub name: String,
    /// Runs scored
    pub runs: i32,
    /// Balls faced
    pub balls: u32,
    /// Strike rate
    pub strike_rate: f64,
    /// Whether this batter is on strike
    pub on_strike: bool,
}

/// The current bowler's line on the live scorecard.
#[derive(Debug, Clone, Serialize)]
pub struct BowlerLine {
    /// Player id
    pub player: PlayerId,
    /// Display name
    pub name: String,
    /// Completed overs in the figure
    pub overs: u32,
    /// Balls into the current over of the figure
    pub over_balls: u32,
    /// Dot balls
    pub dots: u32,
    /// Runs conceded
    pub runs: u32,
    /// Wickets taken
    pub wickets: u32,
    /// Economy
    pub economy: f64,
}

/// Chase context, present only in the second innings.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ChaseLine {
    /// `first_innings_score + 1`
    pub target: i32,
    /// Runs still needed (zero once the target is reached)
    pub runs_needed: i32,
    /// Balls left in the innings
    pub balls_left: u32,
    /// Required run rate, `None` when no balls remain or target reached
    pub required_run_rate: Option<f64>,
}

/// A point-in-time snapshot of the live match, answerable at any phase.
#[derive(Debug, Clone, Serialize)]
pub struct Scorecard {
    /// Current innings (1 or 2)
    pub innings: u8,
    /// Batting side
    pub batting_team: TeamId,
    /// Bowling side
    pub bowling_team: TeamId,
    /// Score (signed)
    pub score: i32,
    /// Wickets down
    pub wickets: u32,
    /// Wickets in hand limit
    pub max_wickets: u32,
    /// Completed overs
    pub current_over: u32,
    /// Balls into the current over
    pub current_ball: u32,
    /// Overs per innings
    pub overs_total: u32,
    /// Run rate so far, `0.0` before the first ball
    pub run_rate: f64,
    /// Chase context (second innings only)
    pub chase: Option<ChaseLine>,
    /// Striker and non-striker lines, when set
    pub batters: Vec<BatterLine>,
    /// Current bowler line, when set
    pub bowler: Option<BowlerLine>,
    /// Current partnership `(runs, balls)`
    pub partnership: (u32, u32),
    /// Over-by-over ball log
    pub over_history: Vec<OverRecord>,
}

impl Scorecard {
    /// Run rate for a raw `(score, balls)` pair: `score / balls * 6`.
    #[must_use]
    pub fn run_rate_for(score: i32, balls_bowled: u32) -> f64 {
        if balls_bowled == 0 {
            0.0
        } else {
            f64::from(score) / f64::from(balls_bowled) * 6.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strike_rate_zero_before_first_ball() {
        let figures = BattingFigures::default();
        assert!((figures.strike_rate() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn strike_rate_basic() {
        let figures = BattingFigures {
            runs_scored: 30,
            balls_faced: 20,
        };
        assert!((figures.strike_rate() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn negative_runs_give_negative_strike_rate() {
        let figures = BattingFigures {
            runs_scored: -6,
            balls_faced: 1,
        };
        assert!(figures.strike_rate() < 0.0);
    }

    #[test]
    fn economy_twelve_balls_eight_runs_is_four() {
        let figures = BowlingFigures {
            balls_bowled: 12,
            runs_conceded: 8,
            wickets_taken: 0,
            per_ball: vec![],
        };
        assert!((figures.economy() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn economy_zero_before_first_ball() {
        assert!((BowlingFigures::default().economy() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn overs_figure_and_dots() {
        let figures = BowlingFigures {
            balls_bowled: 14,
            runs_conceded: 9,
            wickets_taken: 2,
            per_ball: vec![0, 4, 0, 1, 0, 6],
        };
        assert_eq!(figures.overs_figure(), (2, 2));
        assert_eq!(figures.dot_balls(), 3);
    }

    #[test]
    fn begin_over_pushes_then_reattributes() {
        let mut stats = StatsAggregator::default();
        stats.begin_over(0, PlayerId(1));
        stats.log_ball(BallRecord::Runs(4));

        // Mid-over replacement keeps the log, swaps the bowler.
        stats.begin_over(0, PlayerId(2));
        assert_eq!(stats.over_history.len(), 1);
        assert_eq!(stats.over_history[0].bowler, PlayerId(2));
        assert_eq!(stats.over_history[0].balls.len(), 1);

        stats.begin_over(1, PlayerId(1));
        assert_eq!(stats.over_history.len(), 2);
    }

    #[test]
    fn partnership_milestones_fire_once() {
        let mut stats = StatsAggregator::default();
        stats.partnership_runs = 48;
        assert_eq!(stats.partnership_add(2), Some(50));
        assert_eq!(stats.partnership_add(6), None);
        stats.partnership_runs = 99;
        assert_eq!(stats.partnership_add(1), Some(100));
    }

    #[test]
    fn partnership_break_resets() {
        let mut stats = StatsAggregator::default();
        stats.partnership_add(4);
        stats.partnership_add(1);
        assert_eq!(stats.partnership_break(), (5, 2));
        assert_eq!(stats.partnership_runs, 0);
        assert_eq!(stats.partnership_balls, 0);
    }

    #[test]
    fn innings_reset_keeps_player_figures() {
        let mut stats = StatsAggregator::default();
        stats.batter_mut(PlayerId(1)).runs_scored = 12;
        stats.begin_over(0, PlayerId(9));
        stats.partnership_add(4);

        stats.reset_for_innings();
        assert!(stats.over_history.is_empty());
        assert_eq!(stats.partnership_runs, 0);
        assert_eq!(stats.batters[&PlayerId(1)].runs_scored, 12);
    }

    #[test]
    fn run_rate_for_basic() {
        assert!((Scorecard::run_rate_for(48, 24) - 12.0).abs() < 1e-9);
        assert!((Scorecard::run_rate_for(10, 0) - 0.0).abs() < f64::EPSILON);
    }
}
