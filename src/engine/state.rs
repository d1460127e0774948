//! The match aggregate and its transition logic.
//!
//! `MatchState` owns every field of one running match and applies all
//! mutations synchronously: selection commands, the two-phase delivery
//! handshake, forfeiture, over/innings boundaries, and result
//! determination. The actor in [`super::machine`] is the only caller, so
//! mutation is strictly serialized per match; keeping the logic
//! synchronous also means the whole engine is unit-testable without a
//! runtime.
//!
//! Every public mutation either returns the events it produced or a
//! rejection that provably left the state untouched (guards run before
//! the first write).

use std::collections::{HashMap, HashSet};

use crate::config::EngineConfig;
use crate::error::EngineError;

use super::event::EngineEvent;
use super::phase::Phase;
use super::resolver::{self, Resolution};
use super::stats::{BatterLine, BowlerLine, ChaseLine, Scorecard, StatsAggregator};
use super::types::{
    BallOutcome, BallRecord, GroupId, MatchId, MatchResult, PlayerId, RosterReady, Team, TeamId,
};

/// Balls per over.
pub const BALLS_PER_OVER: u32 = 6;

/// Full state of one match.
///
/// Owned exclusively by the match actor; see the module docs for the
/// serialization contract.
#[derive(Debug)]
pub struct MatchState {
    /// Fresh per match instance, for log/event correlation
    pub id: MatchId,
    /// The hosting group
    pub group: GroupId,
    /// Timing/penalty knobs
    pub config: EngineConfig,
    /// Current phase
    pub phase: Phase,

    /// Team A roster
    pub team_a: Team,
    /// Team B roster
    pub team_b: Team,
    /// Side currently batting
    pub batting_team: TeamId,
    /// Side currently bowling
    pub bowling_team: TeamId,

    /// Overs per innings
    pub overs_total: u32,
    /// Completed overs in the running innings
    pub current_over: u32,
    /// Counted balls in the current over (0-5, 6 transiently at the boundary)
    pub current_ball: u32,

    /// Score, signed (forfeiture penalties are unclamped)
    pub score: i32,
    /// Wickets down
    pub wickets: u32,
    /// All-out threshold, fixed once per innings when the non-striker is set
    pub max_wickets: u32,

    /// 1 or 2
    pub innings: u8,
    /// First-innings total, set at the switch
    pub first_innings_score: i32,

    /// Batter on strike
    pub striker: Option<PlayerId>,
    /// Batter at the other end
    pub non_striker: Option<PlayerId>,
    /// Bowler for the current over
    pub bowler: Option<PlayerId>,
    /// Bowler of the previous over (may not bowl consecutive overs)
    pub last_over_bowler: Option<PlayerId>,
    /// Players who have already batted or been dismissed this innings
    pub used_batters: HashSet<PlayerId>,

    /// Awaiting the bowler's number
    pub awaiting_bowl: bool,
    /// Awaiting the striker's number
    pub awaiting_bat: bool,
    /// Latch against duplicate submissions for the in-flight delivery
    pub ball_locked: bool,
    /// Accepted bowl number for the in-flight delivery
    pub pending_bowl: Option<u8>,
    /// Accepted bat number for the in-flight delivery
    pub pending_bat: Option<u8>,

    /// Consecutive bowler forfeits, reset on any accepted bowl
    pub bowler_miss_count: u32,
    /// Consecutive batter forfeits, reset on any accepted bat
    pub batter_miss_count: u32,
    /// Suspended bowlers → last over index (zero-based) they sit out
    pub suspended_bowlers: HashMap<PlayerId, u32>,

    /// Consecutive wickets, for hattrick detection
    pub wicket_streak: u32,
    /// Runs off the bat in the current over (penalties excluded)
    pub current_over_runs: u32,

    /// Figures, partnership, and the over log
    pub stats: StatsAggregator,

    /// Monotonic counter invalidating stale timers
    pub timer_epoch: u64,
}

impl MatchState {
    /// Builds a match from a completed roster, entering `set_striker`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvariantViolation`] when the roster is
    /// unusable (sides identical, too few batters, zero overs) — the
    /// roster subsystem is trusted, so a bad handoff is internal.
    pub fn new(
        group: GroupId,
        roster: RosterReady,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        if roster.batting_team == roster.bowling_team {
            return Err(EngineError::InvariantViolation(
                "roster: batting and bowling sides are the same team".to_string(),
            ));
        }
        if roster.overs_total == 0 {
            return Err(EngineError::InvariantViolation(
                "roster: overs_total must be at least 1".to_string(),
            ));
        }
        if roster.team_a.players.len() < 2 || roster.team_b.players.len() < 2 {
            return Err(EngineError::InvariantViolation(
                "roster: each side needs at least two players".to_string(),
            ));
        }

        Ok(Self {
            id: MatchId::new(),
            group,
            config,
            phase: Phase::SetStriker,
            team_a: roster.team_a,
            team_b: roster.team_b,
            batting_team: roster.batting_team,
            bowling_team: roster.bowling_team,
            overs_total: roster.overs_total,
            current_over: 0,
            current_ball: 0,
            score: 0,
            wickets: 0,
            max_wickets: 0,
            innings: 1,
            first_innings_score: 0,
            striker: None,
            non_striker: None,
            bowler: None,
            last_over_bowler: None,
            used_batters: HashSet::new(),
            awaiting_bowl: false,
            awaiting_bat: false,
            ball_locked: false,
            pending_bowl: None,
            pending_bat: None,
            bowler_miss_count: 0,
            batter_miss_count: 0,
            suspended_bowlers: HashMap::new(),
            wicket_streak: 0,
            current_over_runs: 0,
            stats: StatsAggregator::default(),
            timer_epoch: 0,
        })
    }

    // ------------------------------------------------------------------
    // Small accessors
    // ------------------------------------------------------------------

    /// The side currently batting.
    #[must_use]
    pub const fn batting_side(&self) -> &Team {
        match self.batting_team {
            TeamId::A => &self.team_a,
            TeamId::B => &self.team_b,
        }
    }

    /// The side currently bowling.
    #[must_use]
    pub const fn bowling_side(&self) -> &Team {
        match self.bowling_team {
            TeamId::A => &self.team_a,
            TeamId::B => &self.team_b,
        }
    }

    /// Counted balls bowled so far this innings.
    #[must_use]
    pub const fn balls_bowled(&self) -> u32 {
        self.current_over * BALLS_PER_OVER + self.current_ball
    }

    /// Display name across both rosters.
    #[must_use]
    pub fn display_name(&self, player: PlayerId) -> &str {
        self.team_a
            .display_name(player)
            .or_else(|| self.team_b.display_name(player))
            .unwrap_or("player")
    }

    /// Invalidates every timer scheduled so far and returns the new epoch.
    pub const fn bump_epoch(&mut self) -> u64 {
        self.timer_epoch += 1;
        self.timer_epoch
    }

    /// Cross-field consistency check, run by the actor after every
    /// accepted command. A failure aborts this match only.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvariantViolation`] describing the first
    /// inconsistency found.
    pub fn verify(&self) -> Result<(), EngineError> {
        if self.awaiting_bowl && self.awaiting_bat {
            return Err(EngineError::InvariantViolation(
                "awaiting both bowler and batter".to_string(),
            ));
        }
        if (self.awaiting_bowl || self.awaiting_bat) && !self.phase.is_play() {
            return Err(EngineError::InvariantViolation(format!(
                "awaiting input outside play (phase {})",
                self.phase
            )));
        }
        if self.phase.is_play() && (self.striker.is_none() || self.bowler.is_none()) {
            return Err(EngineError::InvariantViolation(
                "play phase without striker and bowler".to_string(),
            ));
        }
        if self.current_ball > BALLS_PER_OVER {
            return Err(EngineError::InvariantViolation(format!(
                "ball counter out of range: {}",
                self.current_ball
            )));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Selection commands
    // ------------------------------------------------------------------

    /// Applies a host batter selection in `set_striker`, `set_non_striker`,
    /// or `new_batter`.
    ///
    /// # Errors
    ///
    /// [`EngineError::PhaseViolation`] outside the selection phases,
    /// [`EngineError::SelectionViolation`] for ineligible players. No
    /// state changes on rejection.
    pub fn select_batter(&mut self, player: PlayerId) -> Result<Vec<EngineEvent>, EngineError> {
        match self.phase {
            Phase::SetStriker | Phase::SetNonStriker | Phase::NewBatter => {}
            _ => {
                return Err(EngineError::PhaseViolation {
                    phase: self.phase.name(),
                    command: "select_batter",
                });
            }
        }

        if !self.batting_side().contains(player) {
            return Err(EngineError::SelectionViolation {
                player,
                reason: "not on the batting side".to_string(),
            });
        }
        if self.used_batters.contains(&player) {
            return Err(EngineError::SelectionViolation {
                player,
                reason: "already batted or was dismissed".to_string(),
            });
        }

        let mut events = Vec::new();
        match self.phase {
            Phase::SetStriker => {
                self.striker = Some(player);
                self.used_batters.insert(player);
                self.stats.batter_mut(player);
                self.set_phase(Phase::SetNonStriker)?;
                events.push(self.batter_in_event(player));
                events.push(EngineEvent::PromptNewBatter);
            }
            Phase::SetNonStriker => {
                self.non_striker = Some(player);
                self.used_batters.insert(player);
                self.stats.batter_mut(player);
                // Fixed here for the whole innings, even if the roster
                // subsystem later mutates (it rejects edits mid-match).
                self.max_wickets =
                    u32::try_from(self.batting_side().players.len().saturating_sub(1))
                        .unwrap_or(u32::MAX);
                self.set_phase(Phase::SetBowler)?;
                events.push(self.batter_in_event(player));
                events.push(EngineEvent::PromptNewBowler);
            }
            Phase::NewBatter => {
                self.striker = Some(player);
                self.used_batters.insert(player);
                self.stats.batter_mut(player);
                events.push(self.batter_in_event(player));
                if self.current_ball >= BALLS_PER_OVER {
                    // The wicket fell on the last ball; the over boundary
                    // was deferred until the replacement arrived.
                    events.extend(self.complete_over()?);
                } else {
                    self.set_phase(Phase::Play)?;
                    events.extend(self.begin_delivery()?);
                }
            }
            _ => unreachable!("guarded above"),
        }
        Ok(events)
    }

    fn batter_in_event(&self, player: PlayerId) -> EngineEvent {
        EngineEvent::BatterIn {
            batter: player,
            order: u32::try_from(self.used_batters.len()).unwrap_or(u32::MAX),
        }
    }

    /// Applies a host bowler selection in `set_bowler`.
    ///
    /// # Errors
    ///
    /// [`EngineError::PhaseViolation`] outside `set_bowler`;
    /// [`EngineError::SelectionViolation`] for the last over's bowler, a
    /// suspended bowler, or a player not on the bowling side.
    pub fn select_bowler(&mut self, player: PlayerId) -> Result<Vec<EngineEvent>, EngineError> {
        if self.phase != Phase::SetBowler {
            return Err(EngineError::PhaseViolation {
                phase: self.phase.name(),
                command: "select_bowler",
            });
        }
        if !self.bowling_side().contains(player) {
            return Err(EngineError::SelectionViolation {
                player,
                reason: "not on the bowling side".to_string(),
            });
        }
        if self.last_over_bowler == Some(player) {
            return Err(EngineError::SelectionViolation {
                player,
                reason: "bowled the previous over".to_string(),
            });
        }
        if let Some(&until) = self.suspended_bowlers.get(&player) {
            if until >= self.current_over {
                return Err(EngineError::SelectionViolation {
                    player,
                    reason: format!("suspended through over {}", until + 1),
                });
            }
            // The window has lapsed; forget it.
            self.suspended_bowlers.remove(&player);
        }

        self.bowler = Some(player);
        self.stats.begin_over(self.current_over, player);
        self.set_phase(Phase::Play)?;

        let mut events = vec![EngineEvent::BowlerSet { bowler: player }];
        events.extend(self.begin_delivery()?);
        Ok(events)
    }

    // ------------------------------------------------------------------
    // Delivery handshake
    // ------------------------------------------------------------------

    /// Opens a fresh delivery: bowl awaited, lock cleared.
    ///
    /// Requires striker and bowler to be set and the phase to be `play`.
    fn begin_delivery(&mut self) -> Result<Vec<EngineEvent>, EngineError> {
        let bowler = self
            .bowler
            .ok_or_else(|| EngineError::InvariantViolation("delivery opened without a bowler".to_string()))?;
        self.awaiting_bowl = true;
        self.awaiting_bat = false;
        self.ball_locked = false;
        self.pending_bowl = None;
        self.pending_bat = None;
        Ok(vec![EngineEvent::PromptBowler { bowler }])
    }

    /// Accepts the bowler's number off the private port.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidInput`] for wrong sender, wrong domain, or
    /// input while no bowl is awaited. No state changes on rejection.
    pub fn submit_bowl(
        &mut self,
        sender: PlayerId,
        digit: u8,
    ) -> Result<Vec<EngineEvent>, EngineError> {
        if !self.phase.is_play() || !self.awaiting_bowl {
            return Err(EngineError::InvalidInput {
                sender,
                reason: "not accepting a bowl now".to_string(),
            });
        }
        if self.bowler != Some(sender) {
            return Err(EngineError::InvalidInput {
                sender,
                reason: "not the current bowler".to_string(),
            });
        }
        if !(1..=6).contains(&digit) {
            return Err(EngineError::out_of_range(sender, super::types::Role::Bowler, digit));
        }
        if self.ball_locked {
            return Err(EngineError::InvalidInput {
                sender,
                reason: "already submitted for this delivery".to_string(),
            });
        }

        let batter = self
            .striker
            .ok_or_else(|| EngineError::InvariantViolation("bowl accepted without a striker".to_string()))?;
        self.pending_bowl = Some(digit);
        self.awaiting_bowl = false;
        self.awaiting_bat = true;
        self.bowler_miss_count = 0;

        Ok(vec![EngineEvent::PromptBatter {
            batter,
            over: self.current_over,
            ball: self.current_ball + 1,
        }])
    }

    /// Accepts the striker's number off the group port and resolves the
    /// delivery.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidInput`] for wrong sender, wrong domain,
    /// duplicate submission, or input while no bat is awaited. No state
    /// changes on rejection.
    pub fn submit_bat(
        &mut self,
        sender: PlayerId,
        digit: u8,
    ) -> Result<Vec<EngineEvent>, EngineError> {
        if !self.phase.is_play() || !self.awaiting_bat {
            return Err(EngineError::InvalidInput {
                sender,
                reason: "not accepting a bat now".to_string(),
            });
        }
        if self.striker != Some(sender) {
            return Err(EngineError::InvalidInput {
                sender,
                reason: "not the striker".to_string(),
            });
        }
        if digit > 6 {
            return Err(EngineError::out_of_range(sender, super::types::Role::Batter, digit));
        }
        if self.ball_locked {
            return Err(EngineError::InvalidInput {
                sender,
                reason: "already submitted for this delivery".to_string(),
            });
        }

        let bowl = self.pending_bowl.ok_or_else(|| {
            EngineError::InvariantViolation("bat awaited without an accepted bowl".to_string())
        })?;

        self.ball_locked = true;
        self.pending_bat = Some(digit);
        self.awaiting_bat = false;
        self.batter_miss_count = 0;

        match resolver::resolve(digit, bowl, self.wicket_streak) {
            Resolution::HattrickBan => {
                // Sole input-dependent re-prompt: unlock and await a
                // different number. The original left the lock set and
                // deadlocked the delivery.
                self.ball_locked = false;
                self.pending_bat = None;
                self.awaiting_bat = true;
                Ok(vec![EngineEvent::HattrickBallRejected { batter: sender }])
            }
            Resolution::Outcome(outcome) => self.apply_counted_delivery(digit, bowl, outcome),
        }
    }

    // ------------------------------------------------------------------
    // Counted-delivery application + innings control
    // ------------------------------------------------------------------

    /// Applies a resolved outcome and runs the over/innings/match
    /// boundary checks, in order: all-out, wicket replacement, chase
    /// completion, over completion, next delivery.
    fn apply_counted_delivery(
        &mut self,
        bat: u8,
        _bowl: u8,
        outcome: BallOutcome,
    ) -> Result<Vec<EngineEvent>, EngineError> {
        let striker = self.striker.ok_or_else(|| {
            EngineError::InvariantViolation("counted delivery without a striker".to_string())
        })?;
        let bowler = self.bowler.ok_or_else(|| {
            EngineError::InvariantViolation("counted delivery without a bowler".to_string())
        })?;

        self.stats.batter_mut(striker).balls_faced += 1;
        let figures = self.stats.bowler_mut(bowler);
        figures.balls_bowled += 1;
        figures.per_ball.push(bat);

        let mut events = Vec::new();
        match outcome {
            BallOutcome::Wicket => {
                self.wickets += 1;
                self.wicket_streak += 1;
                self.stats.bowler_mut(bowler).wickets_taken += 1;
                self.current_ball += 1;
                self.stats.log_ball(BallRecord::Wicket);
                self.stats.partnership_balls += 1;

                events.push(EngineEvent::BallResolved {
                    outcome,
                    score_after: self.score,
                });
                if self.wicket_streak == 3 {
                    events.push(EngineEvent::Hattrick { bowler });
                }
                let (runs, balls) = self.stats.partnership_break();
                events.push(EngineEvent::PartnershipBroken { runs, balls });

                self.used_batters.insert(striker);
                self.striker = None;

                if self.wickets >= self.max_wickets {
                    events.extend(self.end_innings()?);
                } else if self.innings_would_close_at_over_boundary() {
                    events.extend(self.end_innings()?);
                } else {
                    self.awaiting_bat = false;
                    self.awaiting_bowl = false;
                    self.set_phase(Phase::NewBatter)?;
                    events.push(EngineEvent::PromptNewBatter);
                }
            }
            BallOutcome::Runs(runs) => {
                let runs_i32 = i32::from(runs);
                self.score += runs_i32;
                self.current_over_runs += u32::from(runs);
                self.stats.batter_mut(striker).runs_scored += runs_i32;
                self.stats.bowler_mut(bowler).runs_conceded += u32::from(runs);
                self.current_ball += 1;
                self.stats.log_ball(BallRecord::Runs(i8::try_from(runs).unwrap_or(i8::MAX)));
                self.wicket_streak = 0;

                events.push(EngineEvent::BallResolved {
                    outcome,
                    score_after: self.score,
                });
                if let Some(milestone) = self.stats.partnership_add(u32::from(runs)) {
                    events.push(EngineEvent::PartnershipMilestone { runs: milestone });
                }
                if outcome.rotates_strike() {
                    self.swap_strike();
                }

                if self.innings == 2 && self.score > self.first_innings_score {
                    // Chase complete: the match ends mid-over.
                    events.extend(self.end_innings()?);
                } else if self.current_ball >= BALLS_PER_OVER {
                    events.extend(self.complete_over()?);
                } else {
                    events.extend(self.begin_delivery()?);
                }
            }
        }
        Ok(events)
    }

    /// Whether a wicket just taken on the final ball of the final over
    /// closes the innings outright (no replacement batter needed).
    const fn innings_would_close_at_over_boundary(&self) -> bool {
        self.current_ball >= BALLS_PER_OVER && self.current_over + 1 >= self.overs_total
    }

    /// Runs over completion: maiden signal, counter resets, innings-end
    /// check, strike rotation, and the demand for a fresh bowler.
    fn complete_over(&mut self) -> Result<Vec<EngineEvent>, EngineError> {
        let mut events = vec![EngineEvent::OverCompleted {
            over_index: self.current_over,
            maiden: self.current_over_runs == 0,
        }];

        self.current_over += 1;
        self.current_ball = 0;
        self.current_over_runs = 0;
        self.wicket_streak = 0;

        if self.current_over >= self.overs_total {
            events.extend(self.end_innings()?);
            return Ok(events);
        }

        self.last_over_bowler = self.bowler.take();
        self.swap_strike();
        self.awaiting_bowl = false;
        self.awaiting_bat = false;
        self.ball_locked = false;
        self.set_phase(Phase::SetBowler)?;
        events.push(EngineEvent::PromptNewBowler);
        Ok(events)
    }

    // ------------------------------------------------------------------
    // Forfeiture
    // ------------------------------------------------------------------

    /// Applies the hard-deadline forfeit for the awaited role.
    ///
    /// Called by the actor only with a live epoch; if the match has
    /// nevertheless moved on, this is a no-op.
    ///
    /// # Errors
    ///
    /// Propagates [`EngineError::InvariantViolation`] from boundary
    /// handling.
    pub fn forfeit(&mut self, role: super::types::Role) -> Result<Vec<EngineEvent>, EngineError> {
        match role {
            super::types::Role::Bowler if self.awaiting_bowl => self.forfeit_bowler(),
            super::types::Role::Batter if self.awaiting_bat => self.forfeit_batter(),
            _ => Ok(Vec::new()),
        }
    }

    /// Bowler missed the deadline: runs awarded, delivery NOT counted.
    fn forfeit_bowler(&mut self) -> Result<Vec<EngineEvent>, EngineError> {
        let bowler = self.bowler.ok_or_else(|| {
            EngineError::InvariantViolation("bowler forfeit without a bowler".to_string())
        })?;

        self.awaiting_bowl = false;
        self.bowler_miss_count += 1;
        self.score += i32::try_from(self.config.forfeit_runs).unwrap_or(6);

        let mut events = vec![EngineEvent::BowlerForfeited {
            bowler,
            penalty_runs: self.config.forfeit_runs,
        }];

        if self.bowler_miss_count >= self.config.miss_escalation {
            self.bowler_miss_count = 0;
            let until = self.current_over + self.config.suspension_overs;
            self.suspended_bowlers.insert(bowler, until);
            self.bowler = None;
            self.ball_locked = false;
            self.set_phase(Phase::SetBowler)?;
            events.push(EngineEvent::BowlerSuspended {
                bowler,
                until_over: until,
            });
            events.push(EngineEvent::PromptNewBowler);
        } else {
            // Ball counter untouched: a fresh attempt at the same delivery.
            events.extend(self.begin_delivery()?);
        }
        Ok(events)
    }

    /// Batter missed the deadline: penalty applied, delivery counted
    /// toward the over and the batter's balls faced (bowler figures and
    /// the partnership are untouched by a plain miss).
    fn forfeit_batter(&mut self) -> Result<Vec<EngineEvent>, EngineError> {
        let striker = self.striker.ok_or_else(|| {
            EngineError::InvariantViolation("batter forfeit without a striker".to_string())
        })?;

        self.awaiting_bat = false;
        self.ball_locked = false;
        self.pending_bowl = None;
        self.batter_miss_count += 1;

        let penalty = i32::try_from(self.config.forfeit_runs).unwrap_or(6);
        self.score -= penalty;
        self.current_ball += 1;
        let figures = self.stats.batter_mut(striker);
        figures.runs_scored -= penalty;
        figures.balls_faced += 1;

        let mut events = vec![EngineEvent::BatterForfeited {
            batter: striker,
            penalty_runs: self.config.forfeit_runs,
        }];

        if self.batter_miss_count >= self.config.miss_escalation {
            // Out on neglect.
            self.batter_miss_count = 0;
            self.wickets += 1;
            self.stats.log_ball(BallRecord::Wicket);
            events.push(EngineEvent::WicketOnNeglect { batter: striker });
            let (runs, balls) = self.stats.partnership_break();
            events.push(EngineEvent::PartnershipBroken { runs, balls });

            self.used_batters.insert(striker);
            self.striker = None;

            if self.wickets >= self.max_wickets {
                events.extend(self.end_innings()?);
            } else if self.innings_would_close_at_over_boundary() {
                events.extend(self.end_innings()?);
            } else {
                self.set_phase(Phase::NewBatter)?;
                events.push(EngineEvent::PromptNewBatter);
            }
        } else {
            self.stats
                .log_ball(BallRecord::Runs(i8::try_from(penalty).map_or(i8::MIN, |p| -p)));
            if self.current_ball >= BALLS_PER_OVER {
                events.extend(self.complete_over()?);
            } else {
                events.extend(self.begin_delivery()?);
            }
        }
        Ok(events)
    }

    // ------------------------------------------------------------------
    // Innings and match boundaries
    // ------------------------------------------------------------------

    /// Ends the running innings: records the first-innings total and
    /// halts at `switch`, or settles the match after the second.
    fn end_innings(&mut self) -> Result<Vec<EngineEvent>, EngineError> {
        self.awaiting_bowl = false;
        self.awaiting_bat = false;
        self.ball_locked = false;
        self.pending_bowl = None;
        self.pending_bat = None;

        let mut events = vec![EngineEvent::InningsEnded {
            innings: self.innings,
            score: self.score,
            wickets: self.wickets,
        }];

        if self.innings == 1 {
            self.first_innings_score = self.score;
            self.set_phase(Phase::Switch)?;
            return Ok(events);
        }

        let result = match self.score.cmp(&self.first_innings_score) {
            std::cmp::Ordering::Greater => MatchResult::Won {
                team: self.batting_team,
                first_innings: self.first_innings_score,
                second_innings: self.score,
            },
            std::cmp::Ordering::Less => MatchResult::Won {
                team: self.bowling_team,
                first_innings: self.first_innings_score,
                second_innings: self.score,
            },
            std::cmp::Ordering::Equal => MatchResult::Tie,
        };
        events.push(EngineEvent::MatchEnded { result });
        self.set_phase(Phase::Idle)?;
        Ok(events)
    }

    /// External second-innings trigger: swaps sides, clears per-innings
    /// counters, and demands a fresh opening pair and bowler.
    ///
    /// # Errors
    ///
    /// [`EngineError::PhaseViolation`] outside `switch`.
    pub fn start_second_innings(&mut self) -> Result<Vec<EngineEvent>, EngineError> {
        if self.phase != Phase::Switch {
            return Err(EngineError::PhaseViolation {
                phase: self.phase.name(),
                command: "start_second_innings",
            });
        }

        self.innings = 2;
        std::mem::swap(&mut self.batting_team, &mut self.bowling_team);

        self.score = 0;
        self.wickets = 0;
        self.max_wickets = 0;
        self.current_over = 0;
        self.current_ball = 0;
        self.current_over_runs = 0;
        self.wicket_streak = 0;
        self.bowler_miss_count = 0;
        self.batter_miss_count = 0;
        self.striker = None;
        self.non_striker = None;
        self.bowler = None;
        self.last_over_bowler = None;
        self.used_batters.clear();
        self.suspended_bowlers.clear();
        self.awaiting_bowl = false;
        self.awaiting_bat = false;
        self.ball_locked = false;
        self.pending_bowl = None;
        self.pending_bat = None;
        self.stats.reset_for_innings();

        self.set_phase(Phase::SetStriker)?;
        Ok(vec![
            EngineEvent::SecondInningsStarted {
                target: self.first_innings_score + 1,
                batting_team: self.batting_team,
            },
            EngineEvent::PromptNewBatter,
        ])
    }

    /// Tears the match down on explicit abort.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the reset transition is always legal.
    pub fn abort(&mut self) -> Result<Vec<EngineEvent>, EngineError> {
        self.awaiting_bowl = false;
        self.awaiting_bat = false;
        self.set_phase(Phase::Idle)?;
        Ok(vec![EngineEvent::MatchAborted])
    }

    /// Whether the match has reached its terminal state.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Idle
    }

    // ------------------------------------------------------------------
    // Scorecard
    // ------------------------------------------------------------------

    /// Builds a point-in-time scorecard snapshot.
    #[must_use]
    pub fn scorecard(&self) -> Scorecard {
        let balls_bowled = self.balls_bowled();
        let chase = (self.innings == 2).then(|| {
            let target = self.first_innings_score + 1;
            let runs_needed = (target - self.score).max(0);
            let balls_left = (self.overs_total * BALLS_PER_OVER).saturating_sub(balls_bowled);
            let required_run_rate = (runs_needed > 0 && balls_left > 0)
                .then(|| f64::from(runs_needed) / f64::from(balls_left) * 6.0);
            ChaseLine {
                target,
                runs_needed,
                balls_left,
                required_run_rate,
            }
        });

        let batters = [(self.striker, true), (self.non_striker, false)]
            .into_iter()
            .filter_map(|(slot, on_strike)| {
                let player = slot?;
                let figures = self.stats.batters.get(&player).copied().unwrap_or_default();
                Some(BatterLine {
                    player,
                    name: self.display_name(player).to_string(),
                    runs: figures.runs_scored,
                    balls: figures.balls_faced,
                    strike_rate: figures.strike_rate(),
                    on_strike,
                })
            })
            .collect();

        let bowler = self.bowler.map(|player| {
            let figures = self.stats.bowlers.get(&player).cloned().unwrap_or_default();
            let (overs, over_balls) = figures.overs_figure();
            BowlerLine {
                player,
                name: self.display_name(player).to_string(),
                overs,
                over_balls,
                dots: figures.dot_balls(),
                runs: figures.runs_conceded,
                wickets: figures.wickets_taken,
                economy: figures.economy(),
            }
        });

        Scorecard {
            innings: self.innings,
            batting_team: self.batting_team,
            bowling_team: self.bowling_team,
            score: self.score,
            wickets: self.wickets,
            max_wickets: self.max_wickets,
            current_over: self.current_over,
            current_ball: self.current_ball,
            overs_total: self.overs_total,
            run_rate: Scorecard::run_rate_for(self.score, balls_bowled),
            chase,
            batters,
            bowler,
            partnership: (self.stats.partnership_runs, self.stats.partnership_balls),
            over_history: self.stats.over_history.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn swap_strike(&mut self) {
        std::mem::swap(&mut self.striker, &mut self.non_striker);
    }

    fn set_phase(&mut self, to: Phase) -> Result<(), EngineError> {
        if !self.phase.can_enter(to) {
            return Err(EngineError::InvariantViolation(format!(
                "illegal phase transition {} -> {}",
                self.phase, to
            )));
        }
        tracing::debug!(match_id = %self.id, from = %self.phase, to = %to, "phase transition");
        self.phase = to;
        Ok(())
    }
}
