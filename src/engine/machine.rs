//! The per-match actor.
//!
//! Every match runs as one spawned task owning its [`MatchState`]
//! exclusively. Inputs of any origin (host commands, port digits, timer
//! expirations) arrive on a single mpsc queue and are applied one at a
//! time, so no mutation ever races another; outputs fan out on a
//! broadcast channel that presentation layers and recorders subscribe to.
//!
//! The actor is also where timers meet state: every accepted mutation
//! bumps the epoch and re-arms (or cancels) the deadline timers against
//! the new awaited role, and any `TimerFired` carrying an old epoch is
//! discarded unprocessed.

use tokio::sync::{broadcast, mpsc, oneshot};

use crate::config::EngineConfig;
use crate::error::EngineError;

use super::command::{Command, TimerKind};
use super::event::EngineEvent;
use super::scheduler::TurnScheduler;
use super::state::MatchState;
use super::stats::Scorecard;
use super::types::{GroupId, MatchId, PlayerId, RosterReady, Role};

const COMMAND_QUEUE_DEPTH: usize = 64;
const EVENT_CHANNEL_DEPTH: usize = 256;

/// A cheap clonable handle to a running match actor.
#[derive(Debug, Clone)]
pub struct MatchHandle {
    /// Match instance id
    pub id: MatchId,
    /// Hosting group
    pub group: GroupId,
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<EngineEvent>,
}

impl MatchHandle {
    /// Subscribes to the match's event stream from this point on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// Whether the actor has shut down.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Host batter selection.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoActiveMatch`] when the actor is gone.
    pub async fn select_batter(&self, player: PlayerId) -> Result<(), EngineError> {
        self.send(Command::SelectBatter { player }).await
    }

    /// Host bowler selection.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoActiveMatch`] when the actor is gone.
    pub async fn select_bowler(&self, player: PlayerId) -> Result<(), EngineError> {
        self.send(Command::SelectBowler { player }).await
    }

    /// A digit off the shared group port.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoActiveMatch`] when the actor is gone.
    pub async fn group_digit(&self, sender: PlayerId, digit: u8) -> Result<(), EngineError> {
        self.send(Command::GroupDigit { sender, digit }).await
    }

    /// A digit off the private port.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoActiveMatch`] when the actor is gone.
    pub async fn private_digit(&self, sender: PlayerId, digit: u8) -> Result<(), EngineError> {
        self.send(Command::PrivateDigit { sender, digit }).await
    }

    /// Starts the second innings (valid only at the innings switch).
    ///
    /// # Errors
    ///
    /// [`EngineError::NoActiveMatch`] when the actor is gone.
    pub async fn start_second_innings(&self) -> Result<(), EngineError> {
        self.send(Command::StartSecondInnings).await
    }

    /// Tears the match down.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoActiveMatch`] when the actor is gone.
    pub async fn abort(&self) -> Result<(), EngineError> {
        self.send(Command::Abort).await
    }

    /// Snapshots the live scorecard.
    ///
    /// Also serves as a barrier: the reply proves every previously sent
    /// command has been applied.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoActiveMatch`] when the actor is gone.
    pub async fn scorecard(&self) -> Result<Scorecard, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Scorecard { reply }).await?;
        rx.await.map_err(|_| EngineError::NoActiveMatch)
    }

    async fn send(&self, command: Command) -> Result<(), EngineError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| EngineError::NoActiveMatch)
    }
}

/// Spawns the actor for a freshly rostered match.
///
/// Returns the handle plus an event receiver opened before the actor
/// starts, so the caller cannot miss the opening prompt.
///
/// # Errors
///
/// [`EngineError::InvariantViolation`] when the roster is unusable.
pub fn spawn(
    group: GroupId,
    roster: RosterReady,
    config: EngineConfig,
) -> Result<(MatchHandle, broadcast::Receiver<EngineEvent>), EngineError> {
    let state = MatchState::new(group, roster, config.clone())?;
    let id = state.id;

    let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
    let (event_tx, event_rx) = broadcast::channel(EVENT_CHANNEL_DEPTH);

    let handle = MatchHandle {
        id,
        group,
        commands: command_tx.clone(),
        events: event_tx.clone(),
    };

    let actor = MatchActor {
        state,
        commands: command_rx,
        scheduler: TurnScheduler::new(config, command_tx),
        events: event_tx,
    };
    tokio::spawn(actor.run());

    metrics::counter!("handcricket_matches_started_total").increment(1);
    tracing::info!(match_id = %id, group = %group.0, "match actor started");

    Ok((handle, event_rx))
}

struct MatchActor {
    state: MatchState,
    commands: mpsc::Receiver<Command>,
    scheduler: TurnScheduler,
    events: broadcast::Sender<EngineEvent>,
}

impl MatchActor {
    async fn run(mut self) {
        // Opening prompt: the host must pick the striker.
        self.emit(vec![EngineEvent::PromptNewBatter]);

        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Scorecard { reply } => {
                    let _ = reply.send(self.state.scorecard());
                    continue;
                }
                Command::TimerFired { epoch, role, kind } => {
                    if epoch != self.state.timer_epoch {
                        tracing::debug!(
                            match_id = %self.state.id,
                            timer_epoch = epoch,
                            live_epoch = self.state.timer_epoch,
                            "stale timer discarded"
                        );
                        metrics::counter!("handcricket_stale_timers_total").increment(1);
                        continue;
                    }
                    match kind {
                        TimerKind::WarningFirst => {
                            // Warnings leave the state (and epoch) alone so
                            // the forfeit timer stays live.
                            self.emit(vec![EngineEvent::WarningIssued {
                                role,
                                seconds_left: self.state.config.first_warning_seconds_left(),
                            }]);
                        }
                        TimerKind::WarningFinal => {
                            self.emit(vec![EngineEvent::WarningIssued {
                                role,
                                seconds_left: self.state.config.final_warning_seconds_left(),
                            }]);
                        }
                        TimerKind::Forfeit => {
                            metrics::counter!("handcricket_forfeits_total").increment(1);
                            let result = self.state.forfeit(role);
                            if self.apply(result).is_break() {
                                break;
                            }
                        }
                    }
                    continue;
                }
                Command::SelectBatter { player } => {
                    let result = self.state.select_batter(player);
                    if self.apply(result).is_break() {
                        break;
                    }
                }
                Command::SelectBowler { player } => {
                    let result = self.state.select_bowler(player);
                    if self.apply(result).is_break() {
                        break;
                    }
                }
                Command::GroupDigit { sender, digit } => {
                    let result = self.state.submit_bat(sender, digit);
                    if self.apply(result).is_break() {
                        break;
                    }
                }
                Command::PrivateDigit { sender, digit } => {
                    let result = self.state.submit_bowl(sender, digit);
                    if self.apply(result).is_break() {
                        break;
                    }
                }
                Command::StartSecondInnings => {
                    let result = self.state.start_second_innings();
                    if self.apply(result).is_break() {
                        break;
                    }
                }
                Command::Abort => {
                    let result = self.state.abort();
                    if self.apply(result).is_break() {
                        break;
                    }
                }
            }
        }

        self.scheduler.cancel();
        metrics::counter!("handcricket_matches_finished_total").increment(1);
        tracing::info!(match_id = %self.state.id, "match actor stopped");
    }

    /// Applies one mutation result: emits events, retimes, verifies.
    fn apply(&mut self, result: Result<Vec<EngineEvent>, EngineError>) -> std::ops::ControlFlow<()> {
        match result {
            Ok(events) => {
                if events.is_empty() {
                    return std::ops::ControlFlow::Continue(());
                }
                let epoch = self.state.bump_epoch();
                if self.state.awaiting_bowl {
                    self.scheduler.arm(epoch, Role::Bowler);
                } else if self.state.awaiting_bat {
                    self.scheduler.arm(epoch, Role::Batter);
                } else {
                    self.scheduler.cancel();
                }
                self.emit(events);

                if let Err(violation) = self.state.verify() {
                    tracing::error!(
                        match_id = %self.state.id,
                        error = %violation,
                        "invariant violation, aborting match"
                    );
                    metrics::counter!("handcricket_invariant_violations_total").increment(1);
                    self.emit(vec![EngineEvent::MatchAborted]);
                    return std::ops::ControlFlow::Break(());
                }
                if self.state.is_finished() {
                    return std::ops::ControlFlow::Break(());
                }
                std::ops::ControlFlow::Continue(())
            }
            Err(rejection) if rejection.is_rejection() => {
                // Bad input never advances state or resets the clock.
                tracing::warn!(match_id = %self.state.id, error = %rejection, "input rejected");
                metrics::counter!("handcricket_rejections_total").increment(1);
                std::ops::ControlFlow::Continue(())
            }
            Err(violation) => {
                tracing::error!(
                    match_id = %self.state.id,
                    error = %violation,
                    "invariant violation, aborting match"
                );
                metrics::counter!("handcricket_invariant_violations_total").increment(1);
                self.emit(vec![EngineEvent::MatchAborted]);
                std::ops::ControlFlow::Break(())
            }
        }
    }

    fn emit(&self, events: Vec<EngineEvent>) {
        for event in events {
            tracing::debug!(match_id = %self.state.id, event = ?event, "event");
            metrics::counter!("handcricket_events_total").increment(1);
            // No subscribers is fine; recording is optional.
            let _ = self.events.send(event);
        }
    }
}
