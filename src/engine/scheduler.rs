//! Per-delivery turn timers.
//!
//! Each time the engine starts awaiting a submission, the scheduler arms
//! one background task that walks the three configured deadlines (first
//! warning, final warning, forfeit) and reports each back to the actor as
//! a [`Command::TimerFired`] carrying the epoch captured at arm time.
//!
//! Two independent guards keep stale timers harmless: arming (or
//! cancelling) cancels the previous task's token, and the actor discards
//! any `TimerFired` whose epoch no longer matches the match state. Either
//! alone would suffice; together a timer racing a just-accepted
//! submission can never fire against the wrong delivery.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;

use super::command::{Command, TimerKind};
use super::types::Role;

/// Arms and cancels the deadline timers for one match.
#[derive(Debug)]
pub struct TurnScheduler {
    config: EngineConfig,
    commands: mpsc::Sender<Command>,
    current: Option<CancellationToken>,
}

impl TurnScheduler {
    /// Creates a scheduler feeding the given command queue.
    #[must_use]
    pub const fn new(config: EngineConfig, commands: mpsc::Sender<Command>) -> Self {
        Self {
            config,
            commands,
            current: None,
        }
    }

    /// Arms the three deadline timers for the awaited `role`, cancelling
    /// whatever was armed before.
    pub fn arm(&mut self, epoch: u64, role: Role) {
        self.cancel();

        let token = CancellationToken::new();
        self.current = Some(token.clone());

        let commands = self.commands.clone();
        let deadlines = [
            (self.config.first_warning, TimerKind::WarningFirst),
            (self.config.final_warning, TimerKind::WarningFinal),
            (self.config.forfeit_deadline, TimerKind::Forfeit),
        ];

        tokio::spawn(async move {
            let mut elapsed = Duration::ZERO;
            for (at, kind) in deadlines {
                let wait = at.saturating_sub(elapsed);
                tokio::select! {
                    () = token.cancelled() => return,
                    () = tokio::time::sleep(wait) => {}
                }
                elapsed = at;
                if commands
                    .send(Command::TimerFired { epoch, role, kind })
                    .await
                    .is_err()
                {
                    // Actor gone; nothing left to time.
                    return;
                }
            }
        });
    }

    /// Cancels the currently armed timers, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }
}

impl Drop for TurnScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Duration, advance};

    fn fast_config() -> EngineConfig {
        EngineConfig {
            first_warning: Duration::from_secs(3),
            final_warning: Duration::from_secs(5),
            forfeit_deadline: Duration::from_secs(6),
            ..EngineConfig::default()
        }
    }

    fn kind_of(command: &Command) -> TimerKind {
        match command {
            Command::TimerFired { kind, .. } => *kind,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_all_three_deadlines_in_order() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut scheduler = TurnScheduler::new(fast_config(), tx);
        scheduler.arm(7, Role::Bowler);

        advance(Duration::from_secs(3)).await;
        assert_eq!(kind_of(&rx.recv().await.unwrap()), TimerKind::WarningFirst);

        advance(Duration::from_secs(2)).await;
        assert_eq!(kind_of(&rx.recv().await.unwrap()), TimerKind::WarningFinal);

        advance(Duration::from_secs(1)).await;
        let last = rx.recv().await.unwrap();
        match last {
            Command::TimerFired { epoch, role, kind } => {
                assert_eq!(epoch, 7);
                assert_eq!(role, Role::Bowler);
                assert_eq!(kind, TimerKind::Forfeit);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_silences_pending_deadlines() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut scheduler = TurnScheduler::new(fast_config(), tx);
        scheduler.arm(1, Role::Batter);

        advance(Duration::from_secs(3)).await;
        assert_eq!(kind_of(&rx.recv().await.unwrap()), TimerKind::WarningFirst);

        scheduler.cancel();
        advance(Duration::from_secs(10)).await;
        // Channel stays silent; only the scheduler's own sender remains.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_replaces_the_previous_schedule() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut scheduler = TurnScheduler::new(fast_config(), tx);
        scheduler.arm(1, Role::Bowler);

        advance(Duration::from_secs(2)).await;
        scheduler.arm(2, Role::Batter);

        // The old schedule's first warning (1s away) must not fire.
        advance(Duration::from_secs(3)).await;
        let command = rx.recv().await.unwrap();
        match command {
            Command::TimerFired { epoch, role, kind } => {
                assert_eq!(epoch, 2);
                assert_eq!(role, Role::Batter);
                assert_eq!(kind, TimerKind::WarningFirst);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }
}
