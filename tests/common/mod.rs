//! Shared integration-test harness: canned rosters, actor spawning, and
//! event-stream helpers.

#![allow(dead_code)]

use handcricket::config::EngineConfig;
use handcricket::engine::event::EngineEvent;
use handcricket::engine::machine::{self, MatchHandle};
use handcricket::engine::types::{GroupId, Player, PlayerId, RosterReady, Team, TeamId};
use tokio::sync::broadcast;

/// Players 1..=n bat for Alpha, 101..=100+n bowl for Bravo.
pub fn roster(per_side: usize, overs: u32) -> RosterReady {
    let players = |base: u64| -> Vec<Player> {
        (0..per_side as u64)
            .map(|n| Player {
                id: PlayerId(base + n),
                display_name: format!("p{}", base + n),
            })
            .collect()
    };
    RosterReady {
        team_a: Team {
            id: TeamId::A,
            name: "Alpha".to_string(),
            players: players(1),
        },
        team_b: Team {
            id: TeamId::B,
            name: "Bravo".to_string(),
            players: players(101),
        },
        captain_a: PlayerId(1),
        captain_b: PlayerId(101),
        batting_team: TeamId::A,
        bowling_team: TeamId::B,
        overs_total: overs,
    }
}

/// Spawns a match actor with default timing.
pub fn spawn(
    per_side: usize,
    overs: u32,
) -> (MatchHandle, broadcast::Receiver<EngineEvent>) {
    machine::spawn(GroupId(-1000), roster(per_side, overs), EngineConfig::default())
        .expect("roster must be valid")
}

/// Drives selection to the first delivery: striker 1, non-striker 2,
/// bowler 101, and waits until the actor has applied everything.
pub async fn to_play(handle: &MatchHandle) {
    handle.select_batter(PlayerId(1)).await.unwrap();
    handle.select_batter(PlayerId(2)).await.unwrap();
    handle.select_bowler(PlayerId(101)).await.unwrap();
    barrier(handle).await;
}

/// Waits until every previously sent command has been applied.
pub async fn barrier(handle: &MatchHandle) {
    handle.scorecard().await.expect("actor alive");
}

/// Plays one counted delivery through the two-phase handshake.
pub async fn deliver(handle: &MatchHandle, bowler: PlayerId, striker: PlayerId, bowl: u8, bat: u8) {
    handle.private_digit(bowler, bowl).await.unwrap();
    handle.group_digit(striker, bat).await.unwrap();
    // Tolerant barrier: the delivery may have ended the match.
    let _ = handle.scorecard().await;
}

/// Receives events until one matches, returning it. Panics if the stream
/// closes first.
pub async fn wait_for<F>(rx: &mut broadcast::Receiver<EngineEvent>, mut pred: F) -> EngineEvent
where
    F: FnMut(&EngineEvent) -> bool,
{
    loop {
        let event = rx.recv().await.expect("event stream closed while waiting");
        if pred(&event) {
            return event;
        }
    }
}

/// Drains everything currently buffered on the stream.
pub fn drain(rx: &mut broadcast::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
