//! End-to-end match flow through the actor: full overs, innings switch,
//! chase, and result settlement.

mod common;

use common::{barrier, deliver, spawn, to_play, wait_for};
use handcricket::engine::event::EngineEvent;
use handcricket::engine::types::{BallOutcome, MatchResult, PlayerId, TeamId};

#[tokio::test(start_paused = true)]
async fn full_first_over_accumulates_and_rotates() {
    let (handle, mut rx) = spawn(3, 2);
    to_play(&handle).await;

    // (bowl, bat): 2/1, 5/4, 3/0, 1/2, 2/6, 4/3 => 16 runs, no wicket.
    let balls = [(2, 1), (5, 4), (3, 0), (1, 2), (2, 6), (4, 3)];
    let mut striker = PlayerId(1);
    let mut other = PlayerId(2);
    for (bowl, bat) in balls {
        deliver(&handle, PlayerId(101), striker, bowl, bat).await;
        if bat % 2 == 1 {
            std::mem::swap(&mut striker, &mut other);
        }
    }

    wait_for(&mut rx, |e| {
        matches!(
            e,
            EngineEvent::OverCompleted {
                over_index: 0,
                maiden: false
            }
        )
    })
    .await;
    wait_for(&mut rx, |e| matches!(e, EngineEvent::PromptNewBowler)).await;

    let card = handle.scorecard().await.unwrap();
    assert_eq!(card.score, 16);
    assert_eq!(card.wickets, 0);
    assert_eq!(card.current_over, 1);
    assert_eq!(card.current_ball, 0);
    assert_eq!(card.over_history.len(), 1);
    assert_eq!(card.over_history[0].balls.len(), 6);
}

#[tokio::test(start_paused = true)]
async fn consecutive_over_rule_enforced_through_the_actor() {
    let (handle, mut rx) = spawn(3, 2);
    to_play(&handle).await;

    let mut striker = PlayerId(1);
    let mut other = PlayerId(2);
    for _ in 0..6 {
        deliver(&handle, PlayerId(101), striker, 3, 2).await;
    }
    std::mem::swap(&mut striker, &mut other); // over-boundary rotation

    // Same bowler again: rejected silently, state unchanged.
    handle.select_bowler(PlayerId(101)).await.unwrap();
    barrier(&handle).await;
    let card = handle.scorecard().await.unwrap();
    assert!(card.bowler.is_none());

    handle.select_bowler(PlayerId(102)).await.unwrap();
    wait_for(&mut rx, |e| {
        matches!(e, EngineEvent::BowlerSet { bowler } if *bowler == PlayerId(102))
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn wicket_mid_over_brings_replacement_and_play_resumes() {
    let (handle, mut rx) = spawn(3, 2);
    to_play(&handle).await;

    deliver(&handle, PlayerId(101), PlayerId(1), 4, 4).await;
    wait_for(&mut rx, |e| {
        matches!(
            e,
            EngineEvent::BallResolved {
                outcome: BallOutcome::Wicket,
                ..
            }
        )
    })
    .await;
    wait_for(&mut rx, |e| matches!(e, EngineEvent::PromptNewBatter)).await;

    handle.select_batter(PlayerId(3)).await.unwrap();
    wait_for(&mut rx, |e| {
        matches!(e, EngineEvent::BatterIn { batter, order: 3 } if *batter == PlayerId(3))
    })
    .await;
    wait_for(&mut rx, |e| matches!(e, EngineEvent::PromptBowler { .. })).await;

    let card = handle.scorecard().await.unwrap();
    assert_eq!(card.wickets, 1);
    assert_eq!(card.current_ball, 1);
}

#[tokio::test(start_paused = true)]
async fn two_innings_chase_and_win() {
    let (handle, mut rx) = spawn(2, 1);
    to_play(&handle).await;

    // First innings: six twos off even bowls = 12.
    for _ in 0..6 {
        deliver(&handle, PlayerId(101), PlayerId(1), 3, 2).await;
    }
    wait_for(&mut rx, |e| {
        matches!(
            e,
            EngineEvent::InningsEnded {
                innings: 1,
                score: 12,
                wickets: 0
            }
        )
    })
    .await;

    handle.start_second_innings().await.unwrap();
    wait_for(&mut rx, |e| {
        matches!(
            e,
            EngineEvent::SecondInningsStarted {
                target: 13,
                batting_team: TeamId::B
            }
        )
    })
    .await;

    handle.select_batter(PlayerId(101)).await.unwrap();
    handle.select_batter(PlayerId(102)).await.unwrap();
    handle.select_bowler(PlayerId(1)).await.unwrap();
    barrier(&handle).await;

    // Two sixes and a two: 14 > 12 on the third ball, mid-over.
    deliver(&handle, PlayerId(1), PlayerId(101), 3, 6).await;
    deliver(&handle, PlayerId(1), PlayerId(101), 3, 6).await;
    deliver(&handle, PlayerId(1), PlayerId(101), 3, 2).await;

    let ended = wait_for(&mut rx, |e| matches!(e, EngineEvent::MatchEnded { .. })).await;
    assert_eq!(
        ended,
        EngineEvent::MatchEnded {
            result: MatchResult::Won {
                team: TeamId::B,
                first_innings: 12,
                second_innings: 14
            }
        }
    );
}

#[tokio::test(start_paused = true)]
async fn maiden_over_is_flagged() {
    let (handle, mut rx) = spawn(3, 2);
    to_play(&handle).await;

    for _ in 0..6 {
        deliver(&handle, PlayerId(101), PlayerId(1), 3, 0).await;
    }
    wait_for(&mut rx, |e| {
        matches!(
            e,
            EngineEvent::OverCompleted {
                over_index: 0,
                maiden: true
            }
        )
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn second_innings_trigger_rejected_mid_play() {
    let (handle, _rx) = spawn(3, 2);
    to_play(&handle).await;

    handle.start_second_innings().await.unwrap();
    barrier(&handle).await;
    // Still innings 1, still playing.
    let card = handle.scorecard().await.unwrap();
    assert_eq!(card.innings, 1);
    assert!(!handle.is_closed());
}
