//! Scripted matches through the scenario runner: the hattrick ban and a
//! tied chase, end to end.

use handcricket::config::EngineConfig;
use handcricket::engine::event::EngineEvent;
use handcricket::engine::types::{BallOutcome, MatchResult};
use handcricket::scenario::{self, Scenario};

fn run_script(script: &str) -> Scenario {
    serde_yaml::from_str(script).expect("valid scenario YAML")
}

#[tokio::test]
async fn hattrick_ball_zero_is_rejected_then_replayed() {
    let scenario = run_script(
        r"
overs: 2
team_a:
  name: Alpha
  players: [Asha, Biru, Chitra, Dev]
team_b:
  name: Bravo
  players: [Esha, Farid]
actions:
  - select_batter: { player: Asha }
  - select_batter: { player: Biru }
  - select_bowler: { player: Esha }
  # Two wickets in two balls.
  - bowl: { player: Esha, digit: 2 }
  - bat: { player: Asha, digit: 2 }
  - select_batter: { player: Chitra }
  - bowl: { player: Esha, digit: 5 }
  - bat: { player: Chitra, digit: 5 }
  - select_batter: { player: Dev }
  # The hattrick ball: 0 is banned, 1 goes through.
  - bowl: { player: Esha, digit: 4 }
  - bat: { player: Dev, digit: 0 }
  - bat: { player: Dev, digit: 1 }
",
    );
    let run = scenario::run(&scenario, EngineConfig::default())
        .await
        .unwrap();

    let rejected = run
        .events
        .iter()
        .filter(|e| matches!(e, EngineEvent::HattrickBallRejected { .. }))
        .count();
    assert_eq!(rejected, 1);
    assert!(run.events.iter().any(|e| matches!(
        e,
        EngineEvent::BallResolved {
            outcome: BallOutcome::Runs(1),
            ..
        }
    )));
    // No third wicket: the hattrick never completed.
    let wickets = run
        .events
        .iter()
        .filter(|e| {
            matches!(
                e,
                EngineEvent::BallResolved {
                    outcome: BallOutcome::Wicket,
                    ..
                }
            )
        })
        .count();
    assert_eq!(wickets, 2);
}

#[tokio::test]
async fn level_scores_at_the_natural_end_are_a_tie() {
    let scenario = run_script(
        r"
overs: 1
team_a:
  name: Alpha
  players: [Asha, Biru]
team_b:
  name: Bravo
  players: [Chand, Devi]
actions:
  - select_batter: { player: Asha }
  - select_batter: { player: Biru }
  - select_bowler: { player: Chand }
  - bowl: { player: Chand, digit: 3 }
  - bat: { player: Asha, digit: 4 }
  - bowl: { player: Chand, digit: 3 }
  - bat: { player: Asha, digit: 3 }
  - start_second_innings
  - select_batter: { player: Chand }
  - select_batter: { player: Devi }
  - select_bowler: { player: Asha }
  - bowl: { player: Asha, digit: 2 }
  - bat: { player: Chand, digit: 4 }
  - bowl: { player: Asha, digit: 5 }
  - bat: { player: Chand, digit: 5 }
",
    );
    let run = scenario::run(&scenario, EngineConfig::default())
        .await
        .unwrap();

    assert!(run.events.contains(&EngineEvent::MatchEnded {
        result: MatchResult::Tie
    }));
    assert!(run.handle.is_closed());
}

#[tokio::test]
async fn abort_action_tears_the_match_down() {
    let scenario = run_script(
        r"
overs: 1
team_a:
  name: Alpha
  players: [Asha, Biru]
team_b:
  name: Bravo
  players: [Chand, Devi]
actions:
  - select_batter: { player: Asha }
  - abort
",
    );
    let run = scenario::run(&scenario, EngineConfig::default())
        .await
        .unwrap();
    assert!(run.events.contains(&EngineEvent::MatchAborted));
}
