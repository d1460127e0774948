//! Human rendering of engine output.
//!
//! Turns [`EngineEvent`]s and scorecards into terminal lines. The engine
//! itself never formats text; everything user-facing lives here.

use crate::engine::event::EngineEvent;
use crate::engine::stats::Scorecard;
use crate::engine::types::{BallOutcome, MatchResult, TeamId};
use crate::scenario::NameTable;

/// One human line per event.
#[must_use]
pub fn describe(event: &EngineEvent, names: &NameTable) -> String {
    match event {
        EngineEvent::PromptBowler { bowler } => {
            format!("{} to bowl: send a number 1-6", names.name_of(*bowler))
        }
        EngineEvent::PromptBatter { batter, over, ball } => format!(
            "{} to bat (over {}, ball {}): send a number 0-6",
            names.name_of(*batter),
            over + 1,
            ball
        ),
        EngineEvent::WarningIssued { role, seconds_left } => {
            format!("{role} warned: {seconds_left}s left")
        }
        EngineEvent::BallResolved {
            outcome,
            score_after,
        } => match outcome {
            BallOutcome::Wicket => format!("WICKET! score {score_after}"),
            BallOutcome::Runs(r) => format!("{r} run(s), score {score_after}"),
        },
        EngineEvent::Hattrick { bowler } => {
            format!("HATTRICK by {}!", names.name_of(*bowler))
        }
        EngineEvent::HattrickBallRejected { batter } => format!(
            "{} cannot play 0 on the hattrick ball, go again",
            names.name_of(*batter)
        ),
        EngineEvent::PartnershipBroken { runs, balls } => {
            format!("partnership broken: {runs} off {balls}")
        }
        EngineEvent::PartnershipMilestone { runs } => {
            format!("partnership reaches {runs}!")
        }
        EngineEvent::OverCompleted { over_index, maiden } => {
            if *maiden {
                format!("over {} complete: a maiden!", over_index + 1)
            } else {
                format!("over {} complete", over_index + 1)
            }
        }
        EngineEvent::BatterIn { batter, order } => {
            format!("{} comes in at {}", names.name_of(*batter), order)
        }
        EngineEvent::BowlerSet { bowler } => {
            format!("{} takes the over", names.name_of(*bowler))
        }
        EngineEvent::PromptNewBowler => "pick a bowler".to_string(),
        EngineEvent::PromptNewBatter => "pick a batter".to_string(),
        EngineEvent::BowlerForfeited {
            bowler,
            penalty_runs,
        } => format!(
            "{} took too long: +{} to the batting side",
            names.name_of(*bowler),
            penalty_runs
        ),
        EngineEvent::BatterForfeited {
            batter,
            penalty_runs,
        } => format!(
            "{} took too long: -{} and the ball is counted",
            names.name_of(*batter),
            penalty_runs
        ),
        EngineEvent::BowlerSuspended { bowler, until_over } => format!(
            "{} suspended through over {}",
            names.name_of(*bowler),
            until_over + 1
        ),
        EngineEvent::WicketOnNeglect { batter } => {
            format!("{} is out on neglect", names.name_of(*batter))
        }
        EngineEvent::InningsEnded {
            innings,
            score,
            wickets,
        } => format!("innings {innings} over: {score}/{wickets}"),
        EngineEvent::SecondInningsStarted {
            target,
            batting_team,
        } => format!("second innings: {batting_team} chase {target}"),
        EngineEvent::MatchEnded { result } => match result {
            MatchResult::Won {
                team,
                first_innings,
                second_innings,
            } => format!("{team} win ({first_innings} vs {second_innings})"),
            MatchResult::Tie => "a tie! scores level".to_string(),
        },
        EngineEvent::MatchAborted => "match aborted".to_string(),
    }
}

/// Multi-line scorecard rendering.
#[must_use]
pub fn scoreboard(card: &Scorecard, names: &NameTable) -> String {
    let mut out = String::new();
    let batting = match card.batting_team {
        TeamId::A => "Team A",
        TeamId::B => "Team B",
    };
    out.push_str(&format!(
        "{batting} {}/{} ({}.{} of {} ov, RR {:.2})\n",
        card.score, card.wickets, card.current_over, card.current_ball, card.overs_total,
        card.run_rate
    ));
    if let Some(chase) = &card.chase {
        out.push_str(&format!(
            "  target {}: need {} off {}",
            chase.target, chase.runs_needed, chase.balls_left
        ));
        if let Some(rrr) = chase.required_run_rate {
            out.push_str(&format!(" (req RR {rrr:.2})"));
        }
        out.push('\n');
    }
    for line in &card.batters {
        let marker = if line.on_strike { "*" } else { " " };
        out.push_str(&format!(
            "  {marker}{} {} ({}) SR {:.1}\n",
            names.name_of(line.player),
            line.runs,
            line.balls,
            line.strike_rate
        ));
    }
    if let Some(bowler) = &card.bowler {
        out.push_str(&format!(
            "  {} {}.{}-{}-{} econ {:.2}\n",
            names.name_of(bowler.player),
            bowler.overs,
            bowler.over_balls,
            bowler.runs,
            bowler.wickets,
            bowler.economy
        ));
    }
    let (p_runs, p_balls) = card.partnership;
    out.push_str(&format!("  partnership {p_runs} off {p_balls}\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::PlayerId;

    #[test]
    fn describes_without_names_gracefully() {
        let names = NameTable::default();
        let line = describe(
            &EngineEvent::Hattrick {
                bowler: PlayerId(9),
            },
            &names,
        );
        assert!(line.contains("HATTRICK"));
    }

    #[test]
    fn over_numbers_are_one_based_for_humans() {
        let names = NameTable::default();
        let line = describe(
            &EngineEvent::OverCompleted {
                over_index: 0,
                maiden: false,
            },
            &names,
        );
        assert_eq!(line, "over 1 complete");
    }
}
