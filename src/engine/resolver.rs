//! Pure delivery resolution.
//!
//! Turns a completed (bat, bowl) pair into an outcome given the current
//! wicket streak. No timers, no side effects — the caller owns all state
//! mutation, which keeps the resolution matrix trivially testable.

use super::types::BallOutcome;

/// Result of resolving a submitted (bat, bowl) pair.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Resolution {
    /// The pair resolved to an outcome.
    Outcome(BallOutcome),
    /// Hattrick ball: the batter may not play 0 when two consecutive
    /// wickets have just fallen. The submission is refused and the batter
    /// must be re-prompted; nothing else changes.
    HattrickBan,
}

/// Resolves one delivery.
///
/// Rules, in order:
/// - `wicket_streak == 2` and `bat == 0` → [`Resolution::HattrickBan`]
/// - `bat == bowl` → wicket
/// - otherwise → `Runs(bat)`
///
/// Inputs are assumed already domain-checked at the port boundary
/// (`bat ∈ 0..=6`, `bowl ∈ 1..=6`).
#[must_use]
pub const fn resolve(bat: u8, bowl: u8, wicket_streak: u32) -> Resolution {
    debug_assert!(bat <= 6);
    debug_assert!(bowl >= 1 && bowl <= 6);

    if wicket_streak == 2 && bat == 0 {
        return Resolution::HattrickBan;
    }

    if bat == bowl {
        Resolution::Outcome(BallOutcome::Wicket)
    } else {
        Resolution::Outcome(BallOutcome::Runs(bat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wicket_iff_numbers_match() {
        for bat in 0..=6u8 {
            for bowl in 1..=6u8 {
                let expected = if bat == bowl {
                    BallOutcome::Wicket
                } else {
                    BallOutcome::Runs(bat)
                };
                assert_eq!(
                    resolve(bat, bowl, 0),
                    Resolution::Outcome(expected),
                    "bat={bat} bowl={bowl}"
                );
            }
        }
    }

    #[test]
    fn hattrick_ban_on_zero_at_streak_two() {
        assert_eq!(resolve(0, 3, 2), Resolution::HattrickBan);
        // Any other bat number resolves normally on the hattrick ball.
        assert_eq!(resolve(1, 3, 2), Resolution::Outcome(BallOutcome::Runs(1)));
        assert_eq!(resolve(3, 3, 2), Resolution::Outcome(BallOutcome::Wicket));
    }

    #[test]
    fn zero_is_fine_below_streak_two() {
        assert_eq!(resolve(0, 4, 0), Resolution::Outcome(BallOutcome::Runs(0)));
        assert_eq!(resolve(0, 4, 1), Resolution::Outcome(BallOutcome::Runs(0)));
    }

    #[test]
    fn streak_does_not_change_non_zero_resolution() {
        for streak in 0..4u32 {
            assert_eq!(
                resolve(5, 2, streak),
                Resolution::Outcome(BallOutcome::Runs(5))
            );
        }
    }
}
