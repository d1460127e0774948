//! Metric descriptions.
//!
//! The engine records through the `metrics` facade at the point where
//! things happen (the match actor, the registry); this module only
//! registers the descriptions so whatever recorder the embedding process
//! installs can render them. Without a recorder every macro is a no-op,
//! which is exactly right for library use and for tests.

use metrics::{describe_counter, describe_gauge};

/// Registers descriptions for every metric the engine emits.
pub fn describe_metrics() {
    describe_counter!(
        "handcricket_matches_started_total",
        "Match actors spawned"
    );
    describe_counter!(
        "handcricket_matches_finished_total",
        "Match actors stopped (completed, aborted, or torn down)"
    );
    describe_gauge!(
        "handcricket_active_matches",
        "Matches currently registered"
    );
    describe_counter!(
        "handcricket_events_total",
        "Engine events emitted across all matches"
    );
    describe_counter!(
        "handcricket_rejections_total",
        "Inputs rejected without advancing state"
    );
    describe_counter!(
        "handcricket_forfeits_total",
        "Deadline expirations that forfeited a turn"
    );
    describe_counter!(
        "handcricket_stale_timers_total",
        "Timer expirations discarded by the epoch guard"
    );
    describe_counter!(
        "handcricket_invariant_violations_total",
        "Matches aborted by a state consistency failure"
    );
}
