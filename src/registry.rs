//! The keyed match registry.
//!
//! One group hosts at most one live match. The registry maps group ids
//! to actor handles, enforces the one-match rule at creation, and lazily
//! reaps entries whose actor has already stopped, so a finished match
//! never blocks the next one.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::broadcast;

use crate::config::EngineConfig;
use crate::engine::event::EngineEvent;
use crate::engine::machine::{self, MatchHandle};
use crate::engine::types::{GroupId, RosterReady};
use crate::error::EngineError;

/// All live matches, keyed by hosting group.
#[derive(Debug, Default)]
pub struct MatchRegistry {
    matches: DashMap<GroupId, MatchHandle>,
}

impl MatchRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a match for `group` and registers it.
    ///
    /// # Errors
    ///
    /// [`EngineError::MatchAlreadyActive`] when the group already hosts a
    /// live match; roster errors from [`machine::spawn`].
    pub fn create(
        &self,
        group: GroupId,
        roster: RosterReady,
        config: EngineConfig,
    ) -> Result<(MatchHandle, broadcast::Receiver<EngineEvent>), EngineError> {
        match self.matches.entry(group) {
            Entry::Occupied(mut occupied) => {
                if !occupied.get().is_closed() {
                    return Err(EngineError::MatchAlreadyActive { group });
                }
                // Stale handle from a finished match; replace it.
                let (handle, events) = machine::spawn(group, roster, config)?;
                occupied.insert(handle.clone());
                self.update_gauge();
                Ok((handle, events))
            }
            Entry::Vacant(vacant) => {
                let (handle, events) = machine::spawn(group, roster, config)?;
                vacant.insert(handle.clone());
                self.update_gauge();
                Ok((handle, events))
            }
        }
    }

    /// Looks up the live match for `group`, reaping a dead entry.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoActiveMatch`] when none is running.
    pub fn get(&self, group: GroupId) -> Result<MatchHandle, EngineError> {
        let handle = self
            .matches
            .get(&group)
            .map(|entry| entry.value().clone())
            .ok_or(EngineError::NoActiveMatch)?;
        if handle.is_closed() {
            self.matches.remove(&group);
            self.update_gauge();
            return Err(EngineError::NoActiveMatch);
        }
        Ok(handle)
    }

    /// Drops the registration for `group`, if any.
    pub fn remove(&self, group: GroupId) {
        self.matches.remove(&group);
        self.update_gauge();
    }

    /// Number of registered matches (live or awaiting reaping).
    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Whether no matches are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    fn update_gauge(&self) {
        #[allow(clippy::cast_precision_loss)]
        metrics::gauge!("handcricket_active_matches").set(self.matches.len() as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{Player, PlayerId, Team, TeamId};

    fn roster() -> RosterReady {
        let players = |base: u64| {
            (0..3u64)
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
            overs_total: 2,
        }
    }

    #[tokio::test]
    async fn one_match_per_group() {
        let registry = MatchRegistry::new();
        let group = GroupId(-10);
        registry
            .create(group, roster(), EngineConfig::default())
            .unwrap();
        assert!(matches!(
            registry.create(group, roster(), EngineConfig::default()),
            Err(EngineError::MatchAlreadyActive { .. })
        ));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn distinct_groups_run_concurrently() {
        let registry = MatchRegistry::new();
        registry
            .create(GroupId(-1), roster(), EngineConfig::default())
            .unwrap();
        registry
            .create(GroupId(-2), roster(), EngineConfig::default())
            .unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.get(GroupId(-1)).is_ok());
        assert!(registry.get(GroupId(-2)).is_ok());
        assert!(matches!(
            registry.get(GroupId(-3)),
            Err(EngineError::NoActiveMatch)
        ));
    }

    #[tokio::test]
    async fn finished_match_is_reaped_and_replaced() {
        let registry = MatchRegistry::new();
        let group = GroupId(-10);
        let (handle, mut events) = registry
            .create(group, roster(), EngineConfig::default())
            .unwrap();

        handle.abort().await.unwrap();
        // Drain until the actor confirms teardown.
        loop {
            if events.recv().await.unwrap() == EngineEvent::MatchAborted {
                break;
            }
        }
        // The abort closes the queue; give the runtime a beat to drop it.
        while !handle.is_closed() {
            tokio::task::yield_now().await;
        }

        assert!(matches!(
            registry.get(group),
            Err(EngineError::NoActiveMatch)
        ));
        registry
            .create(group, roster(), EngineConfig::default())
            .unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn remove_frees_the_slot() {
        let registry = MatchRegistry::new();
        let group = GroupId(-10);
        registry
            .create(group, roster(), EngineConfig::default())
            .unwrap();
        registry.remove(group);
        assert!(registry.is_empty());
        registry
            .create(group, roster(), EngineConfig::default())
            .unwrap();
    }
}
