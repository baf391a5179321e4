//! Leaderboard adapter: exports lifetime totals under the player's name
//! and reconciles read-only standings back in.
//!
//! Each player only ever writes their own record, so pushes are simple
//! upserts with no read-modify-write handling.

use garden_core::state::GameState;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AdapterError;

/// One player's row in the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Player name, the record key.
    pub player: String,
    /// Garden display name.
    pub garden: String,
    /// Lifetime crops harvested.
    pub total_crops_harvested: u64,
    /// Prestige count.
    pub prestige_count: u32,
    /// Lifetime chrono-energy earned.
    pub total_energy_earned: f64,
}

/// The leaderboard collaborator's interface.
pub trait LeaderboardStore {
    /// Upsert a player's record.
    ///
    /// # Errors
    /// Returns [`AdapterError::Leaderboard`] on failure.
    fn push(&mut self, entry: LeaderboardEntry) -> Result<(), AdapterError>;

    /// Fetch all records.
    ///
    /// # Errors
    /// Returns [`AdapterError::Leaderboard`] on failure.
    fn fetch(&self) -> Result<Vec<LeaderboardEntry>, AdapterError>;
}

/// Build this player's leaderboard row from the current state.
#[must_use]
pub fn export_entry(state: &GameState) -> LeaderboardEntry {
    LeaderboardEntry {
        player: state.player_name.clone(),
        garden: state.garden_name.clone(),
        total_crops_harvested: state.lifetime.crops_harvested,
        prestige_count: state.prestige_count,
        total_energy_earned: state.lifetime.energy_earned,
    }
}

/// Push this player's lifetime totals to the store.
///
/// # Errors
/// Returns [`AdapterError::Leaderboard`] if the push fails; game state is
/// unaffected either way.
pub fn publish(store: &mut impl LeaderboardStore, state: &GameState) -> Result<(), AdapterError> {
    let entry = export_entry(state);
    debug!(player = %entry.player, crops = entry.total_crops_harvested, "publishing leaderboard entry");
    store.push(entry)
}

/// Fetch the standings, ordered descending by crops harvested.
///
/// The ordering is enforced on reconcile rather than trusted from the
/// collaborator.
///
/// # Errors
/// Returns [`AdapterError::Leaderboard`] if the fetch fails.
pub fn standings(store: &impl LeaderboardStore) -> Result<Vec<LeaderboardEntry>, AdapterError> {
    let mut entries = store.fetch()?;
    entries.sort_by(|a, b| b.total_crops_harvested.cmp(&a.total_crops_harvested));
    Ok(entries)
}

/// In-memory store, for tests and offline play.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLeaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl InMemoryLeaderboard {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LeaderboardStore for InMemoryLeaderboard {
    fn push(&mut self, entry: LeaderboardEntry) -> Result<(), AdapterError> {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.player == entry.player) {
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
        Ok(())
    }

    fn fetch(&self) -> Result<Vec<LeaderboardEntry>, AdapterError> {
        Ok(self.entries.clone())
    }
}
