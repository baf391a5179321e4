//! Action journal for recording and replaying runs.
//!
//! A journal stores the digest of the starting snapshot and the stream of
//! successfully applied actions with their timestamps. Together with the
//! same catalog and random seed, that is enough to re-derive any state
//! deterministically.

use std::path::Path;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::engine::{Action, Engine};
use crate::error::{GameError, Result};
use crate::growth::Timestamp;
use crate::state::GameState;

/// Journal file format version for compatibility.
pub const JOURNAL_VERSION: u32 = 1;

/// A single applied-action record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Timestamp the action was applied at.
    pub at: Timestamp,
    /// The action that was applied.
    pub action: Action,
}

/// Complete journal of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    /// Journal format version.
    pub version: u32,
    /// Digest of the snapshot the run started from.
    pub initial_digest: u64,
    /// Applied actions in order.
    entries: Vec<JournalEntry>,
}

impl Journal {
    /// Create an empty journal for a run starting from the snapshot with
    /// the given digest.
    #[must_use]
    pub fn new(initial_digest: u64) -> Self {
        Self {
            version: JOURNAL_VERSION,
            initial_digest,
            entries: Vec::new(),
        }
    }

    /// Record a successfully applied action.
    pub(crate) fn record(&mut self, at: Timestamp, action: Action) {
        self.entries.push(JournalEntry { at, action });
    }

    /// The recorded entries in application order.
    #[must_use]
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Number of recorded actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Save the journal to a file.
    ///
    /// # Errors
    /// Returns [`GameError::Serialization`] if encoding or writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self)
            .map_err(|e| GameError::Serialization(format!("failed to encode journal: {e}")))?;
        std::fs::write(path.as_ref(), bytes)
            .map_err(|e| GameError::Serialization(format!("failed to write journal file: {e}")))?;
        Ok(())
    }

    /// Load a journal from a file.
    ///
    /// # Errors
    /// Returns [`GameError::Serialization`] if reading or decoding fails,
    /// or [`GameError::SnapshotVersion`] for an incompatible version.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| GameError::Serialization(format!("failed to read journal file: {e}")))?;
        let journal: Self = bincode::deserialize(&bytes)
            .map_err(|e| GameError::Serialization(format!("failed to decode journal: {e}")))?;
        if journal.version != JOURNAL_VERSION {
            return Err(GameError::SnapshotVersion {
                found: journal.version,
                expected: JOURNAL_VERSION,
            });
        }
        Ok(journal)
    }
}

/// Re-apply a journal against a starting snapshot.
///
/// Rejected entries abort the replay: a journal only ever records
/// successful actions, so a rejection means the snapshot, catalog, or
/// random source does not match the original run.
///
/// # Errors
/// Returns [`GameError::Serialization`] if the starting snapshot's digest
/// does not match the journal, or the first rejection encountered.
pub fn replay<R: RngCore>(
    catalog: Catalog,
    initial: GameState,
    rng: R,
    journal: &Journal,
) -> Result<GameState> {
    let digest = initial.digest()?;
    if digest != journal.initial_digest {
        return Err(GameError::Serialization(format!(
            "journal expects initial digest {}, snapshot has {digest}",
            journal.initial_digest
        )));
    }

    let mut engine = Engine::from_state(catalog, initial, rng)?;
    for entry in journal.entries() {
        engine.apply(entry.action.clone(), entry.at)?;
    }
    Ok(engine.state().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{demo_catalog, demo_engine, seeded_rng, ts};

    fn scripted_engine() -> Engine<rand::rngs::StdRng> {
        let mut engine = demo_engine(9);
        engine
            .apply(Action::AddEnergy { amount: 120.0 }, ts(0))
            .unwrap();
        engine
            .apply(
                Action::PlantCrop {
                    crop: "tomato".into(),
                    era: "Present".into(),
                },
                ts(1),
            )
            .unwrap();
        let plant = engine.state().planted[0].id;
        engine
            .apply(Action::HarvestCrop { plant }, ts(1).plus_secs(60))
            .unwrap();
        engine
    }

    #[test]
    fn test_journal_records_only_successful_actions() {
        let mut engine = demo_engine(9);
        engine
            .apply(Action::AddEnergy { amount: 10.0 }, ts(0))
            .unwrap();
        let _ = engine.apply(
            Action::SetEra {
                era: "Future".into(),
            },
            ts(1),
        );
        assert_eq!(engine.journal().len(), 1);
    }

    #[test]
    fn test_replay_reproduces_the_final_state() {
        let engine = scripted_engine();
        let final_digest = engine.state().digest().unwrap();

        let initial = GameState::new(&demo_catalog(), "Ada", "First Garden").unwrap();
        let replayed =
            replay(demo_catalog(), initial, seeded_rng(9), engine.journal()).unwrap();
        assert_eq!(replayed.digest().unwrap(), final_digest);
    }

    #[test]
    fn test_replay_rejects_mismatched_snapshot() {
        let engine = scripted_engine();
        let mut initial = GameState::new(&demo_catalog(), "Ada", "First Garden").unwrap();
        initial.chrono_energy = 999.0;

        let err = replay(demo_catalog(), initial, seeded_rng(9), engine.journal()).unwrap_err();
        assert!(matches!(err, GameError::Serialization(_)));
    }

    #[test]
    fn test_journal_round_trips_through_a_file() {
        let engine = scripted_engine();
        let dir = std::env::temp_dir().join("garden_core_journal_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("run.journal");

        engine.journal().save(&path).unwrap();
        let loaded = Journal::load(&path).unwrap();
        assert_eq!(&loaded, engine.journal());

        std::fs::remove_file(&path).ok();
    }
}
