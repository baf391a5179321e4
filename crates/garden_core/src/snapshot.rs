//! Snapshot persistence: serializing game state to and from save files.
//!
//! Saves are plain JSON with a format-version field. Import validates the
//! version and the required fields before accepting; a rejected import
//! leaves the caller's last good state untouched because nothing here
//! mutates in place.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::Catalog;
use crate::error::{GameError, Result};
use crate::state::GameState;

/// Save file format version for compatibility.
pub const SAVE_VERSION: u32 = 1;

/// A versioned save file wrapping a complete state snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    /// Save format version.
    pub version: u32,
    /// The serialized state snapshot.
    pub state: GameState,
}

impl SaveFile {
    /// Wrap a state snapshot in the current save format.
    #[must_use]
    pub fn new(state: &GameState) -> Self {
        Self {
            version: SAVE_VERSION,
            state: state.clone(),
        }
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`GameError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| GameError::Serialization(e.to_string()))
    }

    /// Parse and validate a save file, returning the restored state.
    ///
    /// Validation happens in two passes: the raw JSON is checked for the
    /// format version and the required fields (player and garden name,
    /// current era, planted-crop list), then the deserialized state is
    /// checked against the catalog and the ledger invariants. Any failure
    /// rejects the whole import with a descriptive error.
    ///
    /// # Errors
    /// Returns [`GameError::SnapshotVersion`] or
    /// [`GameError::SnapshotField`] describing the first problem found.
    pub fn from_json(json: &str, catalog: &Catalog) -> Result<GameState> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| GameError::Serialization(format!("save is not valid JSON: {e}")))?;

        let version = value
            .get("version")
            .and_then(Value::as_u64)
            .ok_or_else(|| field_error("version", "missing or not a number"))?;
        if version != u64::from(SAVE_VERSION) {
            return Err(GameError::SnapshotVersion {
                found: version as u32,
                expected: SAVE_VERSION,
            });
        }

        let state_value = value
            .get("state")
            .and_then(Value::as_object)
            .ok_or_else(|| field_error("state", "missing or not an object"))?;

        let player_name = state_value
            .get("player_name")
            .and_then(Value::as_str)
            .ok_or_else(|| field_error("state.player_name", "missing or not a string"))?;
        if player_name.trim().is_empty() {
            return Err(field_error("state.player_name", "must not be empty"));
        }
        if !state_value
            .get("garden_name")
            .map_or(false, Value::is_string)
        {
            return Err(field_error("state.garden_name", "missing or not a string"));
        }
        if !state_value.get("current_era").map_or(false, Value::is_string) {
            return Err(field_error("state.current_era", "missing or not a string"));
        }
        if !state_value.get("planted").map_or(false, Value::is_array) {
            return Err(field_error("state.planted", "missing or not a list"));
        }

        let save: Self = serde_json::from_value(value)
            .map_err(|e| GameError::Serialization(format!("save does not match schema: {e}")))?;
        let state = save.state;

        if catalog.era(&state.current_era).is_none() {
            return Err(field_error(
                "state.current_era",
                &format!("unknown era '{}'", state.current_era),
            ));
        }
        if !state.unlocked_eras.contains(&state.current_era) {
            return Err(field_error(
                "state.current_era",
                "current era is not in the unlocked set",
            ));
        }
        for planted in &state.planted {
            if catalog.crop(&planted.crop).is_none() {
                return Err(field_error(
                    "state.planted",
                    &format!("unknown crop '{}'", planted.crop),
                ));
            }
        }
        for (resource, amount) in state.ledger.iter() {
            if amount < 0.0 || !amount.is_finite() {
                return Err(field_error(
                    "state.ledger",
                    &format!("negative or non-finite balance for '{resource}'"),
                ));
            }
        }
        if state.chrono_energy < 0.0 || !state.chrono_energy.is_finite() {
            return Err(field_error("state.chrono_energy", "must be non-negative"));
        }
        if !(0.0..=100.0).contains(&state.soil_quality) {
            return Err(field_error(
                "state.soil_quality",
                "must be within [0, 100]",
            ));
        }

        Ok(state)
    }
}

fn field_error(field: &str, message: &str) -> GameError {
    GameError::SnapshotField {
        field: field.to_string(),
        message: message.to_string(),
    }
}
