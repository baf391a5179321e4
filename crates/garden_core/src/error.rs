//! Error types for the garden simulation.
//!
//! Every rejected action maps to a distinct variant so callers can render
//! a precise message ("cannot afford" vs. "max level" vs. "era locked").
//! Rejections are ordinary `Err` values; nothing in this crate panics on
//! bad input and there is no unrecoverable error state.

use thiserror::Error;

use crate::ids::{AutomationId, CropId, EraId, PlantId, QuestId, ResourceId, UpgradeId, VisitorId};

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all game simulation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// A resource debit exceeded the current balance.
    #[error("insufficient {resource}: need {required}, have {available}")]
    InsufficientResources {
        /// Resource that fell short.
        resource: ResourceId,
        /// Amount required.
        required: f64,
        /// Amount available.
        available: f64,
    },

    /// A chrono-energy payment exceeded the current balance.
    #[error("insufficient chrono-energy: need {required}, have {available}")]
    InsufficientEnergy {
        /// Energy required.
        required: f64,
        /// Energy available.
        available: f64,
    },

    /// A permanent upgrade requires more rare seeds than are owned.
    #[error("requires {required} rare seeds, have {available}")]
    InsufficientRareSeeds {
        /// Rare seeds required.
        required: usize,
        /// Rare seeds owned.
        available: usize,
    },

    /// An amount argument was negative or not finite.
    #[error("invalid amount: {0}")]
    InvalidAmount(f64),

    /// An upgrade is already at its maximum level.
    #[error("upgrade '{0}' is already at max level")]
    MaxLevelReached(UpgradeId),

    /// The era exists but has not been unlocked.
    #[error("era '{0}' is locked")]
    EraLocked(EraId),

    /// The era has already been unlocked.
    #[error("era '{0}' is already unlocked")]
    EraAlreadyUnlocked(EraId),

    /// No era with this id exists in the catalog.
    #[error("unknown era: {0}")]
    UnknownEra(EraId),

    /// No crop with this id exists in the catalog.
    #[error("unknown crop: {0}")]
    UnknownCrop(CropId),

    /// The crop belongs to a different era and is not a rare seed.
    #[error("crop '{crop}' cannot be planted in era '{era}'")]
    CropNotAvailable {
        /// Crop that was requested.
        crop: CropId,
        /// Era it was to be planted in.
        era: EraId,
    },

    /// No planted crop instance with this id exists.
    #[error("planted crop not found: {0}")]
    PlantNotFound(PlantId),

    /// The planted crop has not finished growing.
    #[error("crop {plant} is not mature ({percent:.0}% grown)")]
    CropNotMature {
        /// Instance that was to be harvested.
        plant: PlantId,
        /// Current maturity as a percentage.
        percent: f64,
    },

    /// No automation template with this id exists in the catalog.
    #[error("unknown automation rule: {0}")]
    UnknownAutomation(AutomationId),

    /// No automation instance with this id exists.
    #[error("automation instance not found: {0}")]
    AutomationNotFound(AutomationId),

    /// No upgrade with this id exists in the catalog.
    #[error("unknown upgrade: {0}")]
    UnknownUpgrade(UpgradeId),

    /// No visitor with this id exists in the catalog.
    #[error("unknown visitor: {0}")]
    UnknownVisitor(VisitorId),

    /// No quest with this id exists for the visitor.
    #[error("unknown quest: {0}")]
    UnknownQuest(QuestId),

    /// The named visitor is not currently in the garden.
    #[error("visitor '{0}' is not present")]
    VisitorNotPresent(VisitorId),

    /// There is no visitor to dismiss.
    #[error("no visitor is present")]
    NoVisitor,

    /// A quest is already active; only one may run at a time.
    #[error("a quest is already active")]
    QuestAlreadyActive,

    /// The quest has already been completed in this run.
    #[error("quest '{0}' has already been completed")]
    QuestAlreadyCompleted(QuestId),

    /// The active quest is still running and blocks dismissal.
    #[error("the active quest has not finished")]
    QuestStillActive,

    /// The visitor still has an eligible quest to offer.
    #[error("the visitor still has a quest to offer")]
    QuestOfferPending,

    /// A rare seed listing referenced a seed that is not owned.
    #[error("rare seed '{0}' is not owned")]
    SeedNotOwned(CropId),

    /// Prestige requires the designated advanced era to be unlocked.
    #[error("prestige requires era '{required}' to be unlocked")]
    PrestigeLocked {
        /// Era gating the prestige reset.
        required: EraId,
    },

    /// The catalog has no eras, so no initial state can be built.
    #[error("catalog defines no eras")]
    EmptyCatalog,

    /// A snapshot was written by an incompatible format version.
    #[error("unsupported save version {found}, expected {expected}")]
    SnapshotVersion {
        /// Version found in the file.
        found: u32,
        /// Version this build understands.
        expected: u32,
    },

    /// A snapshot is missing a required field or holds an invalid value.
    #[error("invalid save field '{field}': {message}")]
    SnapshotField {
        /// Dotted path of the offending field.
        field: String,
        /// Why the field was rejected.
        message: String,
    },

    /// Serialization of state, journal, or snapshot data failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_distinguishable() {
        let cannot_afford = GameError::InsufficientResources {
            resource: ResourceId::new("Water"),
            required: 10.0,
            available: 3.0,
        };
        let max_level = GameError::MaxLevelReached(UpgradeId::new("quick_growth"));
        let locked = GameError::EraLocked(EraId::new("Future"));

        assert_eq!(
            cannot_afford.to_string(),
            "insufficient Water: need 10, have 3"
        );
        assert_eq!(
            max_level.to_string(),
            "upgrade 'quick_growth' is already at max level"
        );
        assert_eq!(locked.to_string(), "era 'Future' is locked");
    }

    #[test]
    fn test_maturity_message_formats_percent() {
        let err = GameError::CropNotMature {
            plant: PlantId::new(4),
            percent: 41.7,
        };
        assert_eq!(err.to_string(), "crop 4 is not mature (42% grown)");
    }
}
