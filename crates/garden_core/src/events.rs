//! Gameplay events emitted by action handlers.
//!
//! Every successful action returns the events it produced. The quest
//! subsystem subscribes to this stream instead of being hardwired into
//! individual handlers, and external layers (UI, adapters, the headless
//! runner) consume it for display and export.

use serde::{Deserialize, Serialize};

use crate::ids::{
    AutomationId, CropId, EraId, GoalId, LoreId, PlantId, QuestId, ResourceId, UpgradeId, VisitorId,
};

/// An item that can be listed on the market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketItem {
    /// A rare seed, identified by its crop.
    Seed(CropId),
    /// A quantity of a ledger resource.
    Resource(ResourceId),
}

impl MarketItem {
    /// The underlying item identifier as a string.
    #[must_use]
    pub fn item_id(&self) -> &str {
        match self {
            Self::Seed(crop) => crop.as_str(),
            Self::Resource(resource) => resource.as_str(),
        }
    }
}

/// A single observable state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameplayEvent {
    /// The current era changed.
    EraEntered {
        /// Era now active.
        era: EraId,
    },
    /// A new era was unlocked.
    EraUnlocked {
        /// Era that was unlocked.
        era: EraId,
    },
    /// A lore entry became readable.
    LoreUnlocked {
        /// Lore entry id.
        lore: LoreId,
    },
    /// Chrono-energy was gained.
    EnergyEarned {
        /// Amount credited.
        amount: f64,
    },
    /// Chrono-energy was spent.
    EnergySpent {
        /// Amount actually removed (may be less than requested).
        amount: f64,
        /// Whether the spend hit the zero floor.
        clamped: bool,
    },
    /// A ledger resource was adjusted through the raw delta handler.
    ResourceAdjusted {
        /// Resource that changed.
        resource: ResourceId,
        /// Signed delta that was applied.
        delta: f64,
    },
    /// A crop was planted.
    CropPlanted {
        /// Fresh instance id.
        plant: PlantId,
        /// Crop type planted.
        crop: CropId,
        /// Era the crop was planted in.
        era: EraId,
    },
    /// A mature crop was harvested.
    CropHarvested {
        /// Instance that was removed.
        plant: PlantId,
        /// Crop type harvested.
        crop: CropId,
        /// Era the crop was growing in.
        era: EraId,
    },
    /// An automation rule instance was built.
    AutomationBuilt {
        /// Unique instance id.
        id: AutomationId,
        /// Catalog template it was derived from.
        template: AutomationId,
    },
    /// An automation rule instance was removed.
    AutomationRemoved {
        /// Instance that was removed.
        id: AutomationId,
    },
    /// An upgrade level was purchased.
    UpgradePurchased {
        /// Upgrade that advanced.
        upgrade: UpgradeId,
        /// New level after the purchase.
        level: u32,
    },
    /// A permanent upgrade level was purchased.
    PermanentUpgradePurchased {
        /// Permanent upgrade that advanced.
        upgrade: UpgradeId,
        /// New level after the purchase.
        level: u32,
    },
    /// A goal's target was reached and its reward granted.
    GoalCompleted {
        /// Goal that completed.
        goal: GoalId,
    },
    /// A rare seed was added to the collection.
    RareSeedGranted {
        /// Crop the seed belongs to.
        crop: CropId,
    },
    /// A visitor arrived in the garden.
    VisitorArrived {
        /// Visitor that appeared.
        visitor: VisitorId,
    },
    /// The visitor left the garden.
    VisitorDismissed {
        /// Visitor that left.
        visitor: VisitorId,
    },
    /// A quest was accepted from the current visitor.
    QuestAccepted {
        /// Visitor offering the quest.
        visitor: VisitorId,
        /// Quest that started.
        quest: QuestId,
    },
    /// The active quest's progress advanced.
    QuestAdvanced {
        /// Quest that advanced.
        quest: QuestId,
        /// Progress after the advance.
        progress: f64,
    },
    /// The active quest reached its target and its reward was granted.
    QuestCompleted {
        /// Quest that completed.
        quest: QuestId,
    },
    /// The active quest ran out of time.
    QuestExpired {
        /// Quest that failed.
        quest: QuestId,
    },
    /// An item was listed on the market (and locally debited).
    ItemListed {
        /// What was listed.
        item: MarketItem,
        /// Quantity listed.
        quantity: f64,
        /// Asking price.
        price: f64,
    },
    /// A prestige reset completed.
    PrestigeCompleted {
        /// Prestige count after the reset.
        count: u32,
    },
}
