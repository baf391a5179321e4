//! # Garden Core
//!
//! Deterministic simulation core for the Chronogarden incremental game.
//!
//! This crate contains **only** the game's state machine:
//! - No rendering
//! - No network transport
//! - No wall clock (callers pass `now` explicitly)
//! - No ambient randomness (the random source is injected)
//!
//! This separation enables:
//! - Headless drivers and scripted scenario runs
//! - Deterministic replay from the action journal
//! - Testing every rule without a UI in the loop
//!
//! ## Crate Structure
//!
//! - [`catalog`] - Static game configuration (pure data, no IO)
//! - [`ledger`] - Resource balances with atomic multi-resource debits
//! - [`growth`] - Pull-based crop maturity and timestamps
//! - [`engine`] - The progression engine applying [`engine::Action`]s
//! - [`goals`], [`synergy`], [`quests`] - Derived progression subsystems
//! - [`journal`] - Applied-action recording and replay
//! - [`snapshot`] - Versioned save import/export with validation

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod catalog;
pub mod engine;
pub mod error;
pub mod events;
#[cfg(any(test, feature = "testkit"))]
pub mod fixtures;
pub mod goals;
pub mod growth;
pub mod ids;
pub mod journal;
pub mod ledger;
pub mod quests;
pub mod snapshot;
pub mod state;
pub mod synergy;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{
        AutomationDef, Catalog, CostCurve, CropDef, EraDef, GoalDef, PermanentUpgradeDef,
        QuestCondition, QuestDef, Reward, SynergyDef, UpgradeDef, VisitorDef,
    };
    pub use crate::engine::{Action, Engine};
    pub use crate::error::{GameError, Result};
    pub use crate::events::{GameplayEvent, MarketItem};
    pub use crate::growth::Timestamp;
    pub use crate::ids::{
        AutomationId, CropId, EraId, GoalId, LoreId, PlantId, QuestId, ResourceId, StatKey,
        SynergyId, UpgradeId, VisitorId,
    };
    pub use crate::journal::Journal;
    pub use crate::ledger::{CostMap, ResourceLedger};
    pub use crate::snapshot::SaveFile;
    pub use crate::state::{ActiveQuest, GameState, PlantedCrop, QuestStatus};
}
