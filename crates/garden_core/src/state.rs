//! Game state: the root snapshot owned by the progression engine.
//!
//! Every action produces the next snapshot from the previous one; nothing
//! outside the engine mutates state. Prestige builds a fresh snapshot and
//! selectively carries over rare seeds, permanent upgrades, lifetime
//! totals, and display names.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{GameError, Result};
use crate::growth::{self, Timestamp};
use crate::ids::{
    AutomationId, CropId, EraId, GoalId, LoreId, PlantId, QuestId, StatKey, UpgradeId, VisitorId,
};
use crate::ledger::ResourceLedger;

/// Stat key for total crops harvested across all runs.
pub const STAT_CROPS_HARVESTED: &str = "crops_harvested";
/// Stat key for total chrono-energy earned across all runs.
pub const STAT_ENERGY_EARNED: &str = "energy_earned";
/// Stat key for the prestige count.
pub const STAT_PRESTIGE_COUNT: &str = "prestige_count";
/// Stat key for the number of rare seeds owned.
pub const STAT_RARE_SEEDS: &str = "rare_seeds";
/// Stat key for the number of unlocked eras in the current run.
pub const STAT_ERAS_UNLOCKED: &str = "eras_unlocked";
/// Stat key for automation instances built in the current run.
pub const STAT_AUTOMATIONS_BUILT: &str = "automations_built";
/// Stat key for quests completed in the current run.
pub const STAT_QUESTS_COMPLETED: &str = "quests_completed";

/// Stat key for crops harvested in a specific era during the current run.
#[must_use]
pub fn era_harvest_stat(era: &EraId) -> StatKey {
    StatKey::new(format!("{STAT_CROPS_HARVESTED}:{era}"))
}

/// Soil quality of a fresh garden.
pub const INITIAL_SOIL_QUALITY: f64 = 100.0;

/// A growing crop instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantedCrop {
    /// Unique instance id.
    pub id: PlantId,
    /// Crop type.
    pub crop: CropId,
    /// Era the crop was planted in.
    pub era: EraId,
    /// When the crop was planted.
    pub planted_at: Timestamp,
}

impl PlantedCrop {
    /// Growth completion fraction at `now`, given the crop's duration.
    #[must_use]
    pub fn maturity(&self, growth_secs: f64, now: Timestamp) -> f64 {
        growth::maturity(self.planted_at, growth_secs, now)
    }
}

/// A purchased automation rule instance.
///
/// Carries its template's display fields so the instance stays renderable
/// even if the catalog entry changes between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationInstance {
    /// Unique instance id (`template#<n>`).
    pub id: AutomationId,
    /// Template this instance was derived from.
    pub template: AutomationId,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Display-only effect text.
    pub effect: String,
}

/// Lifecycle status of the active quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestStatus {
    /// Running and accepting progress.
    Active,
    /// Target reached, reward granted.
    Completed,
    /// Time limit exceeded before the target was reached.
    Failed,
}

/// The single quest a player may be running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveQuest {
    /// Visitor who offered the quest.
    pub visitor: VisitorId,
    /// Quest being attempted.
    pub quest: QuestId,
    /// Current lifecycle status.
    pub status: QuestStatus,
    /// Accumulated progress toward the target.
    pub progress: f64,
    /// When the quest was accepted.
    pub started_at: Timestamp,
}

/// Per-goal tracked progress and one-way completion flag.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GoalStatus {
    /// Last evaluated progress value.
    pub progress: f64,
    /// Whether the goal has completed. Never reverts.
    pub completed: bool,
}

/// Monotonically increasing gameplay counters that synergies and goals
/// derive their values from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynergyStats {
    counters: BTreeMap<StatKey, f64>,
}

impl SynergyStats {
    /// Current value of a counter; absent counters are zero.
    #[must_use]
    pub fn value(&self, key: &StatKey) -> f64 {
        self.counters.get(key).copied().unwrap_or(0.0)
    }

    /// Increase a counter. Counters never decrease.
    pub fn bump(&mut self, key: StatKey, amount: f64) {
        debug_assert!(amount >= 0.0, "counters are monotonic");
        *self.counters.entry(key).or_insert(0.0) += amount;
    }

    /// Iterate over all counters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&StatKey, f64)> {
        self.counters.iter().map(|(key, value)| (key, *value))
    }
}

/// Cross-run totals preserved by prestige, used for display and
/// leaderboard export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LifetimeTotals {
    /// Crops harvested across all runs.
    pub crops_harvested: u64,
    /// Chrono-energy earned across all runs.
    pub energy_earned: f64,
}

/// The complete game state snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Player display name.
    pub player_name: String,
    /// Garden display name.
    pub garden_name: String,
    /// Era currently being played.
    pub current_era: EraId,
    /// Eras unlocked in this run.
    pub unlocked_eras: BTreeSet<EraId>,
    /// Chrono-energy balance. Spending clamps at zero rather than
    /// rejecting; see the engine's `SpendEnergy` handler.
    pub chrono_energy: f64,
    /// Resource balances.
    pub ledger: ResourceLedger,
    /// Crops currently growing.
    pub planted: Vec<PlantedCrop>,
    /// Automation rule instances.
    pub automations: Vec<AutomationInstance>,
    /// Rare seeds owned; preserved across prestige.
    pub rare_seeds: BTreeSet<CropId>,
    /// Soil quality in `[0, 100]`.
    pub soil_quality: f64,
    /// Regular upgrade levels; reset on prestige.
    pub upgrades: BTreeMap<UpgradeId, u32>,
    /// Permanent upgrade levels; preserved across prestige.
    pub permanent_upgrades: BTreeMap<UpgradeId, u32>,
    /// Per-goal progress and completion.
    pub goals: BTreeMap<GoalId, GoalStatus>,
    /// Monotonic gameplay counters for the current run.
    pub stats: SynergyStats,
    /// Lore entries unlocked in this run.
    pub unlocked_lore: BTreeSet<LoreId>,
    /// Visitor currently in the garden, if any.
    pub visitor: Option<VisitorId>,
    /// The single quest in progress, if any.
    pub active_quest: Option<ActiveQuest>,
    /// Quests completed in this run.
    pub completed_quests: BTreeSet<QuestId>,
    /// Number of prestige resets performed.
    pub prestige_count: u32,
    /// Cross-run totals.
    pub lifetime: LifetimeTotals,
    /// Next planted-crop instance id.
    pub(crate) next_plant_id: u64,
    /// Next automation instance suffix.
    pub(crate) next_automation_seq: u64,
}

impl GameState {
    /// Build the initial snapshot for a fresh game: the catalog's first
    /// era unlocked, starting resources credited, everything else zero.
    ///
    /// # Errors
    /// Returns [`GameError::EmptyCatalog`] if the catalog has no eras.
    pub fn new(
        catalog: &Catalog,
        player_name: impl Into<String>,
        garden_name: impl Into<String>,
    ) -> Result<Self> {
        let starting_era = catalog.starting_era().ok_or(GameError::EmptyCatalog)?;

        let mut ledger = ResourceLedger::new();
        for (resource, &amount) in &catalog.starting_resources {
            ledger.credit(resource, amount);
        }

        let goals = catalog
            .goals
            .iter()
            .map(|goal| (goal.id.clone(), GoalStatus::default()))
            .collect();

        Ok(Self {
            player_name: player_name.into(),
            garden_name: garden_name.into(),
            current_era: starting_era.id.clone(),
            unlocked_eras: BTreeSet::from([starting_era.id.clone()]),
            chrono_energy: 0.0,
            ledger,
            planted: Vec::new(),
            automations: Vec::new(),
            rare_seeds: BTreeSet::new(),
            soil_quality: INITIAL_SOIL_QUALITY,
            upgrades: BTreeMap::new(),
            permanent_upgrades: BTreeMap::new(),
            goals,
            stats: SynergyStats::default(),
            unlocked_lore: BTreeSet::new(),
            visitor: None,
            active_quest: None,
            completed_quests: BTreeSet::new(),
            prestige_count: 0,
            lifetime: LifetimeTotals::default(),
            next_plant_id: 1,
            next_automation_seq: 1,
        })
    }

    /// Resolve a tracked statistic.
    ///
    /// Well-known keys are derived from state fields; everything else
    /// reads the run's counter map. Goals re-derive their progress from
    /// this on every evaluation instead of storing it independently.
    #[must_use]
    pub fn stat_value(&self, key: &StatKey) -> f64 {
        match key.as_str() {
            STAT_CROPS_HARVESTED => self.lifetime.crops_harvested as f64,
            STAT_ENERGY_EARNED => self.lifetime.energy_earned,
            STAT_PRESTIGE_COUNT => f64::from(self.prestige_count),
            STAT_RARE_SEEDS => self.rare_seeds.len() as f64,
            STAT_ERAS_UNLOCKED => self.unlocked_eras.len() as f64,
            _ => self.stats.value(key),
        }
    }

    /// Whether a stat key is backed by storage that survives prestige.
    ///
    /// Goal statuses bound to these keys carry over the reset so their
    /// rewards are not granted a second time.
    #[must_use]
    pub fn is_lifetime_stat(key: &StatKey) -> bool {
        matches!(
            key.as_str(),
            STAT_CROPS_HARVESTED | STAT_ENERGY_EARNED | STAT_PRESTIGE_COUNT | STAT_RARE_SEEDS
        )
    }

    /// Find a planted crop by instance id.
    #[must_use]
    pub fn planted_crop(&self, id: PlantId) -> Option<&PlantedCrop> {
        self.planted.iter().find(|p| p.id == id)
    }

    /// Credit chrono-energy, tracking the lifetime total.
    pub(crate) fn gain_energy(&mut self, amount: f64) {
        self.chrono_energy += amount;
        self.lifetime.energy_earned += amount;
    }

    /// Reduce soil quality, clamped at zero.
    pub(crate) fn lower_soil(&mut self, amount: f64) {
        self.soil_quality = (self.soil_quality - amount).max(0.0);
    }

    /// Allocate a fresh planted-crop instance id.
    pub(crate) fn fresh_plant_id(&mut self) -> PlantId {
        let id = PlantId::new(self.next_plant_id);
        self.next_plant_id += 1;
        id
    }

    /// Allocate a fresh automation instance id from a template.
    pub(crate) fn fresh_automation_id(&mut self, template: &AutomationId) -> AutomationId {
        let id = template.instance(self.next_automation_seq);
        self.next_automation_seq += 1;
        id
    }

    /// Stable digest of the serialized state, for determinism checks and
    /// journal verification.
    ///
    /// # Errors
    /// Returns [`GameError::Serialization`] if the state cannot be
    /// serialized.
    pub fn digest(&self) -> Result<u64> {
        let json =
            serde_json::to_string(self).map_err(|e| GameError::Serialization(e.to_string()))?;
        let mut hasher = DefaultHasher::new();
        json.hash(&mut hasher);
        Ok(hasher.finish())
    }
}
