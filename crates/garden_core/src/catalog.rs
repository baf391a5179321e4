//! Static game catalog: eras, crops, automation rules, upgrades,
//! synergies, goals, and visitors.
//!
//! Catalog data is pure configuration, designed to be deserialized from
//! RON files. This module defines the data types and their validation;
//! it does no IO. File loading lives in the headless driver, which
//! validates at load time and rejects broken catalogs with descriptive
//! errors.

use serde::{Deserialize, Serialize};

use crate::ids::{
    AutomationId, CropId, EraId, GoalId, LoreId, QuestId, ResourceId, StatKey, SynergyId,
    UpgradeId, VisitorId,
};
use crate::ledger::CostMap;

/// A distinct unlockable time period bundling crops and resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EraDef {
    /// Unique era id.
    pub id: EraId,
    /// Display name.
    pub name: String,
    /// Chrono-energy cost to unlock. The first era in the catalog is
    /// unlocked at game start regardless of this value.
    pub unlock_cost: f64,
    /// Ordered list of crops unlockable in this era.
    pub crops: Vec<CropId>,
    /// Era-specific resources.
    pub resources: Vec<ResourceId>,
    /// Display-only description of the era's special mechanic.
    #[serde(default)]
    pub special_mechanic: Option<String>,
    /// Probability in `[0, 1]` that a visitor appears on a spawn check
    /// while this era is current.
    #[serde(default)]
    pub visitor_chance: f64,
    /// Lore entries revealed when this era is unlocked.
    #[serde(default)]
    pub lore: Vec<LoreId>,
}

/// A plantable crop type. Crops belong to exactly one era; rare seeds
/// make their crop plantable in any era.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropDef {
    /// Unique crop id.
    pub id: CropId,
    /// Display name.
    pub name: String,
    /// Era this crop belongs to.
    pub era: EraId,
    /// Seconds from planting to full maturity.
    pub growth_secs: f64,
    /// Resources awarded on harvest.
    pub yields: CostMap,
    /// Resources consumed on planting.
    #[serde(default)]
    pub requirements: CostMap,
    /// Optional one-time cost to unlock the crop for planting.
    #[serde(default)]
    pub unlock_cost: Option<CostMap>,
    /// Whether this crop is eligible as a rare-seed reward.
    #[serde(default)]
    pub rare: bool,
}

/// An automation rule template. Purchased instances get a unique id so
/// several copies of the same rule can coexist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationDef {
    /// Template id.
    pub id: AutomationId,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Display-only effect text.
    pub effect: String,
    /// Resources debited when an instance is built.
    #[serde(default)]
    pub cost: CostMap,
}

/// Parametric cost curve: `cost(level) = base * growth_factor^level`.
///
/// Costs are monotonically non-decreasing in level by convention
/// (`growth_factor >= 1`), which validation enforces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCurve {
    /// Cost at level zero.
    pub base: CostMap,
    /// Multiplier applied per level.
    pub growth_factor: f64,
}

impl CostCurve {
    /// The cost to advance from `level` to `level + 1`.
    #[must_use]
    pub fn at(&self, level: u32) -> CostMap {
        let factor = self.growth_factor.powi(level as i32);
        self.base
            .iter()
            .map(|(resource, &amount)| (resource.clone(), amount * factor))
            .collect()
    }
}

/// A repeatable upgrade with leveled cost and effect. Levels reset on
/// prestige.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeDef {
    /// Unique upgrade id.
    pub id: UpgradeId,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Maximum purchasable level.
    pub max_level: u32,
    /// Cost curve over levels.
    pub cost: CostCurve,
    /// Effect magnitude contributed per level.
    pub effect_per_level: f64,
}

/// A permanent upgrade paid in chrono-energy and gated on rare-seed
/// ownership. Levels survive prestige.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermanentUpgradeDef {
    /// Unique upgrade id.
    pub id: UpgradeId,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Maximum purchasable level.
    pub max_level: u32,
    /// Chrono-energy cost at level zero.
    pub energy_base: f64,
    /// Multiplier applied to the energy cost per level.
    pub energy_growth: f64,
    /// Minimum number of rare seeds that must be owned to purchase.
    /// Seeds are a prerequisite, not a consumable: the collection is
    /// never reduced by a purchase.
    pub seed_requirement: usize,
    /// Effect magnitude contributed per level.
    pub effect_per_level: f64,
}

impl PermanentUpgradeDef {
    /// Chrono-energy cost to advance from `level` to `level + 1`.
    #[must_use]
    pub fn energy_cost(&self, level: u32) -> f64 {
        self.energy_base * self.energy_growth.powi(level as i32)
    }
}

/// A passive bonus whose level is a pure function of a tracked
/// statistic: `level = floor(stat / threshold)`, optionally capped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyDef {
    /// Unique synergy id.
    pub id: SynergyId,
    /// Display name.
    pub name: String,
    /// Statistic the synergy scales with.
    pub stat: StatKey,
    /// Stat value required per level.
    pub threshold: f64,
    /// Effect magnitude contributed per level.
    pub effect_per_level: f64,
    /// Optional level cap.
    #[serde(default)]
    pub max_levels: Option<u32>,
}

/// Reward granted by a completed goal or quest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reward {
    /// A chrono-energy grant.
    Energy(f64),
    /// A uniformly-random rare seed drawn from rare-eligible crops.
    RareSeed,
    /// A named resource grant.
    Resource {
        /// Resource to credit.
        resource: ResourceId,
        /// Amount to credit.
        amount: f64,
    },
}

/// A one-shot goal bound to a tracked statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalDef {
    /// Unique goal id.
    pub id: GoalId,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Statistic driving the goal's progress.
    pub stat: StatKey,
    /// Stat value at which the goal completes.
    pub target: f64,
    /// Reward granted exactly once on completion.
    pub reward: Reward,
}

/// Condition matched against gameplay events to advance a quest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuestCondition {
    /// Harvesting crops, optionally filtered by crop type and era.
    /// Progress advances by one per matching harvest.
    HarvestCrops {
        /// Only harvests of this crop count, if set.
        #[serde(default)]
        crop: Option<CropId>,
        /// Only harvests in this era count, if set.
        #[serde(default)]
        era: Option<EraId>,
    },
    /// Building automation rule instances; one per build.
    BuildAutomations,
    /// Earning chrono-energy; progress advances by the amount earned.
    EarnEnergy,
}

/// A time-limited task offered by a visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestDef {
    /// Unique quest id.
    pub id: QuestId,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Event condition that advances progress.
    pub condition: QuestCondition,
    /// Progress value at which the quest completes.
    pub target: f64,
    /// Optional time limit; an active quest past its limit fails when
    /// next evaluated.
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    /// Reward granted on completion.
    pub reward: Reward,
}

/// An NPC visitor who may appear in the garden and offer quests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitorDef {
    /// Unique visitor id.
    pub id: VisitorId,
    /// Display name.
    pub name: String,
    /// Greeting line shown on arrival.
    pub greeting: String,
    /// Quests this visitor can offer.
    pub quests: Vec<QuestDef>,
    /// Eras this visitor may appear in; empty means any era.
    #[serde(default)]
    pub eras: Vec<EraId>,
}

impl VisitorDef {
    /// Quests this visitor can still offer, given already-completed ids.
    pub fn eligible_quests<'a>(
        &'a self,
        completed: &'a std::collections::BTreeSet<QuestId>,
    ) -> impl Iterator<Item = &'a QuestDef> {
        self.quests.iter().filter(|q| !completed.contains(&q.id))
    }

    /// Whether this visitor can appear in the given era.
    #[must_use]
    pub fn appears_in(&self, era: &EraId) -> bool {
        self.eras.is_empty() || self.eras.contains(era)
    }
}

/// The complete immutable game catalog.
///
/// Loaded once and never mutated. Eras are ordered: the first entry is
/// unlocked at game start, and the last entry gates the prestige reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Ordered eras, earliest first.
    pub eras: Vec<EraDef>,
    /// All crop types.
    pub crops: Vec<CropDef>,
    /// Automation rule templates.
    #[serde(default)]
    pub automations: Vec<AutomationDef>,
    /// Regular upgrades.
    #[serde(default)]
    pub upgrades: Vec<UpgradeDef>,
    /// Permanent upgrades.
    #[serde(default)]
    pub permanent_upgrades: Vec<PermanentUpgradeDef>,
    /// Synergy definitions.
    #[serde(default)]
    pub synergies: Vec<SynergyDef>,
    /// Goal definitions.
    #[serde(default)]
    pub goals: Vec<GoalDef>,
    /// Visitor definitions.
    #[serde(default)]
    pub visitors: Vec<VisitorDef>,
    /// Resource amounts credited to a fresh game.
    #[serde(default)]
    pub starting_resources: CostMap,
}

impl Catalog {
    /// Look up an era by id.
    #[must_use]
    pub fn era(&self, id: &EraId) -> Option<&EraDef> {
        self.eras.iter().find(|e| &e.id == id)
    }

    /// Look up a crop by id.
    #[must_use]
    pub fn crop(&self, id: &CropId) -> Option<&CropDef> {
        self.crops.iter().find(|c| &c.id == id)
    }

    /// Look up an automation template by id.
    #[must_use]
    pub fn automation(&self, id: &AutomationId) -> Option<&AutomationDef> {
        self.automations.iter().find(|a| &a.id == id)
    }

    /// Look up a regular upgrade by id.
    #[must_use]
    pub fn upgrade(&self, id: &UpgradeId) -> Option<&UpgradeDef> {
        self.upgrades.iter().find(|u| &u.id == id)
    }

    /// Look up a permanent upgrade by id.
    #[must_use]
    pub fn permanent_upgrade(&self, id: &UpgradeId) -> Option<&PermanentUpgradeDef> {
        self.permanent_upgrades.iter().find(|u| &u.id == id)
    }

    /// Look up a goal by id.
    #[must_use]
    pub fn goal(&self, id: &GoalId) -> Option<&GoalDef> {
        self.goals.iter().find(|g| &g.id == id)
    }

    /// Look up a visitor by id.
    #[must_use]
    pub fn visitor(&self, id: &VisitorId) -> Option<&VisitorDef> {
        self.visitors.iter().find(|v| &v.id == id)
    }

    /// Look up a quest by id across all visitors.
    #[must_use]
    pub fn quest(&self, id: &QuestId) -> Option<(&VisitorDef, &QuestDef)> {
        self.visitors.iter().find_map(|visitor| {
            visitor
                .quests
                .iter()
                .find(|q| &q.id == id)
                .map(|quest| (visitor, quest))
        })
    }

    /// The era unlocked at game start.
    #[must_use]
    pub fn starting_era(&self) -> Option<&EraDef> {
        self.eras.first()
    }

    /// The era whose unlock gates the prestige reset.
    #[must_use]
    pub fn prestige_gate_era(&self) -> Option<&EraDef> {
        self.eras.last()
    }

    /// Crops eligible as rare-seed rewards, in catalog order.
    pub fn rare_crops(&self) -> impl Iterator<Item = &CropDef> {
        self.crops.iter().filter(|c| c.rare)
    }

    /// Validate internal consistency, collecting every problem found.
    ///
    /// # Errors
    /// Returns the full list of validation messages if anything is wrong.
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.eras.is_empty() {
            errors.push("catalog defines no eras".to_string());
        }

        check_unique(self.eras.iter().map(|e| e.id.as_str()), "era", &mut errors);
        check_unique(self.crops.iter().map(|c| c.id.as_str()), "crop", &mut errors);
        check_unique(
            self.automations.iter().map(|a| a.id.as_str()),
            "automation",
            &mut errors,
        );
        check_unique(
            self.upgrades
                .iter()
                .map(|u| u.id.as_str())
                .chain(self.permanent_upgrades.iter().map(|u| u.id.as_str())),
            "upgrade",
            &mut errors,
        );
        check_unique(
            self.goals.iter().map(|g| g.id.as_str()),
            "goal",
            &mut errors,
        );
        check_unique(
            self.visitors
                .iter()
                .flat_map(|v| v.quests.iter())
                .map(|q| q.id.as_str()),
            "quest",
            &mut errors,
        );

        for era in &self.eras {
            if era.unlock_cost < 0.0 || !era.unlock_cost.is_finite() {
                errors.push(format!("era '{}': invalid unlock cost", era.id));
            }
            if !(0.0..=1.0).contains(&era.visitor_chance) {
                errors.push(format!(
                    "era '{}': visitor chance must be within [0, 1]",
                    era.id
                ));
            }
            for crop_id in &era.crops {
                match self.crop(crop_id) {
                    None => errors.push(format!(
                        "era '{}' references unknown crop '{}'",
                        era.id, crop_id
                    )),
                    Some(crop) if crop.era != era.id => errors.push(format!(
                        "era '{}' lists crop '{}' that belongs to era '{}'",
                        era.id, crop_id, crop.era
                    )),
                    Some(_) => {}
                }
            }
        }

        for crop in &self.crops {
            if self.era(&crop.era).is_none() {
                errors.push(format!(
                    "crop '{}' references unknown era '{}'",
                    crop.id, crop.era
                ));
            }
            if crop.growth_secs <= 0.0 || !crop.growth_secs.is_finite() {
                errors.push(format!("crop '{}': growth duration must be positive", crop.id));
            }
            check_cost_map(&crop.yields, &format!("crop '{}' yields", crop.id), &mut errors);
            check_cost_map(
                &crop.requirements,
                &format!("crop '{}' requirements", crop.id),
                &mut errors,
            );
            if let Some(unlock) = &crop.unlock_cost {
                check_cost_map(unlock, &format!("crop '{}' unlock cost", crop.id), &mut errors);
            }
        }

        for automation in &self.automations {
            check_cost_map(
                &automation.cost,
                &format!("automation '{}' cost", automation.id),
                &mut errors,
            );
        }

        for upgrade in &self.upgrades {
            if upgrade.max_level == 0 {
                errors.push(format!("upgrade '{}': max level must be at least 1", upgrade.id));
            }
            if upgrade.cost.growth_factor < 1.0 || !upgrade.cost.growth_factor.is_finite() {
                errors.push(format!(
                    "upgrade '{}': growth factor must be at least 1",
                    upgrade.id
                ));
            }
            check_cost_map(
                &upgrade.cost.base,
                &format!("upgrade '{}' base cost", upgrade.id),
                &mut errors,
            );
        }

        for upgrade in &self.permanent_upgrades {
            if upgrade.max_level == 0 {
                errors.push(format!(
                    "permanent upgrade '{}': max level must be at least 1",
                    upgrade.id
                ));
            }
            if upgrade.energy_base < 0.0 || !upgrade.energy_base.is_finite() {
                errors.push(format!(
                    "permanent upgrade '{}': invalid base energy cost",
                    upgrade.id
                ));
            }
            if upgrade.energy_growth < 1.0 || !upgrade.energy_growth.is_finite() {
                errors.push(format!(
                    "permanent upgrade '{}': growth factor must be at least 1",
                    upgrade.id
                ));
            }
        }

        for synergy in &self.synergies {
            if synergy.threshold <= 0.0 || !synergy.threshold.is_finite() {
                errors.push(format!(
                    "synergy '{}': threshold must be positive",
                    synergy.id
                ));
            }
        }

        let has_rare_crop = self.crops.iter().any(|c| c.rare);
        let goal_rewards = self.goals.iter().map(|g| (&g.reward, format!("goal '{}'", g.id)));
        let quest_rewards = self
            .visitors
            .iter()
            .flat_map(|v| v.quests.iter())
            .map(|q| (&q.reward, format!("quest '{}'", q.id)));
        for (reward, owner) in goal_rewards.chain(quest_rewards) {
            match reward {
                Reward::RareSeed if !has_rare_crop => {
                    errors.push(format!(
                        "{owner} rewards a rare seed but no crop is rare-eligible"
                    ));
                }
                Reward::Energy(amount) | Reward::Resource { amount, .. }
                    if *amount < 0.0 || !amount.is_finite() =>
                {
                    errors.push(format!("{owner}: invalid reward amount"));
                }
                _ => {}
            }
        }

        for goal in &self.goals {
            if goal.target <= 0.0 || !goal.target.is_finite() {
                errors.push(format!("goal '{}': target must be positive", goal.id));
            }
        }

        for visitor in &self.visitors {
            for era in &visitor.eras {
                if self.era(era).is_none() {
                    errors.push(format!(
                        "visitor '{}' references unknown era '{}'",
                        visitor.id, era
                    ));
                }
            }
            for quest in &visitor.quests {
                if quest.target <= 0.0 || !quest.target.is_finite() {
                    errors.push(format!("quest '{}': target must be positive", quest.id));
                }
                if let Some(minutes) = quest.duration_minutes {
                    if minutes <= 0.0 || !minutes.is_finite() {
                        errors.push(format!("quest '{}': duration must be positive", quest.id));
                    }
                }
                if let QuestCondition::HarvestCrops { crop, era } = &quest.condition {
                    if let Some(crop) = crop {
                        if self.crop(crop).is_none() {
                            errors.push(format!(
                                "quest '{}' references unknown crop '{}'",
                                quest.id, crop
                            ));
                        }
                    }
                    if let Some(era) = era {
                        if self.era(era).is_none() {
                            errors.push(format!(
                                "quest '{}' references unknown era '{}'",
                                quest.id, era
                            ));
                        }
                    }
                }
            }
        }

        check_cost_map(&self.starting_resources, "starting resources", &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_unique<'a>(
    ids: impl Iterator<Item = &'a str>,
    kind: &str,
    errors: &mut Vec<String>,
) {
    let mut seen = std::collections::BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(format!("duplicate {kind} id: {id}"));
        }
    }
}

fn check_cost_map(map: &CostMap, owner: &str, errors: &mut Vec<String>) {
    for (resource, &amount) in map {
        if amount < 0.0 || !amount.is_finite() {
            errors.push(format!("{owner}: invalid amount for '{resource}'"));
        }
    }
}
