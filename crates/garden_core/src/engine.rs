//! Progression engine: the state machine that applies every player and
//! automation action to the game state.
//!
//! The engine is an explicit instance constructed with a catalog, an
//! initial snapshot, and an injected random source; nothing is ambient or
//! global. Actions are applied one at a time, each producing the next
//! snapshot from the previous one. Handlers validate before they mutate,
//! so a rejected action leaves the state byte-for-byte unchanged and is
//! reported as an `Err` value, never a panic.
//!
//! Time-dependent rules (growth maturity, quest expiry) are pull-based:
//! every `apply` call takes `now` from the caller, and the engine owns no
//! timers.
//!
//! # Example
//!
//! ```
//! use garden_core::engine::{Action, Engine};
//! use garden_core::growth::Timestamp;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let catalog = garden_test_utils::fixtures::demo_catalog();
//! let rng = StdRng::seed_from_u64(7);
//! let mut engine = Engine::new(catalog, "Ada", "First Garden", rng).unwrap();
//!
//! let now = Timestamp::from_secs(0);
//! engine
//!     .apply(
//!         Action::PlantCrop {
//!             crop: "tomato".into(),
//!             era: "Present".into(),
//!         },
//!         now,
//!     )
//!     .unwrap();
//! assert_eq!(engine.state().planted.len(), 1);
//! ```

use std::collections::BTreeMap;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::{GameError, Result};
use crate::events::{GameplayEvent, MarketItem};
use crate::goals;
use crate::growth::Timestamp;
use crate::ids::{
    AutomationId, CropId, EraId, PlantId, QuestId, ResourceId, StatKey, SynergyId, UpgradeId,
    VisitorId,
};
use crate::journal::Journal;
use crate::quests;
use crate::state::{
    era_harvest_stat, AutomationInstance, GameState, PlantedCrop, STAT_AUTOMATIONS_BUILT,
};
use crate::synergy;

/// Soil quality lost when a crop is planted.
pub const SOIL_COST_PLANT: f64 = 2.0;

/// Soil quality lost when an automation rule instance is built.
pub const SOIL_COST_AUTOMATION: f64 = 5.0;

/// A discrete trigger applied to the game state.
///
/// Every external input - a player command or a timed tick - enters the
/// engine as one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Switch the current era to an already-unlocked era.
    SetEra {
        /// Era to switch to.
        era: EraId,
    },
    /// Unlock an era by paying its chrono-energy cost.
    UnlockEra {
        /// Era to unlock.
        era: EraId,
    },
    /// Credit chrono-energy unconditionally.
    AddEnergy {
        /// Amount to credit; must be non-negative.
        amount: f64,
    },
    /// Spend chrono-energy, clamping at a zero floor instead of
    /// rejecting. This soft floor is deliberate and distinct from the
    /// ledger's hard rejection.
    SpendEnergy {
        /// Amount to spend; must be non-negative.
        amount: f64,
    },
    /// Raw signed resource adjustment. Performs no affordability check;
    /// callers must pre-validate deductions. Prefer the purchase-style
    /// actions, which check and debit atomically.
    UpdateResource {
        /// Resource to adjust.
        resource: ResourceId,
        /// Signed delta.
        delta: f64,
    },
    /// Plant a crop, debiting its requirements atomically.
    PlantCrop {
        /// Crop type to plant.
        crop: CropId,
        /// Era garden to plant it in.
        era: EraId,
    },
    /// Harvest a mature planted crop, crediting its yields.
    HarvestCrop {
        /// Instance to harvest.
        plant: PlantId,
    },
    /// Build an automation rule instance from a catalog template,
    /// debiting its cost atomically.
    AddAutomation {
        /// Template to instantiate.
        template: AutomationId,
    },
    /// Remove an automation rule instance.
    RemoveAutomation {
        /// Instance to remove.
        id: AutomationId,
    },
    /// Purchase the next level of a regular upgrade.
    PurchaseUpgrade {
        /// Upgrade to advance.
        upgrade: UpgradeId,
    },
    /// Purchase the next level of a permanent upgrade. Costs
    /// chrono-energy and requires a minimum rare-seed collection.
    PurchasePermanentUpgrade {
        /// Permanent upgrade to advance.
        upgrade: UpgradeId,
    },
    /// Accept a quest from the current visitor.
    AcceptQuest {
        /// Visitor offering the quest.
        visitor: VisitorId,
        /// Quest to accept.
        quest: QuestId,
    },
    /// Dismiss the current visitor, if their quest is finished or they
    /// have nothing left to offer.
    DismissVisitor,
    /// List an item on the market, debiting it locally at creation.
    ListOnMarket {
        /// Item to list.
        item: MarketItem,
        /// Quantity to list; must be 1 for seeds.
        quantity: f64,
        /// Asking price.
        price: f64,
    },
    /// Prestige: soft-reset to the initial snapshot, preserving rare
    /// seeds, permanent upgrades, lifetime totals, and display names.
    Prestige,
    /// Periodic visitor-spawn check, delivered by an external driver at
    /// its own cadence. Also settles quest expiry against `now`.
    VisitorCheck,
}

/// The progression engine. Owns the game state, the catalog, and the
/// injected random source.
#[derive(Debug)]
pub struct Engine<R: RngCore> {
    state: GameState,
    catalog: Catalog,
    rng: R,
    journal: Journal,
}

impl<R: RngCore> Engine<R> {
    /// Create an engine with a fresh initial snapshot.
    ///
    /// # Errors
    /// Returns [`GameError::EmptyCatalog`] if the catalog has no eras.
    pub fn new(
        catalog: Catalog,
        player_name: impl Into<String>,
        garden_name: impl Into<String>,
        rng: R,
    ) -> Result<Self> {
        let state = GameState::new(&catalog, player_name, garden_name)?;
        let journal = Journal::new(state.digest()?);
        Ok(Self {
            state,
            catalog,
            rng,
            journal,
        })
    }

    /// Create an engine from a previously persisted snapshot.
    ///
    /// # Errors
    /// Returns [`GameError::UnknownEra`] if the snapshot's current era is
    /// not in the catalog.
    pub fn from_state(catalog: Catalog, state: GameState, rng: R) -> Result<Self> {
        if catalog.era(&state.current_era).is_none() {
            return Err(GameError::UnknownEra(state.current_era.clone()));
        }
        let journal = Journal::new(state.digest()?);
        Ok(Self {
            state,
            catalog,
            rng,
            journal,
        })
    }

    /// The current state snapshot.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The catalog this engine was built with.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The journal of successfully applied actions.
    #[must_use]
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Apply one action at `now`, returning the events it produced.
    ///
    /// After the handler runs, its events are fed to the quest subsystem
    /// and goal evaluation re-runs, so follow-on completions land in the
    /// same returned batch.
    ///
    /// # Errors
    /// Returns the rejection for an invalid action; the state is
    /// unchanged in that case.
    pub fn apply(&mut self, action: Action, now: Timestamp) -> Result<Vec<GameplayEvent>> {
        debug!(?action, now = now.as_millis(), "applying action");
        let mut events = self.handle(&action, now)?;
        let follow_on = quests::observe(&self.catalog, &mut self.state, &events, now, &mut self.rng);
        events.extend(follow_on);
        events.extend(goals::evaluate(&self.catalog, &mut self.state, &mut self.rng));
        self.journal.record(now, action);
        Ok(events)
    }

    /// Periodic visitor-spawn check, driven externally at the caller's
    /// cadence. Shorthand for applying [`Action::VisitorCheck`], which
    /// never rejects.
    pub fn check_visitor(&mut self, now: Timestamp) -> Vec<GameplayEvent> {
        self.apply(Action::VisitorCheck, now).unwrap_or_default()
    }

    /// Growth maturity of a planted crop at `now`.
    #[must_use]
    pub fn maturity_of(&self, plant: PlantId, now: Timestamp) -> Option<f64> {
        let planted = self.state.planted_crop(plant)?;
        let crop = self.catalog.crop(&planted.crop)?;
        Some(planted.maturity(crop.growth_secs, now))
    }

    /// Current level of every synergy, derived from stats on demand.
    #[must_use]
    pub fn synergy_levels(&self) -> BTreeMap<SynergyId, u32> {
        synergy::levels(&self.catalog, &self.state)
    }

    fn handle(&mut self, action: &Action, now: Timestamp) -> Result<Vec<GameplayEvent>> {
        match action {
            Action::SetEra { era } => self.set_era(era),
            Action::UnlockEra { era } => self.unlock_era(era),
            Action::AddEnergy { amount } => self.add_energy(*amount),
            Action::SpendEnergy { amount } => self.spend_energy(*amount),
            Action::UpdateResource { resource, delta } => self.update_resource(resource, *delta),
            Action::PlantCrop { crop, era } => self.plant_crop(crop, era, now),
            Action::HarvestCrop { plant } => self.harvest_crop(*plant, now),
            Action::AddAutomation { template } => self.add_automation(template),
            Action::RemoveAutomation { id } => self.remove_automation(id),
            Action::PurchaseUpgrade { upgrade } => self.purchase_upgrade(upgrade),
            Action::PurchasePermanentUpgrade { upgrade } => {
                self.purchase_permanent_upgrade(upgrade)
            }
            Action::AcceptQuest { visitor, quest } => {
                quests::accept(&self.catalog, &mut self.state, visitor, quest, now)
            }
            Action::DismissVisitor => quests::dismiss(&self.catalog, &mut self.state),
            Action::ListOnMarket {
                item,
                quantity,
                price,
            } => self.list_on_market(item, *quantity, *price),
            Action::Prestige => self.prestige(),
            Action::VisitorCheck => Ok(quests::check_visitor(
                &self.catalog,
                &mut self.state,
                now,
                &mut self.rng,
            )),
        }
    }

    fn set_era(&mut self, era: &EraId) -> Result<Vec<GameplayEvent>> {
        if self.catalog.era(era).is_none() {
            return Err(GameError::UnknownEra(era.clone()));
        }
        if !self.state.unlocked_eras.contains(era) {
            return Err(GameError::EraLocked(era.clone()));
        }
        self.state.current_era = era.clone();
        Ok(vec![GameplayEvent::EraEntered { era: era.clone() }])
    }

    fn unlock_era(&mut self, era: &EraId) -> Result<Vec<GameplayEvent>> {
        let def = self
            .catalog
            .era(era)
            .ok_or_else(|| GameError::UnknownEra(era.clone()))?;
        if self.state.unlocked_eras.contains(era) {
            return Err(GameError::EraAlreadyUnlocked(era.clone()));
        }
        if self.state.chrono_energy < def.unlock_cost {
            return Err(GameError::InsufficientEnergy {
                required: def.unlock_cost,
                available: self.state.chrono_energy,
            });
        }

        self.state.chrono_energy -= def.unlock_cost;
        self.state.unlocked_eras.insert(era.clone());
        info!(%era, cost = def.unlock_cost, "era unlocked");

        let mut events = vec![GameplayEvent::EraUnlocked { era: era.clone() }];
        for lore in &def.lore {
            if self.state.unlocked_lore.insert(lore.clone()) {
                events.push(GameplayEvent::LoreUnlocked { lore: lore.clone() });
            }
        }
        Ok(events)
    }

    fn add_energy(&mut self, amount: f64) -> Result<Vec<GameplayEvent>> {
        check_amount(amount)?;
        self.state.gain_energy(amount);
        Ok(vec![GameplayEvent::EnergyEarned { amount }])
    }

    fn spend_energy(&mut self, amount: f64) -> Result<Vec<GameplayEvent>> {
        check_amount(amount)?;
        let spent = amount.min(self.state.chrono_energy);
        let clamped = spent < amount;
        self.state.chrono_energy -= spent;
        if clamped {
            warn!(
                requested = amount,
                spent, "energy spend hit the zero floor"
            );
        }
        Ok(vec![GameplayEvent::EnergySpent {
            amount: spent,
            clamped,
        }])
    }

    fn update_resource(&mut self, resource: &ResourceId, delta: f64) -> Result<Vec<GameplayEvent>> {
        if !delta.is_finite() {
            return Err(GameError::InvalidAmount(delta));
        }
        self.state.ledger.apply_delta(resource, delta);
        Ok(vec![GameplayEvent::ResourceAdjusted {
            resource: resource.clone(),
            delta,
        }])
    }

    fn plant_crop(&mut self, crop: &CropId, era: &EraId, now: Timestamp) -> Result<Vec<GameplayEvent>> {
        let def = self
            .catalog
            .crop(crop)
            .ok_or_else(|| GameError::UnknownCrop(crop.clone()))?;
        if self.catalog.era(era).is_none() {
            return Err(GameError::UnknownEra(era.clone()));
        }
        if !self.state.unlocked_eras.contains(era) {
            return Err(GameError::EraLocked(era.clone()));
        }
        // Rare seeds make their crop plantable in any era.
        if def.era != *era && !self.state.rare_seeds.contains(crop) {
            return Err(GameError::CropNotAvailable {
                crop: crop.clone(),
                era: era.clone(),
            });
        }

        self.state.ledger.debit_all(&def.requirements)?;
        let id = self.state.fresh_plant_id();
        self.state.planted.push(PlantedCrop {
            id,
            crop: crop.clone(),
            era: era.clone(),
            planted_at: now,
        });
        self.state.lower_soil(SOIL_COST_PLANT);
        debug!(plant = %id, %crop, %era, "crop planted");
        Ok(vec![GameplayEvent::CropPlanted {
            plant: id,
            crop: crop.clone(),
            era: era.clone(),
        }])
    }

    fn harvest_crop(&mut self, plant: PlantId, now: Timestamp) -> Result<Vec<GameplayEvent>> {
        let position = self
            .state
            .planted
            .iter()
            .position(|p| p.id == plant)
            .ok_or(GameError::PlantNotFound(plant))?;
        let planted = &self.state.planted[position];
        let def = self
            .catalog
            .crop(&planted.crop)
            .ok_or_else(|| GameError::UnknownCrop(planted.crop.clone()))?;

        let maturity = planted.maturity(def.growth_secs, now);
        if maturity < 1.0 {
            return Err(GameError::CropNotMature {
                plant,
                percent: maturity * 100.0,
            });
        }

        let yields = def.yields.clone();
        let planted = self.state.planted.remove(position);
        self.state.ledger.credit_all(&yields);
        self.state.lifetime.crops_harvested += 1;
        self.state
            .stats
            .bump(era_harvest_stat(&planted.era), 1.0);
        debug!(plant = %plant, crop = %planted.crop, "crop harvested");
        Ok(vec![GameplayEvent::CropHarvested {
            plant,
            crop: planted.crop,
            era: planted.era,
        }])
    }

    fn add_automation(&mut self, template: &AutomationId) -> Result<Vec<GameplayEvent>> {
        let def = self
            .catalog
            .automation(template)
            .ok_or_else(|| GameError::UnknownAutomation(template.clone()))?;

        self.state.ledger.debit_all(&def.cost)?;
        let id = self.state.fresh_automation_id(template);
        self.state.automations.push(AutomationInstance {
            id: id.clone(),
            template: template.clone(),
            name: def.name.clone(),
            description: def.description.clone(),
            effect: def.effect.clone(),
        });
        self.state.lower_soil(SOIL_COST_AUTOMATION);
        self.state
            .stats
            .bump(StatKey::new(STAT_AUTOMATIONS_BUILT), 1.0);
        debug!(%id, %template, "automation built");
        Ok(vec![GameplayEvent::AutomationBuilt {
            id,
            template: template.clone(),
        }])
    }

    fn remove_automation(&mut self, id: &AutomationId) -> Result<Vec<GameplayEvent>> {
        let position = self
            .state
            .automations
            .iter()
            .position(|a| &a.id == id)
            .ok_or_else(|| GameError::AutomationNotFound(id.clone()))?;
        self.state.automations.remove(position);
        Ok(vec![GameplayEvent::AutomationRemoved { id: id.clone() }])
    }

    fn purchase_upgrade(&mut self, upgrade: &UpgradeId) -> Result<Vec<GameplayEvent>> {
        let def = self
            .catalog
            .upgrade(upgrade)
            .ok_or_else(|| GameError::UnknownUpgrade(upgrade.clone()))?;
        let level = self.state.upgrades.get(upgrade).copied().unwrap_or(0);
        if level >= def.max_level {
            return Err(GameError::MaxLevelReached(upgrade.clone()));
        }

        let cost = def.cost.at(level);
        self.state.ledger.debit_all(&cost)?;
        let next = level + 1;
        self.state.upgrades.insert(upgrade.clone(), next);
        info!(%upgrade, level = next, "upgrade purchased");
        Ok(vec![GameplayEvent::UpgradePurchased {
            upgrade: upgrade.clone(),
            level: next,
        }])
    }

    fn purchase_permanent_upgrade(&mut self, upgrade: &UpgradeId) -> Result<Vec<GameplayEvent>> {
        let def = self
            .catalog
            .permanent_upgrade(upgrade)
            .ok_or_else(|| GameError::UnknownUpgrade(upgrade.clone()))?;
        let level = self
            .state
            .permanent_upgrades
            .get(upgrade)
            .copied()
            .unwrap_or(0);
        if level >= def.max_level {
            return Err(GameError::MaxLevelReached(upgrade.clone()));
        }
        if self.state.rare_seeds.len() < def.seed_requirement {
            return Err(GameError::InsufficientRareSeeds {
                required: def.seed_requirement,
                available: self.state.rare_seeds.len(),
            });
        }
        let cost = def.energy_cost(level);
        if self.state.chrono_energy < cost {
            return Err(GameError::InsufficientEnergy {
                required: cost,
                available: self.state.chrono_energy,
            });
        }

        self.state.chrono_energy -= cost;
        let next = level + 1;
        self.state.permanent_upgrades.insert(upgrade.clone(), next);
        info!(%upgrade, level = next, "permanent upgrade purchased");
        Ok(vec![GameplayEvent::PermanentUpgradePurchased {
            upgrade: upgrade.clone(),
            level: next,
        }])
    }

    fn list_on_market(
        &mut self,
        item: &MarketItem,
        quantity: f64,
        price: f64,
    ) -> Result<Vec<GameplayEvent>> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(GameError::InvalidAmount(quantity));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(GameError::InvalidAmount(price));
        }

        // The listed item is debited locally at creation. The debit is
        // optimistic: a later remote publish failure does not roll it
        // back.
        match item {
            MarketItem::Seed(crop) => {
                if quantity != 1.0 {
                    return Err(GameError::InvalidAmount(quantity));
                }
                if !self.state.rare_seeds.remove(crop) {
                    return Err(GameError::SeedNotOwned(crop.clone()));
                }
            }
            MarketItem::Resource(resource) => {
                self.state.ledger.debit(resource, quantity)?;
            }
        }

        info!(item = item.item_id(), quantity, price, "item listed on market");
        Ok(vec![GameplayEvent::ItemListed {
            item: item.clone(),
            quantity,
            price,
        }])
    }

    fn prestige(&mut self) -> Result<Vec<GameplayEvent>> {
        let gate = self
            .catalog
            .prestige_gate_era()
            .ok_or(GameError::EmptyCatalog)?;
        if !self.state.unlocked_eras.contains(&gate.id) {
            return Err(GameError::PrestigeLocked {
                required: gate.id.clone(),
            });
        }

        let mut fresh = GameState::new(
            &self.catalog,
            self.state.player_name.clone(),
            self.state.garden_name.clone(),
        )?;
        fresh.rare_seeds = std::mem::take(&mut self.state.rare_seeds);
        fresh.permanent_upgrades = std::mem::take(&mut self.state.permanent_upgrades);
        fresh.lifetime = self.state.lifetime;
        fresh.prestige_count = self.state.prestige_count + 1;
        // Goals bound to lifetime-backed stats keep their status so the
        // reset cannot re-grant their rewards.
        for goal in &self.catalog.goals {
            if GameState::is_lifetime_stat(&goal.stat) {
                if let Some(status) = self.state.goals.get(&goal.id) {
                    fresh.goals.insert(goal.id.clone(), *status);
                }
            }
        }

        let count = fresh.prestige_count;
        self.state = fresh;
        info!(count, "prestige reset complete");
        Ok(vec![GameplayEvent::PrestigeCompleted { count }])
    }
}

fn check_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(GameError::InvalidAmount(amount));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{demo_catalog, demo_engine, seeded_rng, ts};

    #[test]
    fn test_plant_then_harvest_scenario() {
        let mut engine = demo_engine(1);
        let t0 = ts(0);

        let events = engine
            .apply(
                Action::PlantCrop {
                    crop: "tomato".into(),
                    era: "Present".into(),
                },
                t0,
            )
            .unwrap();
        let GameplayEvent::CropPlanted { plant, .. } = events[0] else {
            panic!("expected a planting event");
        };
        assert_eq!(engine.state().planted.len(), 1);

        // Harvesting immediately is rejected at maturity zero.
        let err = engine
            .apply(Action::HarvestCrop { plant }, t0)
            .unwrap_err();
        assert!(matches!(err, GameError::CropNotMature { .. }));
        assert_eq!(engine.state().planted.len(), 1);

        // After the 60s growth duration the harvest succeeds and credits
        // the configured yield.
        let tomatoes_before = engine.state().ledger.amount(&"Tomatoes".into());
        let seeds_before = engine.state().ledger.amount(&"Seeds".into());
        engine
            .apply(Action::HarvestCrop { plant }, t0.plus_secs(60))
            .unwrap();

        assert!(engine.state().planted.is_empty());
        assert_eq!(
            engine.state().ledger.amount(&"Tomatoes".into()),
            tomatoes_before + 3.0
        );
        assert_eq!(
            engine.state().ledger.amount(&"Seeds".into()),
            seeds_before + 1.0
        );
        assert_eq!(engine.state().lifetime.crops_harvested, 1);
    }

    #[test]
    fn test_plant_debits_requirements_atomically() {
        let mut engine = demo_engine(1);
        let seeds_before = engine.state().ledger.amount(&"Seeds".into());
        let water_before = engine.state().ledger.amount(&"Water".into());

        engine
            .apply(
                Action::PlantCrop {
                    crop: "tomato".into(),
                    era: "Present".into(),
                },
                ts(0),
            )
            .unwrap();
        assert_eq!(
            engine.state().ledger.amount(&"Seeds".into()),
            seeds_before - 1.0
        );
        assert_eq!(
            engine.state().ledger.amount(&"Water".into()),
            water_before - 5.0
        );

        // Drain water so requirements become unaffordable; the seed
        // balance must not be touched by the failed attempt.
        let remaining_water = engine.state().ledger.amount(&"Water".into());
        engine
            .apply(
                Action::UpdateResource {
                    resource: "Water".into(),
                    delta: -remaining_water,
                },
                ts(1),
            )
            .unwrap();
        let seeds = engine.state().ledger.amount(&"Seeds".into());
        let err = engine
            .apply(
                Action::PlantCrop {
                    crop: "tomato".into(),
                    era: "Present".into(),
                },
                ts(2),
            )
            .unwrap_err();
        assert!(matches!(err, GameError::InsufficientResources { .. }));
        assert_eq!(engine.state().ledger.amount(&"Seeds".into()), seeds);
        assert_eq!(engine.state().planted.len(), 1);
    }

    #[test]
    fn test_planting_lowers_soil_quality() {
        let mut engine = demo_engine(1);
        let before = engine.state().soil_quality;
        engine
            .apply(
                Action::PlantCrop {
                    crop: "tomato".into(),
                    era: "Present".into(),
                },
                ts(0),
            )
            .unwrap();
        assert_eq!(engine.state().soil_quality, before - SOIL_COST_PLANT);
    }

    #[test]
    fn test_unlock_era_scenario() {
        let mut engine = demo_engine(1);
        let prehistoric: EraId = "Prehistoric".into();

        // 50 energy against a cost of 100 is rejected.
        engine
            .apply(Action::AddEnergy { amount: 50.0 }, ts(0))
            .unwrap();
        let err = engine
            .apply(
                Action::UnlockEra {
                    era: prehistoric.clone(),
                },
                ts(1),
            )
            .unwrap_err();
        assert!(matches!(err, GameError::InsufficientEnergy { .. }));
        assert!(!engine.state().unlocked_eras.contains(&prehistoric));

        // At 150 energy the unlock succeeds and leaves 50.
        engine
            .apply(Action::AddEnergy { amount: 100.0 }, ts(2))
            .unwrap();
        engine
            .apply(
                Action::UnlockEra {
                    era: prehistoric.clone(),
                },
                ts(3),
            )
            .unwrap();
        assert!(engine.state().unlocked_eras.contains(&prehistoric));
        assert_eq!(engine.state().chrono_energy, 50.0);

        // Unlocking twice never succeeds.
        let err = engine
            .apply(Action::UnlockEra { era: prehistoric }, ts(4))
            .unwrap_err();
        assert!(matches!(err, GameError::EraAlreadyUnlocked(_)));
    }

    #[test]
    fn test_set_era_requires_unlock() {
        let mut engine = demo_engine(1);
        let err = engine
            .apply(
                Action::SetEra {
                    era: "Prehistoric".into(),
                },
                ts(0),
            )
            .unwrap_err();
        assert_eq!(err, GameError::EraLocked("Prehistoric".into()));
        assert_eq!(engine.state().current_era, "Present".into());
    }

    #[test]
    fn test_spend_energy_clamps_at_zero() {
        let mut engine = demo_engine(1);
        engine
            .apply(Action::AddEnergy { amount: 30.0 }, ts(0))
            .unwrap();
        let events = engine
            .apply(Action::SpendEnergy { amount: 50.0 }, ts(1))
            .unwrap();

        // The spend clamps instead of rejecting.
        assert!(events.iter().any(|e| matches!(
            e,
            GameplayEvent::EnergySpent {
                amount,
                clamped: true
            } if *amount == 30.0
        )));
        assert_eq!(engine.state().chrono_energy, 0.0);
    }

    #[test]
    fn test_upgrade_cost_escalates_and_caps() {
        let mut engine = demo_engine(1);
        let upgrade: UpgradeId = "quick_growth".into();
        engine
            .apply(
                Action::UpdateResource {
                    resource: "Tomatoes".into(),
                    delta: 1_000.0,
                },
                ts(0),
            )
            .unwrap();

        let mut last_cost = 0.0;
        for level in 1..=5 {
            let before = engine.state().ledger.amount(&"Tomatoes".into());
            engine
                .apply(
                    Action::PurchaseUpgrade {
                        upgrade: upgrade.clone(),
                    },
                    ts(level),
                )
                .unwrap();
            let cost = before - engine.state().ledger.amount(&"Tomatoes".into());
            assert!(cost > last_cost, "cost must be non-decreasing");
            last_cost = cost;
        }
        assert_eq!(engine.state().upgrades[&upgrade], 5);

        let err = engine
            .apply(Action::PurchaseUpgrade { upgrade }, ts(9))
            .unwrap_err();
        assert!(matches!(err, GameError::MaxLevelReached(_)));
    }

    #[test]
    fn test_permanent_upgrade_requires_rare_seeds() {
        let mut engine = demo_engine(1);
        let upgrade: UpgradeId = "temporal_mastery".into();
        engine
            .apply(Action::AddEnergy { amount: 500.0 }, ts(0))
            .unwrap();

        let err = engine
            .apply(
                Action::PurchasePermanentUpgrade {
                    upgrade: upgrade.clone(),
                },
                ts(1),
            )
            .unwrap_err();
        assert!(matches!(err, GameError::InsufficientRareSeeds { .. }));

        // Seeds gate the purchase but are not consumed by it.
        engine.state.rare_seeds.insert("chrono_bloom".into());
        engine
            .apply(Action::PurchasePermanentUpgrade { upgrade }, ts(2))
            .unwrap();
        assert_eq!(engine.state().rare_seeds.len(), 1);
        assert_eq!(
            engine.state().permanent_upgrades[&UpgradeId::new("temporal_mastery")],
            1
        );
    }

    #[test]
    fn test_automation_lifecycle() {
        let mut engine = demo_engine(1);
        let soil_before = engine.state().soil_quality;

        let events = engine
            .apply(
                Action::AddAutomation {
                    template: "sprinkler".into(),
                },
                ts(0),
            )
            .unwrap();
        let GameplayEvent::AutomationBuilt { id, .. } = &events[0] else {
            panic!("expected an automation build event");
        };
        assert_eq!(engine.state().automations.len(), 1);
        assert_eq!(
            engine.state().soil_quality,
            soil_before - SOIL_COST_AUTOMATION
        );

        // A second copy of the same template gets a distinct id.
        let events = engine
            .apply(
                Action::AddAutomation {
                    template: "sprinkler".into(),
                },
                ts(1),
            )
            .unwrap();
        let GameplayEvent::AutomationBuilt { id: second, .. } = &events[0] else {
            panic!("expected an automation build event");
        };
        assert_ne!(id, second);

        engine
            .apply(Action::RemoveAutomation { id: id.clone() }, ts(2))
            .unwrap();
        assert_eq!(engine.state().automations.len(), 1);
        assert_eq!(&engine.state().automations[0].id, second);
    }

    #[test]
    fn test_market_listing_debits_optimistically() {
        let mut engine = demo_engine(1);
        let water_before = engine.state().ledger.amount(&"Water".into());

        engine
            .apply(
                Action::ListOnMarket {
                    item: MarketItem::Resource("Water".into()),
                    quantity: 10.0,
                    price: 5.0,
                },
                ts(0),
            )
            .unwrap();
        assert_eq!(
            engine.state().ledger.amount(&"Water".into()),
            water_before - 10.0
        );

        // Listing more than is held is rejected before any debit.
        let err = engine
            .apply(
                Action::ListOnMarket {
                    item: MarketItem::Resource("Water".into()),
                    quantity: 10_000.0,
                    price: 5.0,
                },
                ts(1),
            )
            .unwrap_err();
        assert!(matches!(err, GameError::InsufficientResources { .. }));

        // Seed listings remove the seed from the collection.
        engine.state.rare_seeds.insert("chrono_bloom".into());
        engine
            .apply(
                Action::ListOnMarket {
                    item: MarketItem::Seed("chrono_bloom".into()),
                    quantity: 1.0,
                    price: 100.0,
                },
                ts(2),
            )
            .unwrap();
        assert!(engine.state().rare_seeds.is_empty());
    }

    #[test]
    fn test_prestige_carries_the_right_state() {
        let mut engine = demo_engine(1);

        // Build up a run worth resetting.
        engine
            .apply(Action::AddEnergy { amount: 5_000.0 }, ts(0))
            .unwrap();
        engine
            .apply(
                Action::UnlockEra {
                    era: "Prehistoric".into(),
                },
                ts(1),
            )
            .unwrap();
        engine
            .apply(
                Action::UnlockEra {
                    era: "Future".into(),
                },
                ts(2),
            )
            .unwrap();
        engine
            .apply(
                Action::PlantCrop {
                    crop: "tomato".into(),
                    era: "Present".into(),
                },
                ts(3),
            )
            .unwrap();
        engine.state.rare_seeds.insert("chrono_bloom".into());
        engine
            .apply(
                Action::PurchasePermanentUpgrade {
                    upgrade: "temporal_mastery".into(),
                },
                ts(4),
            )
            .unwrap();

        let seeds = engine.state().rare_seeds.clone();
        let permanents = engine.state().permanent_upgrades.clone();
        let lifetime = engine.state().lifetime;
        let initial = GameState::new(&demo_catalog(), "Ada", "First Garden").unwrap();

        engine.apply(Action::Prestige, ts(5)).unwrap();
        let state = engine.state();

        assert_eq!(state.rare_seeds, seeds);
        assert_eq!(state.permanent_upgrades, permanents);
        assert_eq!(state.lifetime, lifetime);
        assert_eq!(state.prestige_count, 1);
        assert_eq!(state.player_name, "Ada");
        // Everything else reverts to the initial snapshot.
        assert_eq!(state.ledger, initial.ledger);
        assert_eq!(state.chrono_energy, 0.0);
        assert!(state.planted.is_empty());
        assert!(state.automations.is_empty());
        assert!(state.upgrades.is_empty());
        assert_eq!(state.soil_quality, initial.soil_quality);
        assert_eq!(state.unlocked_eras, initial.unlocked_eras);
    }

    #[test]
    fn test_prestige_is_gated_on_the_final_era() {
        let mut engine = demo_engine(1);
        let err = engine.apply(Action::Prestige, ts(0)).unwrap_err();
        assert_eq!(
            err,
            GameError::PrestigeLocked {
                required: "Future".into()
            }
        );
        assert_eq!(engine.state().prestige_count, 0);
    }

    #[test]
    fn test_prestige_does_not_regrant_lifetime_goals() {
        let mut engine = demo_engine(1);

        // Complete the lifetime-backed first-harvest goal.
        engine
            .apply(
                Action::PlantCrop {
                    crop: "tomato".into(),
                    era: "Present".into(),
                },
                ts(0),
            )
            .unwrap();
        let plant = engine.state().planted[0].id;
        engine
            .apply(Action::HarvestCrop { plant }, ts(0).plus_secs(60))
            .unwrap();
        assert!(engine.state().goals[&"first_harvest".into()].completed);

        // Reach the prestige gate and reset.
        engine
            .apply(Action::AddEnergy { amount: 5_000.0 }, ts(70))
            .unwrap();
        engine
            .apply(
                Action::UnlockEra {
                    era: "Prehistoric".into(),
                },
                ts(71),
            )
            .unwrap();
        engine
            .apply(
                Action::UnlockEra {
                    era: "Future".into(),
                },
                ts(72),
            )
            .unwrap();
        let events = engine.apply(Action::Prestige, ts(73)).unwrap();

        // The goal stays completed and its reward is not granted again.
        assert!(engine.state().goals[&"first_harvest".into()].completed);
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameplayEvent::GoalCompleted { goal } if *goal == "first_harvest".into())));
    }

    #[test]
    fn test_rejected_action_leaves_state_unchanged() {
        let mut engine = demo_engine(1);
        let digest = engine.state().digest().unwrap();

        let rejections = [
            Action::SetEra {
                era: "Future".into(),
            },
            Action::HarvestCrop {
                plant: PlantId::new(99),
            },
            Action::PurchaseUpgrade {
                upgrade: "quick_growth".into(),
            },
            Action::Prestige,
        ];
        for action in rejections {
            assert!(engine.apply(action, ts(0)).is_err());
            assert_eq!(engine.state().digest().unwrap(), digest);
        }
    }

    #[test]
    fn test_harvest_feeds_goal_evaluation() {
        let mut engine = demo_engine(1);
        engine
            .apply(
                Action::PlantCrop {
                    crop: "tomato".into(),
                    era: "Present".into(),
                },
                ts(0),
            )
            .unwrap();
        let plant = engine.state().planted[0].id;
        let events = engine
            .apply(Action::HarvestCrop { plant }, ts(0).plus_secs(60))
            .unwrap();

        // The first-harvest goal completes in the same action batch.
        assert!(events
            .iter()
            .any(|e| matches!(e, GameplayEvent::GoalCompleted { goal } if *goal == "first_harvest".into())));
        assert!(engine.state().chrono_energy > 0.0);
    }

    #[test]
    fn test_quest_progress_flows_through_event_stream() {
        let mut engine = demo_engine(1);
        engine.state.visitor = Some("elder".into());
        engine
            .apply(
                Action::AcceptQuest {
                    visitor: "elder".into(),
                    quest: "tomato_rush".into(),
                },
                ts(0),
            )
            .unwrap();

        for i in 0..3u64 {
            engine
                .apply(
                    Action::PlantCrop {
                        crop: "tomato".into(),
                        era: "Present".into(),
                    },
                    ts(i * 100),
                )
                .unwrap();
            let plant = engine.state().planted[0].id;
            engine
                .apply(Action::HarvestCrop { plant }, ts(i * 100).plus_secs(60))
                .unwrap();
        }

        assert!(engine
            .state()
            .completed_quests
            .contains(&QuestId::new("tomato_rush")));
    }

    #[test]
    fn test_same_seed_and_actions_are_deterministic() {
        let run = |seed: u64| {
            let mut engine = demo_engine(seed);
            engine
                .apply(Action::AddEnergy { amount: 100.0 }, ts(0))
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
            engine.check_visitor(ts(120));
            engine.state().digest().unwrap()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_from_state_rejects_unknown_era() {
        let catalog = demo_catalog();
        let mut state = GameState::new(&catalog, "Ada", "Garden").unwrap();
        state.current_era = "Atlantis".into();
        let err = Engine::from_state(catalog, state, seeded_rng(1)).unwrap_err();
        assert!(matches!(err, GameError::UnknownEra(_)));
    }
}
