//! Canonical demo catalog and engine builders for tests.
//!
//! Compiled for this crate's own tests and, behind the `testkit`
//! feature, for downstream test crates via `garden_test_utils`.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::catalog::{
    AutomationDef, Catalog, CostCurve, CropDef, EraDef, GoalDef, PermanentUpgradeDef, QuestCondition,
    QuestDef, Reward, SynergyDef, UpgradeDef, VisitorDef,
};
use crate::engine::Engine;
use crate::growth::Timestamp;
use crate::ids::StatKey;
use crate::ledger::cost_map;
use crate::state::{STAT_AUTOMATIONS_BUILT, STAT_CROPS_HARVESTED, STAT_RARE_SEEDS};

/// Timestamp at `secs` whole seconds. Shorthand for test clocks.
#[must_use]
pub fn ts(secs: u64) -> Timestamp {
    Timestamp::from_secs(secs)
}

/// A seeded random source for deterministic tests.
#[must_use]
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// An engine over the demo catalog with a seeded random source.
#[must_use]
pub fn demo_engine(seed: u64) -> Engine<StdRng> {
    Engine::new(demo_catalog(), "Ada", "First Garden", seeded_rng(seed))
        .expect("demo catalog builds an initial state")
}

/// A small but complete catalog: three eras, four crops, one automation
/// template, upgrades, synergies, goals, and a visitor with two quests.
///
/// Numbers are chosen so the standard scenarios hold: tomatoes take 60
/// seconds and yield 3 Tomatoes + 1 Seeds, Prehistoric costs 100 energy,
/// and the garden starts with 10 Seeds and 50 Water.
#[must_use]
pub fn demo_catalog() -> Catalog {
    Catalog {
        eras: vec![
            EraDef {
                id: "Present".into(),
                name: "The Present".into(),
                unlock_cost: 0.0,
                crops: vec!["tomato".into(), "wheat".into()],
                resources: vec![
                    "Water".into(),
                    "Seeds".into(),
                    "Tomatoes".into(),
                    "Wheat".into(),
                ],
                special_mechanic: None,
                visitor_chance: 1.0,
                lore: Vec::new(),
            },
            EraDef {
                id: "Prehistoric".into(),
                name: "Primordial Valley".into(),
                unlock_cost: 100.0,
                crops: vec!["fern".into()],
                resources: vec!["Spores".into()],
                special_mechanic: Some("Volcanic ash enriches the soil".into()),
                visitor_chance: 0.5,
                lore: vec!["prehistoric_dawn".into()],
            },
            EraDef {
                id: "Future".into(),
                name: "Chrome Meadows".into(),
                unlock_cost: 2_500.0,
                crops: vec!["chrono_bloom".into()],
                resources: vec!["Flux".into()],
                special_mechanic: Some("Time flows in reverse at night".into()),
                visitor_chance: 0.25,
                lore: vec!["future_dawn".into()],
            },
        ],
        crops: vec![
            CropDef {
                id: "tomato".into(),
                name: "Tomato".into(),
                era: "Present".into(),
                growth_secs: 60.0,
                yields: cost_map([("Tomatoes", 3.0), ("Seeds", 1.0)]),
                requirements: cost_map([("Seeds", 1.0), ("Water", 5.0)]),
                unlock_cost: None,
                rare: false,
            },
            CropDef {
                id: "wheat".into(),
                name: "Wheat".into(),
                era: "Present".into(),
                growth_secs: 90.0,
                yields: cost_map([("Wheat", 2.0)]),
                requirements: cost_map([("Seeds", 1.0), ("Water", 3.0)]),
                unlock_cost: None,
                rare: false,
            },
            CropDef {
                id: "fern".into(),
                name: "Giant Fern".into(),
                era: "Prehistoric".into(),
                growth_secs: 120.0,
                yields: cost_map([("Spores", 4.0)]),
                requirements: cost_map([("Water", 10.0)]),
                unlock_cost: Some(cost_map([("Spores", 5.0)])),
                rare: false,
            },
            CropDef {
                id: "chrono_bloom".into(),
                name: "Chrono Bloom".into(),
                era: "Future".into(),
                growth_secs: 300.0,
                yields: cost_map([("Flux", 2.0)]),
                requirements: cost_map([("Water", 20.0)]),
                unlock_cost: None,
                rare: true,
            },
        ],
        automations: vec![AutomationDef {
            id: "sprinkler".into(),
            name: "Auto-Sprinkler".into(),
            description: "A rotating sprinkler head on a timer".into(),
            effect: "Waters nearby plots".into(),
            cost: cost_map([("Water", 20.0)]),
        }],
        upgrades: vec![UpgradeDef {
            id: "quick_growth".into(),
            name: "Quick Growth".into(),
            description: "Selective breeding for faster harvests".into(),
            max_level: 5,
            cost: CostCurve {
                base: cost_map([("Tomatoes", 10.0)]),
                growth_factor: 1.5,
            },
            effect_per_level: 0.05,
        }],
        permanent_upgrades: vec![PermanentUpgradeDef {
            id: "temporal_mastery".into(),
            name: "Temporal Mastery".into(),
            description: "Attune the garden to the flow of time".into(),
            max_level: 3,
            energy_base: 100.0,
            energy_growth: 2.0,
            seed_requirement: 1,
            effect_per_level: 0.1,
        }],
        synergies: vec![
            SynergyDef {
                id: "harvest_mastery".into(),
                name: "Harvest Mastery".into(),
                stat: StatKey::new(STAT_CROPS_HARVESTED),
                threshold: 10.0,
                effect_per_level: 0.05,
                max_levels: Some(10),
            },
            SynergyDef {
                id: "primordial_affinity".into(),
                name: "Primordial Affinity".into(),
                stat: StatKey::new("crops_harvested:Prehistoric"),
                threshold: 5.0,
                effect_per_level: 0.1,
                max_levels: None,
            },
        ],
        goals: vec![
            GoalDef {
                id: "first_harvest".into(),
                name: "First Harvest".into(),
                description: "Harvest your first crop".into(),
                stat: StatKey::new(STAT_CROPS_HARVESTED),
                target: 1.0,
                reward: Reward::Energy(25.0),
            },
            GoalDef {
                id: "green_thumb".into(),
                name: "Green Thumb".into(),
                description: "Harvest five crops".into(),
                stat: StatKey::new(STAT_CROPS_HARVESTED),
                target: 5.0,
                reward: Reward::RareSeed,
            },
            GoalDef {
                id: "seed_collector".into(),
                name: "Seed Collector".into(),
                description: "Own a rare seed".into(),
                stat: StatKey::new(STAT_RARE_SEEDS),
                target: 1.0,
                reward: Reward::Resource {
                    resource: "Water".into(),
                    amount: 20.0,
                },
            },
            GoalDef {
                id: "automation_fan".into(),
                name: "Automation Fan".into(),
                description: "Build an automation rule".into(),
                stat: StatKey::new(STAT_AUTOMATIONS_BUILT),
                target: 1.0,
                reward: Reward::Energy(10.0),
            },
        ],
        visitors: vec![VisitorDef {
            id: "elder".into(),
            name: "Elder Thistlewick".into(),
            greeting: "The soil remembers, young gardener.".into(),
            quests: vec![
                QuestDef {
                    id: "tomato_rush".into(),
                    name: "Tomato Rush".into(),
                    description: "Bring me three tomatoes, fresh ones!".into(),
                    condition: QuestCondition::HarvestCrops {
                        crop: Some("tomato".into()),
                        era: None,
                    },
                    target: 3.0,
                    duration_minutes: Some(30.0),
                    reward: Reward::Energy(50.0),
                },
                QuestDef {
                    id: "builder_bond".into(),
                    name: "Builder's Bond".into(),
                    description: "Show me two working contraptions.".into(),
                    condition: QuestCondition::BuildAutomations,
                    target: 2.0,
                    duration_minutes: None,
                    reward: Reward::RareSeed,
                },
            ],
            eras: Vec::new(),
        }],
        starting_resources: cost_map([("Seeds", 10.0), ("Water", 50.0)]),
    }
}
