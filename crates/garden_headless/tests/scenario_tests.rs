//! End-to-end tests: catalog files, scripted scenarios, save round-trips,
//! and the adapter layer against the in-memory collaborators.

use std::path::PathBuf;

use garden_adapters::leaderboard::{self, InMemoryLeaderboard};
use garden_adapters::market::{list_item, InMemoryMarket, MarketBoard};
use garden_core::engine::Engine;
use garden_core::events::{GameplayEvent, MarketItem};
use garden_core::growth::Timestamp;
use garden_core::snapshot::SaveFile;
use garden_headless::catalog_loader::load_catalog;
use garden_headless::runner::run_scenario;
use garden_headless::scenario::Scenario;
use garden_test_utils::fixtures::seeded_rng;

fn data_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join(relative)
}

#[test]
fn shipped_catalog_loads_and_validates() {
    let catalog = load_catalog(data_path("catalog.ron")).unwrap();
    assert_eq!(catalog.eras.len(), 3);
    assert_eq!(catalog.starting_era().unwrap().id, "Present".into());
    assert_eq!(catalog.prestige_gate_era().unwrap().id, "Future".into());
    assert!(catalog.rare_crops().count() > 0);
}

#[test]
fn shipped_scenario_runs_against_shipped_catalog() {
    let catalog = load_catalog(data_path("catalog.ron")).unwrap();
    let scenario = Scenario::load(data_path("scenarios/first_harvest.ron")).unwrap();

    let report = run_scenario(catalog, &scenario).unwrap();

    // The early harvest is the only rejection.
    assert_eq!(report.steps_applied, 4);
    assert_eq!(report.rejections.len(), 1);
    assert!(report.rejections[0].error.contains("not mature"));

    // The harvest lands its yield and completes the first-harvest goal.
    assert!(report
        .events
        .iter()
        .any(|e| matches!(e, GameplayEvent::CropHarvested { .. })));
    assert!(report
        .events
        .iter()
        .any(|e| matches!(e, GameplayEvent::GoalCompleted { goal } if *goal == "first_harvest".into())));

    // 25 energy goal reward + 100 scripted - 100 era unlock.
    assert_eq!(report.final_state.chrono_energy, 25.0);
    assert!(report
        .final_state
        .unlocked_eras
        .contains(&"Prehistoric".into()));
    // Era unlock reveals the era's lore entry.
    assert!(report
        .final_state
        .unlocked_lore
        .contains(&"prehistoric_dawn".into()));
}

#[test]
fn save_round_trip_resumes_play() {
    let catalog = load_catalog(data_path("catalog.ron")).unwrap();
    let scenario = Scenario::first_harvest();
    let report = run_scenario(catalog.clone(), &scenario).unwrap();

    // Export to disk and re-import through the validating path.
    let dir = tempfile::tempdir().unwrap();
    let save_path = dir.path().join("garden.json");
    let json = SaveFile::new(&report.final_state).to_json().unwrap();
    std::fs::write(&save_path, &json).unwrap();

    let loaded = std::fs::read_to_string(&save_path).unwrap();
    let restored = SaveFile::from_json(&loaded, &catalog).unwrap();
    assert_eq!(restored, report.final_state);

    // The restored snapshot keeps playing: plant another tomato.
    let mut engine = Engine::from_state(catalog, restored, seeded_rng(11)).unwrap();
    let now = Timestamp::from_millis(120_000);
    engine
        .apply(
            garden_core::engine::Action::PlantCrop {
                crop: "tomato".into(),
                era: "Present".into(),
            },
            now,
        )
        .unwrap();
    assert_eq!(engine.state().planted.len(), 1);
}

#[test]
fn corrupted_save_is_rejected_with_a_field_error() {
    let catalog = load_catalog(data_path("catalog.ron")).unwrap();
    let report = run_scenario(catalog.clone(), &Scenario::first_harvest()).unwrap();

    let json = SaveFile::new(&report.final_state).to_json().unwrap();
    let broken = json.replace("\"current_era\": \"Present\"", "\"current_era\": \"Nowhere\"");

    let err = SaveFile::from_json(&broken, &catalog).unwrap_err();
    assert!(err.to_string().contains("current_era"));
}

#[test]
fn lifetime_totals_flow_to_the_leaderboard() {
    let catalog = load_catalog(data_path("catalog.ron")).unwrap();
    let report = run_scenario(catalog, &Scenario::first_harvest()).unwrap();

    let mut store = InMemoryLeaderboard::new();
    leaderboard::publish(&mut store, &report.final_state).unwrap();

    let standings = leaderboard::standings(&store).unwrap();
    assert_eq!(standings.len(), 1);
    assert_eq!(standings[0].player, "Ada");
    assert_eq!(standings[0].total_crops_harvested, 1);
}

#[test]
fn market_listing_flows_through_engine_and_board() {
    let catalog = load_catalog(data_path("catalog.ron")).unwrap();
    let mut engine = Engine::new(catalog, "Ada", "First Garden", seeded_rng(5)).unwrap();
    let mut board = InMemoryMarket::new();

    let listing = list_item(
        &mut engine,
        &mut board,
        MarketItem::Resource("Water".into()),
        15.0,
        3.5,
        Timestamp::from_secs(10),
    )
    .unwrap();

    assert_eq!(listing.quantity, 15.0);
    assert_eq!(engine.state().ledger.amount(&"Water".into()), 35.0);
    assert_eq!(board.open_listings().unwrap().len(), 1);
}
