//! Scenario runner: drives the engine with a scripted clock.
//!
//! The runner is the "external world" the engine is specified against:
//! it owns the timeline, delivers actions in order, and fires periodic
//! visitor checks at the scenario's cadence. Rejections are collected
//! into the report rather than aborting - a rejected action is a valid
//! outcome of a run, not a runner failure.

use garden_core::engine::Engine;
use garden_core::error::GameError;
use garden_core::events::GameplayEvent;
use garden_core::growth::{Timestamp, MILLIS_PER_SECOND};
use garden_core::prelude::{Action, Catalog, GameState};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::scenario::Scenario;

/// Errors that abort a scenario run outright.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The engine could not be constructed.
    #[error("failed to start the engine: {0}")]
    Engine(#[from] GameError),
}

/// A rejected step, preserved for the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    /// Offset of the step from the run start, in milliseconds.
    pub at_ms: u64,
    /// The action that was rejected.
    pub action: Action,
    /// The engine's displayable rejection message.
    pub error: String,
}

/// The outcome of a scenario run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Scenario name.
    pub scenario: String,
    /// Steps that applied successfully.
    pub steps_applied: usize,
    /// Steps the engine rejected.
    pub rejections: Vec<Rejection>,
    /// Every event the run produced, in order.
    pub events: Vec<GameplayEvent>,
    /// Digest of the final state, for determinism checks across runs.
    pub final_digest: u64,
    /// The final state snapshot.
    pub final_state: GameState,
}

/// Run a scenario against a catalog.
///
/// Steps are applied in `at_ms` order; when the scenario sets a
/// visitor-check cadence, checks fire at every multiple of it that falls
/// before the step being applied.
///
/// # Errors
/// Returns [`RunnerError`] only if the engine cannot be built; rejected
/// steps land in the report.
pub fn run_scenario(catalog: Catalog, scenario: &Scenario) -> Result<RunReport, RunnerError> {
    info!(name = %scenario.name, seed = scenario.seed, "starting scenario");
    let rng = StdRng::seed_from_u64(scenario.seed);
    let mut engine = Engine::new(
        catalog,
        scenario.player_name.clone(),
        scenario.garden_name.clone(),
        rng,
    )?;

    let mut steps: Vec<_> = scenario.steps.iter().collect();
    steps.sort_by_key(|step| step.at_ms);

    let check_interval_ms = scenario
        .visitor_check_secs
        .map(|secs| secs * MILLIS_PER_SECOND);
    let mut next_check_ms = check_interval_ms;

    let mut events = Vec::new();
    let mut rejections = Vec::new();
    let mut steps_applied = 0;

    for step in steps {
        // Fire every pending visitor check that precedes this step.
        while let (Some(interval), Some(check_at)) = (check_interval_ms, next_check_ms) {
            if check_at > step.at_ms {
                break;
            }
            let now = Timestamp::from_millis(scenario.start_ms + check_at);
            events.extend(engine.check_visitor(now));
            next_check_ms = Some(check_at + interval);
        }

        let now = Timestamp::from_millis(scenario.start_ms + step.at_ms);
        match engine.apply(step.action.clone(), now) {
            Ok(step_events) => {
                steps_applied += 1;
                events.extend(step_events);
            }
            Err(err) => {
                debug!(at_ms = step.at_ms, %err, "step rejected");
                rejections.push(Rejection {
                    at_ms: step.at_ms,
                    action: step.action.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    let final_digest = engine.state().digest()?;
    info!(
        name = %scenario.name,
        steps_applied,
        rejected = rejections.len(),
        events = events.len(),
        "scenario finished"
    );
    Ok(RunReport {
        scenario: scenario.name.clone(),
        steps_applied,
        rejections,
        events,
        final_digest,
        final_state: engine.state().clone(),
    })
}
