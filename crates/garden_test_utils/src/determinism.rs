//! Determinism harness.
//!
//! The engine promises that the same catalog, seed, and action sequence
//! always produce the same state. These helpers make that promise cheap
//! to assert from any test crate.

use garden_core::engine::{Action, Engine};
use garden_core::error::Result;
use garden_core::fixtures::{demo_catalog, seeded_rng};
use garden_core::growth::Timestamp;
use rand::rngs::StdRng;

/// Build an engine over the demo catalog and apply a scripted sequence,
/// ignoring rejections (a rejection is part of the deterministic record
/// too - it must repeat identically across runs).
///
/// # Errors
/// Returns an error only if the demo catalog fails to build a state.
pub fn run_script(seed: u64, script: &[(Timestamp, Action)]) -> Result<Engine<StdRng>> {
    let mut engine = Engine::new(demo_catalog(), "Ada", "First Garden", seeded_rng(seed))?;
    for (at, action) in script {
        let _ = engine.apply(action.clone(), *at);
    }
    Ok(engine)
}

/// Run a script twice with the same seed and assert the final states
/// match digest-for-digest.
///
/// # Panics
/// Panics if the two runs diverge, with both digests in the message.
pub fn assert_deterministic(seed: u64, script: &[(Timestamp, Action)]) {
    let first = run_script(seed, script)
        .and_then(|engine| engine.state().digest())
        .expect("first run completes");
    let second = run_script(seed, script)
        .and_then(|engine| engine.state().digest())
        .expect("second run completes");
    assert_eq!(
        first, second,
        "runs diverged: first digest {first}, second digest {second}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use garden_core::fixtures::ts;

    #[test]
    fn test_scripted_runs_reproduce() {
        let script = vec![
            (ts(0), Action::AddEnergy { amount: 100.0 }),
            (
                ts(1),
                Action::PlantCrop {
                    crop: "tomato".into(),
                    era: "Present".into(),
                },
            ),
            // A rejection is part of the script: harvesting too early.
            (
                ts(2),
                Action::HarvestCrop {
                    plant: garden_core::ids::PlantId::new(1),
                },
            ),
            (
                ts(1).plus_secs(60),
                Action::HarvestCrop {
                    plant: garden_core::ids::PlantId::new(1),
                },
            ),
            (ts(90), Action::VisitorCheck),
        ];
        assert_deterministic(7, &script);
    }
}
