//! Scenario loading and configuration.
//!
//! Scenarios script a run against the engine: a seed, display names, and
//! a timestamped action sequence, plus an optional visitor-check cadence.
//! They are stored as RON files next to the catalog they exercise.

use std::path::Path;

use garden_core::engine::Action;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
}

/// A single scripted step: an action at an offset from the run start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Milliseconds after the run's start time.
    pub at_ms: u64,
    /// Action to apply.
    pub action: Action,
}

/// A complete scripted run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Seed for the engine's random source.
    pub seed: u64,
    /// Player display name.
    pub player_name: String,
    /// Garden display name.
    pub garden_name: String,
    /// Epoch offset of the run's start, in milliseconds.
    #[serde(default)]
    pub start_ms: u64,
    /// Fire a visitor-spawn check every this many seconds, if set.
    #[serde(default)]
    pub visitor_check_secs: Option<u64>,
    /// Scripted actions, applied in `at_ms` order.
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Load a scenario from a RON file.
    ///
    /// # Errors
    /// Returns a [`ScenarioError`] if the file is missing, unreadable, or
    /// malformed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string (useful for embedded scenarios).
    ///
    /// # Errors
    /// Returns a [`ScenarioError`] if the string is malformed.
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = ron::from_str(ron)?;
        Ok(scenario)
    }

    /// A built-in smoke scenario: plant a tomato, harvest it after it
    /// matures, bank the goal reward.
    #[must_use]
    pub fn first_harvest() -> Self {
        Self {
            name: "first_harvest".to_string(),
            description: "Plant a tomato and harvest it once mature".to_string(),
            seed: 7,
            player_name: "Ada".to_string(),
            garden_name: "First Garden".to_string(),
            start_ms: 0,
            visitor_check_secs: Some(30),
            steps: vec![
                Step {
                    at_ms: 0,
                    action: Action::PlantCrop {
                        crop: "tomato".into(),
                        era: "Present".into(),
                    },
                },
                Step {
                    at_ms: 60_000,
                    action: Action::HarvestCrop {
                        plant: garden_core::ids::PlantId::new(1),
                    },
                },
            ],
        }
    }
}
