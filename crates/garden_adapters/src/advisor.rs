//! Advisor adapter: formats garden state into the free-text payload the
//! advisory collaborator consumes and relays its suggestion back.

use garden_core::catalog::Catalog;
use garden_core::growth::Timestamp;
use garden_core::ids::EraId;
use garden_core::state::GameState;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AdapterError;

/// Request payload for the advisory collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorRequest {
    /// Free-text description of crop health.
    pub crop_health: String,
    /// Free-text description of the automation setup.
    pub automation_config: String,
    /// Current era id.
    pub era: EraId,
}

/// Response payload from the advisory collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorResponse {
    /// Free-text suggestion for the player.
    pub suggestion: String,
}

/// The advisory collaborator's interface.
pub trait AdvisorClient {
    /// Request a suggestion for the described garden.
    ///
    /// # Errors
    /// Returns [`AdapterError::Advisor`] with a displayable message on
    /// failure.
    fn advise(&self, request: &AdvisorRequest) -> Result<AdvisorResponse, AdapterError>;
}

/// Format the current state into an advisory request.
///
/// Pure formatting over the snapshot: maturity percentages for each
/// planted crop and the list of installed automation rules.
#[must_use]
pub fn build_request(catalog: &Catalog, state: &GameState, now: Timestamp) -> AdvisorRequest {
    let crop_health = if state.planted.is_empty() {
        "no crops planted".to_string()
    } else {
        let plots: Vec<String> = state
            .planted
            .iter()
            .map(|planted| {
                let percent = catalog
                    .crop(&planted.crop)
                    .map_or(0.0, |def| planted.maturity(def.growth_secs, now) * 100.0);
                format!("{} {percent:.0}% grown", planted.crop)
            })
            .collect();
        format!("{} plots: {}", state.planted.len(), plots.join(", "))
    };

    let automation_config = if state.automations.is_empty() {
        "no automation installed".to_string()
    } else {
        let names: Vec<&str> = state.automations.iter().map(|a| a.name.as_str()).collect();
        format!("{} rules: {}", state.automations.len(), names.join(", "))
    };

    AdvisorRequest {
        crop_health,
        automation_config,
        era: state.current_era.clone(),
    }
}

/// Build a request from the current state, ask the collaborator, and
/// return its suggestion. Failures are logged and surfaced as a
/// displayable error; game state is never touched.
///
/// # Errors
/// Returns [`AdapterError::Advisor`] if the collaborator call fails.
pub fn request_suggestion(
    client: &impl AdvisorClient,
    catalog: &Catalog,
    state: &GameState,
    now: Timestamp,
) -> Result<String, AdapterError> {
    let request = build_request(catalog, state, now);
    match client.advise(&request) {
        Ok(response) => Ok(response.suggestion),
        Err(err) => {
            warn!(%err, "advisor request failed");
            Err(err)
        }
    }
}
