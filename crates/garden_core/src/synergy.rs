//! Synergy bonuses: passive effects derived from cumulative statistics.
//!
//! Synergies are never purchased. Their level is a pure function of the
//! current stats, recomputed on read, so there is no apply step and no
//! hidden state to advance.

use std::collections::BTreeMap;

use crate::catalog::{Catalog, SynergyDef};
use crate::ids::SynergyId;
use crate::state::GameState;

/// Effect level of a synergy: `floor(stat / threshold)`, capped at the
/// definition's `max_levels` if set.
#[must_use]
pub fn level(def: &SynergyDef, state: &GameState) -> u32 {
    if def.threshold <= 0.0 {
        return 0;
    }
    let raw = (state.stat_value(&def.stat) / def.threshold).floor();
    let raw = if raw.is_finite() && raw > 0.0 {
        raw.min(f64::from(u32::MAX)) as u32
    } else {
        0
    };
    match def.max_levels {
        Some(cap) => raw.min(cap),
        None => raw,
    }
}

/// Effect magnitude of a synergy: `level * effect_per_level`.
#[must_use]
pub fn magnitude(def: &SynergyDef, state: &GameState) -> f64 {
    f64::from(level(def, state)) * def.effect_per_level
}

/// Snapshot of every synergy's current level.
#[must_use]
pub fn levels(catalog: &Catalog, state: &GameState) -> BTreeMap<SynergyId, u32> {
    catalog
        .synergies
        .iter()
        .map(|def| (def.id.clone(), level(def, state)))
        .collect()
}
