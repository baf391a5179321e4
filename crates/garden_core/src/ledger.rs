//! Economy ledger: per-resource balances with atomic multi-resource debits.
//!
//! Quantities are non-negative reals keyed by resource id. A debit that
//! would overdraw is rejected as a whole and leaves the ledger untouched;
//! multi-resource costs are checked in full before any entry is applied,
//! so a partially-affordable cost never debits some resources and not
//! others.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{GameError, Result};
use crate::ids::ResourceId;

/// A cost or yield: resource id mapped to a non-negative amount.
///
/// `BTreeMap` keeps iteration order deterministic.
pub type CostMap = BTreeMap<ResourceId, f64>;

/// Build a [`CostMap`] from `(id, amount)` pairs. Test and fixture helper.
#[must_use]
pub fn cost_map<I, S>(entries: I) -> CostMap
where
    I: IntoIterator<Item = (S, f64)>,
    S: Into<ResourceId>,
{
    entries
        .into_iter()
        .map(|(id, amount)| (id.into(), amount))
        .collect()
}

/// Per-resource balances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceLedger {
    amounts: BTreeMap<ResourceId, f64>,
}

impl ResourceLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance for a resource; absent resources are zero.
    #[must_use]
    pub fn amount(&self, resource: &ResourceId) -> f64 {
        self.amounts.get(resource).copied().unwrap_or(0.0)
    }

    /// Iterate over all non-zero balances in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&ResourceId, f64)> {
        self.amounts.iter().map(|(id, amount)| (id, *amount))
    }

    /// Whether the ledger holds no resources at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Increase a resource balance. `amount` must be non-negative.
    pub fn credit(&mut self, resource: &ResourceId, amount: f64) {
        debug_assert!(amount >= 0.0, "credit amount must be non-negative");
        if amount <= 0.0 {
            return;
        }
        *self.amounts.entry(resource.clone()).or_insert(0.0) += amount;
    }

    /// Decrease a resource balance, rejecting overdrafts.
    ///
    /// # Errors
    /// Returns [`GameError::InsufficientResources`] and leaves the ledger
    /// unchanged if the balance is below `amount`.
    pub fn debit(&mut self, resource: &ResourceId, amount: f64) -> Result<()> {
        debug_assert!(amount >= 0.0, "debit amount must be non-negative");
        let available = self.amount(resource);
        if available < amount {
            return Err(GameError::InsufficientResources {
                resource: resource.clone(),
                required: amount,
                available,
            });
        }
        if let Some(balance) = self.amounts.get_mut(resource) {
            *balance -= amount;
        }
        Ok(())
    }

    /// Whether every entry of `cost` is simultaneously affordable.
    #[must_use]
    pub fn can_afford(&self, cost: &CostMap) -> bool {
        cost.iter()
            .all(|(resource, &amount)| self.amount(resource) >= amount)
    }

    /// Apply a multi-resource debit atomically: either every entry is
    /// debited, or none are.
    ///
    /// # Errors
    /// Returns [`GameError::InsufficientResources`] for the first entry
    /// (in id order) that falls short, leaving the ledger unchanged.
    pub fn debit_all(&mut self, cost: &CostMap) -> Result<()> {
        for (resource, &amount) in cost {
            let available = self.amount(resource);
            if available < amount {
                return Err(GameError::InsufficientResources {
                    resource: resource.clone(),
                    required: amount,
                    available,
                });
            }
        }
        for (resource, &amount) in cost {
            if let Some(balance) = self.amounts.get_mut(resource) {
                *balance -= amount;
            }
        }
        Ok(())
    }

    /// Credit every entry of a yield map.
    pub fn credit_all(&mut self, yields: &CostMap) {
        for (resource, &amount) in yields {
            self.credit(resource, amount);
        }
    }

    /// Unconditional signed adjustment, clamped at a zero floor.
    ///
    /// This is the raw handler behind `UpdateResource`: the caller is
    /// expected to have validated affordability already. If the delta
    /// would overdraw anyway, the balance is clamped to zero and the
    /// shortfall logged.
    pub fn apply_delta(&mut self, resource: &ResourceId, delta: f64) -> f64 {
        let current = self.amount(resource);
        let next = current + delta;
        let clamped = if next < 0.0 {
            warn!(
                resource = %resource,
                current,
                delta,
                "resource delta overdrew balance, clamping to zero"
            );
            0.0
        } else {
            next
        };
        self.amounts.insert(resource.clone(), clamped);
        clamped
    }
}

impl FromIterator<(ResourceId, f64)> for ResourceLedger {
    fn from_iter<I: IntoIterator<Item = (ResourceId, f64)>>(iter: I) -> Self {
        let mut ledger = Self::new();
        for (resource, amount) in iter {
            ledger.credit(&resource, amount);
        }
        ledger
    }
}
