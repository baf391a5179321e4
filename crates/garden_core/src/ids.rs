//! Identifier newtypes for catalog entries and state instances.
//!
//! Catalog content is keyed by human-readable string identifiers supplied
//! by the data files. Wrapping them in distinct newtypes keeps a crop id
//! from being passed where an era id is expected.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new identifier from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// View the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifier for an era in the catalog.
    EraId
);
string_id!(
    /// Identifier for a crop type in the catalog.
    CropId
);
string_id!(
    /// Identifier for a resource kind.
    ResourceId
);
string_id!(
    /// Identifier for an upgrade or permanent upgrade.
    UpgradeId
);
string_id!(
    /// Identifier for a synergy definition.
    SynergyId
);
string_id!(
    /// Identifier for a goal definition.
    GoalId
);
string_id!(
    /// Identifier for an NPC visitor.
    VisitorId
);
string_id!(
    /// Identifier for a visitor quest.
    QuestId
);
string_id!(
    /// Identifier for an automation rule. Catalog templates use the bare
    /// id; purchased instances are suffixed with `#<n>` so multiple copies
    /// of the same rule can coexist.
    AutomationId
);
string_id!(
    /// Identifier for a lore entry.
    LoreId
);
string_id!(
    /// Name of a tracked statistic that goals and synergies bind to.
    StatKey
);

/// Identifier for a planted crop instance.
///
/// Assigned from a monotonically increasing counter owned by the game
/// state, so every planting gets a fresh id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct PlantId(pub u64);

impl PlantId {
    /// Create a plant id from a raw counter value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PlantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AutomationId {
    /// Derive a unique instance id from this template id and a counter.
    #[must_use]
    pub fn instance(&self, seq: u64) -> Self {
        Self(format!("{}#{}", self.0, seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_distinct_by_type() {
        let crop = CropId::new("tomato");
        assert_eq!(crop.as_str(), "tomato");
        assert_eq!(crop.to_string(), "tomato");
        assert_eq!(CropId::from("tomato"), crop);
    }

    #[test]
    fn test_automation_instance_suffix() {
        let template = AutomationId::new("sprinkler");
        assert_eq!(template.instance(3).as_str(), "sprinkler#3");
        assert_ne!(template.instance(1), template.instance(2));
    }

    #[test]
    fn test_plant_id_ordering() {
        assert!(PlantId::new(1) < PlantId::new(2));
        assert_eq!(PlantId::new(7).to_string(), "7");
    }
}
