//! Booking tiers (bill potential) and the per-tier budget table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Booking-slot classification. The set is closed: classification never
/// produces anything outside these four.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Headliner,
    #[serde(rename = "Direct Support")]
    DirectSupport,
    #[serde(rename = "Indirect Support")]
    IndirectSupport,
    Opener,
}

impl Tier {
    pub const ALL: [Tier; 4] = [
        Tier::Headliner,
        Tier::DirectSupport,
        Tier::IndirectSupport,
        Tier::Opener,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tier::Headliner => "Headliner",
            Tier::DirectSupport => "Direct Support",
            Tier::IndirectSupport => "Indirect Support",
            Tier::Opener => "Opener",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tier {
    type Err = String;

    /// Accepts the display name in any case, with spaces, hyphens or
    /// underscores as separators ("Direct Support", "direct-support", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "headliner" => Ok(Tier::Headliner),
            "directsupport" => Ok(Tier::DirectSupport),
            "indirectsupport" => Ok(Tier::IndirectSupport),
            "opener" => Ok(Tier::Opener),
            _ => Err(format!("Unknown tier: {}", s)),
        }
    }
}

/// Classify a total strength score into a tier.
///
/// One canonical ladder over the [2,10] domain, locked by boundary tests.
/// (Some source variants used an equivalent >=8/>=6/>=3 formulation.)
pub fn tier_of(total_strength: u8) -> Tier {
    match total_strength {
        0..=2 => Tier::Opener,
        3..=5 => Tier::IndirectSupport,
        6..=7 => Tier::DirectSupport,
        _ => Tier::Headliner,
    }
}

/// Per-tier budget ceilings, operator-configured.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BudgetTable(HashMap<Tier, f64>);

impl BudgetTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, tier: Tier, ceiling: f64) {
        self.0.insert(tier, ceiling);
    }

    pub fn get(&self, tier: Tier) -> Option<f64> {
        self.0.get(&tier).copied()
    }

    /// The ceiling used for affordability. An unconfigured tier fails
    /// closed: its budget is 0 and the lookup is logged as a warning.
    pub fn budget_for(&self, tier: Tier) -> f64 {
        match self.get(tier) {
            Some(ceiling) => ceiling,
            None => {
                warn!("No budget configured for tier {}, treating as 0", tier);
                0.0
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tier, f64)> + '_ {
        self.0.iter().map(|(tier, ceiling)| (*tier, *ceiling))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Tier, f64)> for BudgetTable {
    fn from_iter<I: IntoIterator<Item = (Tier, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_partitions_the_domain() {
        assert_eq!(tier_of(2), Tier::Opener);
        assert_eq!(tier_of(3), Tier::IndirectSupport);
        assert_eq!(tier_of(5), Tier::IndirectSupport);
        assert_eq!(tier_of(6), Tier::DirectSupport);
        assert_eq!(tier_of(7), Tier::DirectSupport);
        assert_eq!(tier_of(8), Tier::Headliner);
        assert_eq!(tier_of(10), Tier::Headliner);
    }

    #[test]
    fn ladder_has_no_gaps() {
        // Every total in the reachable domain maps to exactly one tier.
        for total in 2..=10u8 {
            let tier = tier_of(total);
            assert!(Tier::ALL.contains(&tier));
        }
    }

    #[test]
    fn tier_parses_display_and_kebab_forms() {
        assert_eq!("Headliner".parse::<Tier>().unwrap(), Tier::Headliner);
        assert_eq!(
            "Direct Support".parse::<Tier>().unwrap(),
            Tier::DirectSupport
        );
        assert_eq!(
            "indirect-support".parse::<Tier>().unwrap(),
            Tier::IndirectSupport
        );
        assert_eq!("OPENER".parse::<Tier>().unwrap(), Tier::Opener);
        assert!("Stagehand".parse::<Tier>().is_err());
    }

    #[test]
    fn tier_serializes_with_spaces() {
        assert_eq!(
            serde_json::to_string(&Tier::DirectSupport).unwrap(),
            "\"Direct Support\""
        );
        assert_eq!(
            serde_json::from_str::<Tier>("\"Indirect Support\"").unwrap(),
            Tier::IndirectSupport
        );
    }

    #[test]
    fn budget_table_round_trips_as_json_map() {
        let table: BudgetTable = [(Tier::Headliner, 600.0), (Tier::Opener, 0.0)]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["Headliner"], 600.0);
        let back: BudgetTable = serde_json::from_value(json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn missing_tier_budget_is_zero() {
        let table = BudgetTable::new();
        assert_eq!(table.get(Tier::Opener), None);
        assert_eq!(table.budget_for(Tier::Opener), 0.0);
    }
}
