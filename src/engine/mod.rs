//! Scoring and affordability decision engine.
//!
//! Everything in here is pure computation: canonical artist metrics plus a
//! budget table go in, a placement verdict comes out. No I/O, no mutation of
//! inputs, no shared state between evaluations.

mod metrics;
mod placement;
mod scoring;
mod tier;

pub use metrics::ArtistMetrics;
pub use placement::{CostEfficiency, PlacementResult};
pub use scoring::{strength_of, StrengthThresholds, ThresholdError};
pub use tier::{tier_of, BudgetTable, Tier};

use serde::{Deserialize, Serialize};

/// The configured engine: two independent strength threshold sets.
///
/// `Default` carries the canonical sets used by the production scoring sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AffordabilityEngine {
    pub marketing: StrengthThresholds,
    pub donation: StrengthThresholds,
}

impl Default for AffordabilityEngine {
    fn default() -> Self {
        Self {
            marketing: StrengthThresholds::new([3000, 7000, 11000, 20000])
                .expect("default marketing thresholds are strictly increasing"),
            donation: StrengthThresholds::new([4900, 6000, 15000, 25000])
                .expect("default donation thresholds are strictly increasing"),
        }
    }
}

impl AffordabilityEngine {
    pub fn new(marketing: StrengthThresholds, donation: StrengthThresholds) -> Self {
        Self {
            marketing,
            donation,
        }
    }

    /// Score one act against the budget table.
    ///
    /// Total over all well-formed `ArtistMetrics`; a tier missing from the
    /// table is treated as budget 0 (fail closed) and logged as a warning.
    pub fn evaluate(&self, metrics: &ArtistMetrics, budgets: &BudgetTable) -> PlacementResult {
        let reach = metrics.primary_followers + metrics.associated_followers;
        let marketing_strength = strength_of(reach, &self.marketing);
        let donation_strength = strength_of(metrics.streaming_listeners, &self.donation);
        let total_strength = marketing_strength + donation_strength;
        let tier = tier_of(total_strength);

        let budget = budgets.budget_for(tier);
        let margin = budget - metrics.cost;
        // Equality at the boundary counts as affordable.
        let is_affordable = metrics.cost <= budget;

        let reach_per_dollar = if metrics.cost > 0.0 {
            CostEfficiency::Finite(reach as f64 / metrics.cost)
        } else {
            CostEfficiency::Unbounded
        };

        PlacementResult {
            marketing_strength,
            donation_strength,
            total_strength,
            tier,
            is_affordable,
            margin,
            reach_per_dollar,
        }
    }
}
