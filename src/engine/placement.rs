use super::Tier;
use serde::{Deserialize, Serialize};

/// Reach per dollar of booking fee.
///
/// A free act has no finite ratio; the source's divide-by-one fallback
/// understated true efficiency, so the zero-cost case is a tagged sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostEfficiency {
    Finite(f64),
    Unbounded,
}

/// The verdict for one act: recomputed on every evaluation, never persisted
/// by the engine itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementResult {
    /// 1-5, from combined primary and associated followers.
    pub marketing_strength: u8,
    /// 1-5, from streaming listeners.
    pub donation_strength: u8,
    /// Sum of the two, 2-10.
    pub total_strength: u8,
    pub tier: Tier,
    pub is_affordable: bool,
    /// Budget for the tier minus cost; positive means under budget.
    pub margin: f64,
    pub reach_per_dollar: CostEfficiency,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_result_shape() {
        let result = PlacementResult {
            marketing_strength: 3,
            donation_strength: 1,
            total_strength: 4,
            tier: Tier::IndirectSupport,
            is_affordable: true,
            margin: 7.0,
            reach_per_dollar: CostEfficiency::Finite(105.4),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["tier"], "Indirect Support");
        assert_eq!(json["is_affordable"], true);
        assert_eq!(json["reach_per_dollar"]["finite"], 105.4);
    }

    #[test]
    fn unbounded_efficiency_is_a_plain_tag() {
        let json = serde_json::to_value(CostEfficiency::Unbounded).unwrap();
        assert_eq!(json, "unbounded");
        let back: CostEfficiency = serde_json::from_value(json).unwrap();
        assert_eq!(back, CostEfficiency::Unbounded);
    }
}
