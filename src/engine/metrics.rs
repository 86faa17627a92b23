use serde::{Deserialize, Serialize};

/// Canonical per-act metrics, immutable once constructed.
///
/// All numeric fields are non-negative. The normalizer is responsible for
/// coercing raw source values into this shape; the engine assumes it.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ArtistMetrics {
    /// Non-empty act identifier, the lookup key in the source table.
    pub name: String,
    /// Proposed or average booking fee, in dollars.
    pub cost: f64,
    /// Direct social followers.
    pub primary_followers: u64,
    /// Followers reachable via associated or affiliated accounts.
    pub associated_followers: u64,
    /// Monthly streaming listeners, used as a donation proxy.
    pub streaming_listeners: u64,
}

impl ArtistMetrics {
    pub fn new(
        name: impl Into<String>,
        cost: f64,
        primary_followers: u64,
        associated_followers: u64,
        streaming_listeners: u64,
    ) -> Self {
        Self {
            name: name.into(),
            cost,
            primary_followers,
            associated_followers,
            streaming_listeners,
        }
    }
}
