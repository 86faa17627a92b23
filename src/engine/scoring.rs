//! Strength scoring: bucketing a raw reach metric into a 1-5 score.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThresholdError {
    #[error("thresholds must be strictly increasing, got {0:?}")]
    NotIncreasing([u64; 4]),
}

/// Four ascending boundary values delimiting the five strength bands.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct StrengthThresholds([u64; 4]);

impl StrengthThresholds {
    pub fn new(bounds: [u64; 4]) -> Result<Self, ThresholdError> {
        if bounds.windows(2).all(|w| w[0] < w[1]) {
            Ok(Self(bounds))
        } else {
            Err(ThresholdError::NotIncreasing(bounds))
        }
    }

    pub fn bounds(&self) -> [u64; 4] {
        self.0
    }
}

impl<'de> Deserialize<'de> for StrengthThresholds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bounds = <[u64; 4]>::deserialize(deserializer)?;
        Self::new(bounds).map_err(serde::de::Error::custom)
    }
}

/// Map a raw metric to a 1-5 strength score.
///
/// Band policy, carried over exactly from the source scoring table: the
/// lower three bands exclude their upper bound, but band 4 *includes* b4.
/// So `value == b4` scores 4 and `value == b4 + 1` scores 5.
pub fn strength_of(value: u64, thresholds: &StrengthThresholds) -> u8 {
    let [b1, b2, b3, b4] = thresholds.0;
    if value < b1 {
        1
    } else if value < b2 {
        2
    } else if value < b3 {
        3
    } else if value <= b4 {
        4
    } else {
        5
    }
}
