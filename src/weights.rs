//! Frequency-based weight model
//!
//! Converts raw historical occurrences into a sampling weight for every number in
//! the domain. Every number keeps a base weight of 1, so numbers that never appeared
//! in the history can still be drawn.

use crate::error::{Error, Result};
use crate::types::{DOMAIN_SIZE, MIN_NUMBER, domain, in_domain};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Weight added per historical occurrence
///
/// Controls how sharply frequent numbers dominate the distribution. A value of 2
/// means one extra occurrence outweighs a never-seen number twice over.
pub const AMPLIFICATION_FACTOR: u64 = 2;

/// Base weight every number starts with
pub const BASE_WEIGHT: u64 = 1;

/// Sampling weight for every number in the domain
///
/// Always covers the full domain with strictly positive weights. A map is built
/// once and replaced wholesale; there are no partial mutators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightMap {
    // index 0 holds the weight of MIN_NUMBER
    weights: [u64; DOMAIN_SIZE],
}

impl Default for WeightMap {
    fn default() -> Self {
        Self::uniform()
    }
}

impl WeightMap {
    /// Every number at the base weight
    pub fn uniform() -> Self {
        Self {
            weights: [BASE_WEIGHT; DOMAIN_SIZE],
        }
    }

    /// Uniform map with explicit weights for some numbers
    ///
    /// # Errors
    /// Returns [`Error::InvalidWeights`] if a number is outside the domain, a
    /// weight is zero, or the weights together overflow a `u64`.
    pub fn with_overrides<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u8, u64)>,
    {
        let mut map = Self::uniform();
        for (number, weight) in entries {
            if !in_domain(number as u32) {
                return Err(Error::InvalidWeights(format!(
                    "number {} is outside the domain",
                    number
                )));
            }
            if weight == 0 {
                return Err(Error::InvalidWeights(format!(
                    "number {} has zero weight",
                    number
                )));
            }
            map.weights[index(number)] = weight;
        }
        // the sampler sums every weight, so the total must fit
        if map
            .weights
            .iter()
            .try_fold(0u64, |acc, &w| acc.checked_add(w))
            .is_none()
        {
            return Err(Error::InvalidWeights(
                "total weight overflows u64".to_string(),
            ));
        }
        Ok(map)
    }

    /// Weight of `number`, or `None` outside the domain
    pub fn get(&self, number: u8) -> Option<u64> {
        in_domain(number as u32).then(|| self.weights[index(number)])
    }

    /// `(number, weight)` pairs in ascending number order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        domain().zip(self.weights.iter().copied())
    }

    /// Weights in ascending number order
    pub fn values(&self) -> &[u64] {
        &self.weights
    }

    /// Always [`DOMAIN_SIZE`]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Never true; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of all weights, saturating at `u64::MAX`
    pub fn total(&self) -> u64 {
        self.weights
            .iter()
            .fold(0u64, |acc, &w| acc.saturating_add(w))
    }

    /// Returns true if every number is at the base weight
    pub fn is_uniform(&self) -> bool {
        self.weights.iter().all(|&w| w == BASE_WEIGHT)
    }

    /// The `n` heaviest numbers, descending by weight
    ///
    /// Ties keep ascending number order.
    pub fn top_n(&self, n: usize) -> Vec<(u8, u64)> {
        let mut entries: Vec<(u8, u64)> = self.iter().collect();
        // stable sort keeps ascending number order among equal weights
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(n);
        entries
    }
}

// Serialized as a number -> weight map so UI layers can render it directly
impl Serialize for WeightMap {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (number, weight) in self.iter() {
            map.serialize_entry(&number, &weight)?;
        }
        map.end()
    }
}

fn index(number: u8) -> usize {
    (number - MIN_NUMBER) as usize
}

/// Build the weight map for a history
///
/// Each number gets `BASE_WEIGHT + occurrences * AMPLIFICATION_FACTOR`. Raw
/// occurrence counts are used, so a number repeated within one draw period counts
/// every time it appears. Out-of-domain values are ignored. An empty history
/// yields the uniform map.
pub fn calculate_weights(history: &[u8]) -> WeightMap {
    let mut map = WeightMap::uniform();
    for &number in history {
        if in_domain(number as u32) {
            let slot = &mut map.weights[index(number)];
            *slot = slot.saturating_add(AMPLIFICATION_FACTOR);
        }
    }
    map
}
