//! Weighted draw sampling with a starvation fallback
//!
//! A draw is collected in two phases:
//!
//! - **Weighted**: one weighted pick per attempt over the whole domain, with
//!   replacement. Repeats are discarded, new numbers are appended in collection
//!   order.
//! - **Fallback**: entered once the retry budget is spent with fewer than seven
//!   numbers collected (weight mass concentrated on a handful of numbers). Each
//!   step picks uniformly among the numbers not yet collected, so the phase ends
//!   after at most seven steps.
//!
//! The first six collected numbers become the sorted main numbers and the seventh
//! the special number.

use crate::types::{DRAW_SIZE, Draw, domain};
use crate::weights::WeightMap;
use rand::Rng;
use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

/// Default number of weighted attempts per draw
pub const DEFAULT_RETRY_BUDGET: u32 = 100;

/// Sampling phase of a single draw
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Weighted picks with replacement; `attempts` picks made so far
    Weighted {
        /// Weighted picks made so far
        attempts: u32,
    },
    /// Uniform picks among numbers not yet collected
    Fallback,
}

/// A draw together with how it was collected
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawReport {
    /// The generated draw
    pub draw: Draw,
    /// Weighted picks made, repeats included
    pub weighted_attempts: u32,
    /// Numbers filled in by the uniform fallback
    pub fallback_fills: usize,
}

impl DrawReport {
    /// Returns true if the retry budget ran out before seven numbers were collected
    pub fn starved(&self) -> bool {
        self.fallback_fills > 0
    }
}

/// Draws seven unique numbers from a weight map
#[derive(Clone, Copy, Debug)]
pub struct DrawSampler {
    retry_budget: u32,
}

impl Default for DrawSampler {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_BUDGET)
    }
}

impl DrawSampler {
    /// Create a sampler that makes at most `retry_budget` weighted picks per draw
    pub fn new(retry_budget: u32) -> Self {
        Self { retry_budget }
    }

    /// Weighted picks allowed before the fallback takes over
    pub fn retry_budget(&self) -> u32 {
        self.retry_budget
    }

    /// Draw with the given random source
    pub fn draw<R: Rng + ?Sized>(&self, weights: &WeightMap, rng: &mut R) -> Draw {
        self.draw_with_report(weights, rng).draw
    }

    /// Draw reproducibly from a seed
    pub fn draw_seeded(&self, weights: &WeightMap, seed: u64) -> Draw {
        let mut rng = StdRng::seed_from_u64(seed);
        self.draw(weights, &mut rng)
    }

    /// Draw and report how many weighted attempts and fallback fills it took
    pub fn draw_with_report<R: Rng + ?Sized>(&self, weights: &WeightMap, rng: &mut R) -> DrawReport {
        let dist = match WeightedIndex::<u64>::new(weights.values()) {
            Ok(dist) => Some(dist),
            Err(e) => {
                // unreachable while WeightMap keeps every weight positive
                warn!(error = %e, "Weight map unusable for weighted sampling, drawing uniformly");
                None
            }
        };
        let numbers: Vec<u8> = domain().collect();

        let mut collected: Vec<u8> = Vec::with_capacity(DRAW_SIZE);
        let mut weighted_attempts = 0;
        let mut fallback_fills = 0;
        let mut phase = match dist {
            Some(_) => Phase::Weighted { attempts: 0 },
            None => Phase::Fallback,
        };

        while collected.len() < DRAW_SIZE {
            phase = match (phase, dist.as_ref()) {
                (Phase::Weighted { attempts }, Some(dist)) if attempts < self.retry_budget => {
                    let pick = numbers[dist.sample(rng)];
                    if !collected.contains(&pick) {
                        collected.push(pick);
                    }
                    weighted_attempts = attempts + 1;
                    Phase::Weighted {
                        attempts: attempts + 1,
                    }
                }
                (Phase::Weighted { attempts }, _) => {
                    debug!(
                        attempts,
                        collected = collected.len(),
                        "Retry budget exhausted, filling remaining numbers uniformly"
                    );
                    Phase::Fallback
                }
                (Phase::Fallback, _) => {
                    let remaining: Vec<u8> = numbers
                        .iter()
                        .copied()
                        .filter(|n| !collected.contains(n))
                        .collect();
                    match remaining.choose(rng) {
                        Some(&pick) => {
                            collected.push(pick);
                            fallback_fills += 1;
                        }
                        // the domain is far larger than a draw, so this cannot happen
                        None => break,
                    }
                    Phase::Fallback
                }
            };
        }

        let mut ordered = [0u8; DRAW_SIZE];
        ordered.copy_from_slice(&collected[..DRAW_SIZE]);

        DrawReport {
            draw: Draw::from_collected_unchecked(ordered),
            weighted_attempts,
            fallback_fills,
        }
    }
}
