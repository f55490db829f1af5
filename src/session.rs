//! Per-session draw state

use crate::types::SamplingMode;
use crate::weights::WeightMap;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// State owned by one user session
///
/// Starts with uniform weights and no live data. Only a successful refresh
/// replaces it, and always as a whole; draws only read it. Pass it explicitly to
/// [`DrawEngine`](crate::DrawEngine): one instance per session, never shared.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SessionState {
    weights: WeightMap,
    data_loaded: bool,
    last_source: Option<String>,
    last_refreshed: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Fresh session with uniform weights
    pub fn new() -> Self {
        Self::default()
    }

    /// Current weights
    pub fn weights(&self) -> &WeightMap {
        &self.weights
    }

    /// Returns true once a refresh has succeeded
    pub fn data_loaded(&self) -> bool {
        self.data_loaded
    }

    /// Source of the live data, if any
    pub fn last_source(&self) -> Option<&str> {
        self.last_source.as_deref()
    }

    /// When the live data was loaded, if ever
    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    /// Which distribution the next draw uses
    pub fn mode(&self) -> SamplingMode {
        SamplingMode::from_data_loaded(self.data_loaded)
    }

    /// The `n` heaviest numbers for a "hot numbers" display
    pub fn hot_numbers(&self, n: usize) -> Vec<(u8, u64)> {
        self.weights.top_n(n)
    }

    pub(crate) fn apply_refresh(&mut self, weights: WeightMap, source: String) {
        *self = Self {
            weights,
            data_loaded: true,
            last_source: Some(source),
            last_refreshed: Some(Utc::now()),
        };
    }
}
