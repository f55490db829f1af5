//! Core types for lotto-draw

use crate::error::{Error, RefreshFailure, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest selectable number
pub const MIN_NUMBER: u8 = 1;

/// Largest selectable number
pub const MAX_NUMBER: u8 = 49;

/// Count of selectable numbers
pub const DOMAIN_SIZE: usize = (MAX_NUMBER - MIN_NUMBER + 1) as usize;

/// Main numbers per draw
pub const MAIN_COUNT: usize = 6;

/// Total numbers per draw (main numbers plus the special number)
pub const DRAW_SIZE: usize = MAIN_COUNT + 1;

/// Returns true if `n` lies in the closed range [`MIN_NUMBER`, `MAX_NUMBER`]
pub fn in_domain(n: u32) -> bool {
    (MIN_NUMBER as u32..=MAX_NUMBER as u32).contains(&n)
}

/// Every selectable number in ascending order
pub fn domain() -> impl Iterator<Item = u8> + Clone {
    MIN_NUMBER..=MAX_NUMBER
}

/// Raw historical occurrences in extraction order
///
/// Duplicates are the signal: each occurrence raises that number's weight.
pub type HistoryNumbers = Vec<u8>;

/// One generated ticket
///
/// Six main numbers in ascending order plus one special number. All seven are
/// pairwise distinct and lie in the number domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Draw {
    main: [u8; MAIN_COUNT],
    special: u8,
}

impl Draw {
    /// Build a draw from seven numbers in collection order
    ///
    /// The first six become the main numbers (sorted), the seventh the special number.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDraw`] if a number is outside the domain or repeated.
    pub fn from_collected(collected: [u8; DRAW_SIZE]) -> Result<Self> {
        for (i, &n) in collected.iter().enumerate() {
            if !in_domain(n as u32) {
                return Err(Error::InvalidDraw(format!(
                    "number {} is outside {}-{}",
                    n, MIN_NUMBER, MAX_NUMBER
                )));
            }
            if collected[..i].contains(&n) {
                return Err(Error::InvalidDraw(format!("number {} appears twice", n)));
            }
        }

        Ok(Self::from_collected_unchecked(collected))
    }

    // callers guarantee seven distinct in-domain numbers
    pub(crate) fn from_collected_unchecked(collected: [u8; DRAW_SIZE]) -> Self {
        let mut main = [0u8; MAIN_COUNT];
        main.copy_from_slice(&collected[..MAIN_COUNT]);
        main.sort_unstable();

        Self {
            main,
            special: collected[MAIN_COUNT],
        }
    }

    /// Main numbers, ascending
    pub fn main(&self) -> &[u8; MAIN_COUNT] {
        &self.main
    }

    /// The special number
    pub fn special(&self) -> u8 {
        self.special
    }

    /// All seven numbers: main numbers first, special last
    pub fn numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.main.iter().copied().chain(std::iter::once(self.special))
    }
}

impl fmt::Display for Draw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, n) in self.main.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02}", n)?;
        }
        write!(f, " + {:02}", self.special)
    }
}

/// Which distribution the next draw is sampled from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingMode {
    /// Weights derived from live historical data
    Weighted,
    /// Default uniform weights (no data loaded yet)
    Uniform,
}

impl SamplingMode {
    /// Mode for a session with or without live data
    pub fn from_data_loaded(data_loaded: bool) -> Self {
        if data_loaded {
            SamplingMode::Weighted
        } else {
            SamplingMode::Uniform
        }
    }
}

impl fmt::Display for SamplingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingMode::Weighted => write!(f, "weighted by historical frequency"),
            SamplingMode::Uniform => write!(f, "uniform random"),
        }
    }
}

/// Outcome of one refresh attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchResult {
    /// A source produced a usable history
    Success {
        /// The source the history came from
        source: String,
        /// Extracted occurrences, in table order
        history: HistoryNumbers,
    },
    /// Every source was unusable; one diagnostic per attempted source
    Failure(RefreshFailure),
}

impl FetchResult {
    /// Returns true for [`FetchResult::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }

    /// Convert into a standard `Result`, mapping failure to [`Error::Refresh`]
    pub fn into_result(self) -> Result<(String, HistoryNumbers)> {
        match self {
            FetchResult::Success { source, history } => Ok((source, history)),
            FetchResult::Failure(failure) => Err(Error::Refresh(failure)),
        }
    }
}

impl fmt::Display for FetchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchResult::Success { source, history } => write!(
                f,
                "loaded {} historical numbers from {}",
                history.len(),
                source
            ),
            FetchResult::Failure(failure) => write!(f, "refresh failed:\n{}", failure),
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SourceDiagnostic, SourceError};

    #[test]
    fn domain_covers_one_to_forty_nine() {
        let values: Vec<u8> = domain().collect();
        assert_eq!(values.len(), DOMAIN_SIZE);
        assert_eq!(values.first(), Some(&1));
        assert_eq!(values.last(), Some(&49));
        assert!(!in_domain(0));
        assert!(!in_domain(50));
    }

    #[test]
    fn draw_sorts_main_and_keeps_seventh_as_special() {
        let draw = Draw::from_collected([42, 3, 17, 11, 38, 25, 7]).unwrap();
        assert_eq!(draw.main(), &[3, 11, 17, 25, 38, 42]);
        assert_eq!(draw.special(), 7);
        assert_eq!(draw.numbers().count(), DRAW_SIZE);
    }

    #[test]
    fn draw_displays_zero_padded() {
        let draw = Draw::from_collected([42, 3, 17, 11, 38, 25, 7]).unwrap();
        assert_eq!(draw.to_string(), "03 11 17 25 38 42 + 07");
    }

    #[test]
    fn draw_rejects_duplicates_and_out_of_domain() {
        assert!(Draw::from_collected([1, 2, 3, 4, 5, 6, 6]).is_err());
        assert!(Draw::from_collected([1, 2, 3, 4, 5, 6, 50]).is_err());
        assert!(Draw::from_collected([0, 2, 3, 4, 5, 6, 7]).is_err());
    }

    #[test]
    fn sampling_mode_follows_data_loaded() {
        assert_eq!(SamplingMode::from_data_loaded(true), SamplingMode::Weighted);
        assert_eq!(SamplingMode::from_data_loaded(false), SamplingMode::Uniform);
    }

    #[test]
    fn fetch_result_failure_converts_to_refresh_error() {
        let result = FetchResult::Failure(RefreshFailure {
            diagnostics: vec![SourceDiagnostic {
                source: "https://a.example/".to_string(),
                error: SourceError::NoMatchingTable,
            }],
        });
        assert!(!result.is_success());
        assert!(matches!(result.into_result(), Err(Error::Refresh(_))));
    }
}
