//! Number extraction from table text

use crate::error::SourceError;
use crate::types::{HistoryNumbers, in_domain};
use regex::Regex;
use std::sync::LazyLock;

/// A whole token in 10–49 or 1–9
///
/// Word boundaries keep digit runs such as years or period numbers from
/// contributing fragments.
static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[1-4][0-9]|[1-9])\b").unwrap_or_else(|e| panic!("invalid pattern: {e}"))
});

/// Every domain number in `text`, in order of appearance
///
/// Zero-padded single digits such as `05` form one two-digit run outside 10–49
/// and are not extracted. A source that pads 1–9 this way contributes no weight
/// to those numbers, so they stay at the base weight.
pub fn extract_numbers(text: &str) -> HistoryNumbers {
    NUMBER_PATTERN
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .filter(|&n| in_domain(n))
        .map(|n| n as u8)
        .collect()
}

/// Extract numbers and reject samples too small to weight
///
/// # Errors
/// Returns [`SourceError::InsufficientSample`] if fewer than `min_sample`
/// numbers are found.
pub fn extract_history(text: &str, min_sample: usize) -> Result<HistoryNumbers, SourceError> {
    let numbers = extract_numbers(text);
    if numbers.len() < min_sample {
        return Err(SourceError::InsufficientSample {
            found: numbers.len(),
            required: min_sample,
        });
    }
    Ok(numbers)
}
