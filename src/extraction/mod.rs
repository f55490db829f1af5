//! Draw-history extraction from fetched pages
//!
//! A page goes through two steps:
//! 1. [`table`] parses every HTML table and picks the one that looks like draw history
//! 2. [`numbers`] pulls every domain number out of that table's text
//!
//! [`extract_page`] runs both and enforces the minimum sample size.

use crate::error::SourceError;
use crate::types::HistoryNumbers;
use tracing::debug;

/// Domain number extraction
pub mod numbers;
/// HTML table parsing and selection
pub mod table;

pub use numbers::{extract_history, extract_numbers};
pub use table::{KeywordTableSelector, Table, TableSelector, extract_table, parse_tables};

/// Turn a fetched page into a history sample
///
/// # Errors
/// - [`SourceError::NoMatchingTable`] if no table passes `selector`
/// - [`SourceError::InsufficientSample`] if the table yields fewer than `min_sample` numbers
pub fn extract_page(
    html: &str,
    selector: &dyn TableSelector,
    min_sample: usize,
) -> Result<HistoryNumbers, SourceError> {
    let table = extract_table(html, selector)?;
    debug!(
        rows = table.row_count(),
        data_rows = table.data_row_count(),
        "Selected draw-history table"
    );
    extract_history(&table.to_text(), min_sample)
}
