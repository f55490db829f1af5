//! HTML table parsing and draw-history table selection

use crate::error::SourceError;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// A parsed HTML table: rows of trimmed cell texts
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    /// Rows in document order, each a list of cell texts
    pub rows: Vec<Vec<String>>,
    /// How many of `rows` consist only of `<th>` cells
    pub header_rows: usize,
}

impl Table {
    /// Number of rows, header rows included
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of rows that are not header rows
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(self.header_rows)
    }

    /// Textual form of the table
    ///
    /// Cells are joined by a single space and rows by a newline, so numbers from
    /// adjacent cells never run together.
    pub fn to_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.join(" "))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Strategy for picking the draw-history table out of a page
///
/// Source layouts change between releases, so the heuristic is pluggable and can
/// be swapped without touching extraction or weighting.
pub trait TableSelector: Send + Sync {
    /// Pick one table, or `None` if no table looks like draw history
    fn select<'a>(&self, tables: &'a [Table]) -> Option<&'a Table>;
}

/// Selects the first table that mentions a keyword and has enough data rows
///
/// Keywords are searched in every row, header rows included, but only data rows
/// count toward the row threshold. No column-name matching.
#[derive(Clone, Debug)]
pub struct KeywordTableSelector {
    keywords: Vec<String>,
    min_rows: usize,
}

impl KeywordTableSelector {
    /// Create a selector; a table must have strictly more than `min_rows` data rows
    pub fn new<I, S>(keywords: I, min_rows: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(Into::into)
                .filter(|k: &String| !k.trim().is_empty())
                .collect(),
            min_rows,
        }
    }

    /// Returns true if `table` passes both the keyword and the row-count test
    pub fn qualifies(&self, table: &Table) -> bool {
        if table.data_row_count() <= self.min_rows {
            return false;
        }
        let text = table.to_text();
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }
}

impl TableSelector for KeywordTableSelector {
    fn select<'a>(&self, tables: &'a [Table]) -> Option<&'a Table> {
        tables.iter().find(|table| self.qualifies(table))
    }
}

/// Parse every `<table>` on the page, in document order
///
/// Nested tables are reported separately; each table only collects rows whose
/// closest enclosing table is itself.
pub fn parse_tables(html: &str) -> Result<Vec<Table>, SourceError> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table").map_err(parse_err)?;
    let row_selector = Selector::parse("tr").map_err(parse_err)?;
    let cell_selector = Selector::parse("th, td").map_err(parse_err)?;

    let tables: Vec<Table> = document
        .select(&table_selector)
        .map(|table| {
            let mut header_rows = 0;
            let rows = table
                .select(&row_selector)
                .filter(|row| owning_table(row).map(|t| t.id()) == Some(table.id()))
                .map(|row| {
                    let cells: Vec<ElementRef<'_>> = row
                        .select(&cell_selector)
                        .filter(|cell| {
                            cell.parent().and_then(ElementRef::wrap).map(|r| r.id())
                                == Some(row.id())
                        })
                        .collect();
                    if !cells.is_empty() && cells.iter().all(|c| c.value().name() == "th") {
                        header_rows += 1;
                    }
                    cells.iter().map(text_content).collect::<Vec<_>>()
                })
                .collect();
            Table { rows, header_rows }
        })
        .collect();

    debug!(count = tables.len(), "Parsed HTML tables");
    Ok(tables)
}

/// Parse the page and pick the draw-history table with `selector`
///
/// # Errors
/// Returns [`SourceError::NoMatchingTable`] if the selector rejects every table.
pub fn extract_table(html: &str, selector: &dyn TableSelector) -> Result<Table, SourceError> {
    let tables = parse_tables(html)?;
    selector
        .select(&tables)
        .cloned()
        .ok_or(SourceError::NoMatchingTable)
}

fn owning_table<'a>(row: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table")
}

fn text_content(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_err(err: impl std::fmt::Display) -> SourceError {
    SourceError::Extraction(err.to_string())
}
