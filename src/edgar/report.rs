//! Report page scraping: one HTML table into a text grid

use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};

use crate::edgar::client::Fetch;
use crate::errors::EdgarError;
use crate::models::ReportTable;

/// Picks the table to export from a parsed report page.
pub trait TableSelector {
    fn select<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>>;
}

/// Selects the first element in document order matching a CSS selector
#[derive(Debug, Clone)]
pub struct CssTableSelector {
    selector: Selector,
}

impl CssTableSelector {
    pub fn new(css: &str) -> Result<Self, EdgarError> {
        let selector = Selector::parse(css).map_err(|_| EdgarError::Selector(css.to_string()))?;
        Ok(Self { selector })
    }

    /// The first `<table>` on the page
    pub fn first_table() -> Result<Self, EdgarError> {
        Self::new("table")
    }
}

impl TableSelector for CssTableSelector {
    fn select<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document.select(&self.selector).next()
    }
}

/// Row and cell selectors used to walk the chosen table
pub struct GridSelectors {
    row: Selector,
    cell: Selector,
}

impl GridSelectors {
    pub fn new() -> Result<Self, EdgarError> {
        let row = Selector::parse("tr").map_err(|_| EdgarError::Selector("tr".to_string()))?;
        let cell = Selector::parse("td, th")
            .map_err(|_| EdgarError::Selector("td, th".to_string()))?;
        Ok(Self { row, cell })
    }
}

/// Text of a cell: fragments trimmed of ASCII whitespace and joined, with
/// non-breaking spaces turned into plain spaces.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .map(|fragment| fragment.trim_matches(|c: char| c.is_ascii_whitespace()))
        .filter(|fragment| !fragment.is_empty())
        .collect::<String>()
        .replace('\u{a0}', " ")
}

fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// Extract the selected table of `html`, or `None` when the page has no table.
pub fn extract_table(
    html: &str,
    tables: &dyn TableSelector,
    grid: &GridSelectors,
) -> Option<ReportTable> {
    let document = Html::parse_document(html);
    let table = tables.select(&document)?;

    let rows = table
        .select(&grid.row)
        .map(|row| row.select(&grid.cell).map(cell_text).collect::<Vec<_>>())
        .filter(|row| !is_blank_row(row))
        .collect();

    Some(ReportTable::new(rows))
}

/// Download one report page and scrape its table.
///
/// A page without a table yields an empty grid so the caller can skip it.
pub async fn fetch_report_table(
    fetcher: &dyn Fetch,
    url: &str,
    tables: &dyn TableSelector,
    grid: &GridSelectors,
) -> Result<ReportTable, EdgarError> {
    info!("Downloading report: {}", url);
    let body = fetcher.get_text(url).await?;

    match extract_table(&body, tables, grid) {
        Some(table) => Ok(table),
        None => {
            warn!("No table found in the report: {}", url);
            Ok(ReportTable::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Option<ReportTable> {
        let tables = CssTableSelector::first_table().unwrap();
        let grid = GridSelectors::new().unwrap();
        extract_table(html, &tables, &grid)
    }

    #[test]
    fn test_extracts_first_table_only() {
        let html = r#"<html><body>
            <table class="report">
              <tr><th>Balance Sheets - USD ($) $ in Millions</th><th>Sep. 30, 2023</th></tr>
              <tr><td>Cash and cash equivalents</td><td>$ 29,965</td></tr>
            </table>
            <table><tr><td>Footnote table</td></tr></table>
        </body></html>"#;
        let table = extract(html).unwrap();
        assert_eq!(
            table.rows,
            vec![
                vec!["Balance Sheets - USD ($) $ in Millions", "Sep. 30, 2023"],
                vec!["Cash and cash equivalents", "$ 29,965"],
            ]
        );
    }

    #[test]
    fn test_non_breaking_space_becomes_space() {
        let html = "<table><tr><td>\u{a0}1,234</td><td>  x\n</td></tr></table>";
        let table = extract(html).unwrap();
        assert_eq!(table.rows, vec![vec![" 1,234", "x"]]);
    }

    #[test]
    fn test_drops_empty_rows_and_keeps_ragged_rows() {
        let html = "<table>\
            <tr><th>Item</th><th>2023</th><th>2022</th></tr>\
            <tr><td> </td><td></td></tr>\
            <tr></tr>\
            <tr><td>Net sales</td><td>383,285</td></tr>\
            </table>";
        let table = extract(html).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.rows[1], vec!["Net sales", "383,285"]);
    }

    #[test]
    fn test_cell_fragments_are_joined() {
        let html = "<table><tr><td><a href=\"#\">Revenue</a>\n  <sup>[1]</sup></td></tr></table>";
        let table = extract(html).unwrap();
        assert_eq!(table.rows, vec![vec!["Revenue[1]"]]);
    }

    #[test]
    fn test_no_table_returns_none() {
        assert!(extract("<html><body><p>Nothing here</p></body></html>").is_none());
    }

    #[test]
    fn test_custom_selector() {
        let html = "<table><tr><td>first</td></tr></table>\
                    <table class=\"report\"><tr><td>second</td></tr></table>";
        let tables = CssTableSelector::new("table.report").unwrap();
        let grid = GridSelectors::new().unwrap();
        let table = extract_table(html, &tables, &grid).unwrap();
        assert_eq!(table.rows, vec![vec!["second"]]);
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let err = CssTableSelector::new("table[").unwrap_err();
        assert!(matches!(err, EdgarError::Selector(_)));
    }
}
