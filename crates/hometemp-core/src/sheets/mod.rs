//! Spreadsheet data source
//!
//! The viewer's readings live in a three-column sheet (`date`, `temperature`,
//! `humidity`) with a header in row 1 and the newest reading in row 2. This
//! module maps page indices to row ranges, defines the [`SheetSource`] seam
//! that performs the actual read, and provides [`SheetGateway`], which turns
//! raw cells into [`Reading`](crate::reading::Reading)s.

mod error;
mod gateway;
mod response;

pub use error::{FetchError, RowDefect};
pub use gateway::SheetGateway;
pub use response::ValueRange;

use core::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::paging::PageIndex;

/// Maximum length of a range expression such as `Sheet1!A1000002:C1000051`
pub const MAX_RANGE_EXPR_LENGTH: usize = 64;

/// Range expression in A1 notation
pub type RangeExpr = heapless::String<MAX_RANGE_EXPR_LENGTH>;

/// Where data rows start and how many make up one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    /// First data row (row 1 holds the column headers)
    pub first_data_row: u32,
    /// Rows per page
    pub rows_per_page: u32,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            first_data_row: 2,
            rows_per_page: 50,
        }
    }
}

impl SheetLayout {
    /// Rows covered by a page; page 0 is the most recent
    pub fn page_rows(&self, page: PageIndex) -> RowRange {
        let offset = page.get().saturating_mul(self.rows_per_page);
        let start = self.first_data_row.saturating_add(offset);
        let end = start.saturating_add(self.rows_per_page.saturating_sub(1));
        RowRange { start, end }
    }

    /// The single newest row
    pub fn latest_row(&self) -> RowRange {
        RowRange {
            start: self.first_data_row,
            end: self.first_data_row,
        }
    }
}

/// Inclusive range of sheet rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: u32,
    pub end: u32,
}

impl RowRange {
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start) + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// A row range on a named sheet, columns A through C
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    expr: RangeExpr,
    rows: RowRange,
}

impl SheetRange {
    /// Build `{sheet}!A{start}:C{end}`
    ///
    /// Sheet names longer than the expression buffer are truncated.
    pub fn new(sheet: &str, rows: RowRange) -> Self {
        let mut expr = RangeExpr::new();
        if write!(expr, "{}!A{}:C{}", sheet, rows.start, rows.end).is_err() {
            log::warn!("Range expression for sheet {:?} truncated", sheet);
        }
        Self { expr, rows }
    }

    pub fn as_str(&self) -> &str {
        &self.expr
    }

    pub fn rows(&self) -> RowRange {
        self.rows
    }
}

/// Something that can read a block of cells from the spreadsheet
///
/// Implementations perform network I/O and must be driven from a
/// background executor, never from the UI loop.
#[allow(async_fn_in_trait)]
pub trait SheetSource {
    async fn read_range(&self, range: &SheetRange) -> Result<ValueRange, FetchError>;
}

impl<S: SheetSource> SheetSource for &S {
    async fn read_range(&self, range: &SheetRange) -> Result<ValueRange, FetchError> {
        (**self).read_range(range).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_zero_rows() {
        let rows = SheetLayout::default().page_rows(PageIndex::new(0));
        assert_eq!(rows, RowRange { start: 2, end: 51 });
        assert_eq!(rows.len(), 50);
    }

    #[test]
    fn test_page_three_rows() {
        let rows = SheetLayout::default().page_rows(PageIndex::new(3));
        assert_eq!(rows, RowRange { start: 152, end: 201 });
    }

    #[test]
    fn test_row_formula_holds_for_many_pages() {
        let layout = SheetLayout::default();
        for p in 0..500u32 {
            let rows = layout.page_rows(PageIndex::new(p));
            assert_eq!(rows.start, 2 + 50 * p);
            assert_eq!(rows.end, 51 + 50 * p);
        }
    }

    #[test]
    fn test_range_expression() {
        let range = SheetRange::new("Sheet1", SheetLayout::default().page_rows(PageIndex::new(3)));
        assert_eq!(range.as_str(), "Sheet1!A152:C201");

        let latest = SheetRange::new("Sheet1", SheetLayout::default().latest_row());
        assert_eq!(latest.as_str(), "Sheet1!A2:C2");
    }

    #[test]
    fn test_custom_layout() {
        let layout = SheetLayout {
            first_data_row: 3,
            rows_per_page: 10,
        };
        assert_eq!(
            layout.page_rows(PageIndex::new(2)),
            RowRange { start: 23, end: 32 }
        );
    }
}
