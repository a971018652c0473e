//! Synthetic spreadsheet for running the viewer without network access
//!
//! Readings are five minutes apart, newest first, counting back from
//! 2021-03-10 23:55. Values follow slow sine waves and carry three decimals
//! so the rounding path is exercised.

use std::time::Duration;

use hometemp_core::sheets::{FetchError, SheetLayout, SheetRange, SheetSource, ValueRange};
use log::debug;

/// Rows a demo sheet holds by default
pub const DEFAULT_DEMO_ROWS: u32 = 1000;

/// Readings fit inside these days of March 2021
const MAX_DEMO_ROWS: u32 = 9 * MINUTES_PER_DAY / SAMPLE_INTERVAL_MIN;

const SAMPLE_INTERVAL_MIN: u32 = 5;
const MINUTES_PER_DAY: u32 = 24 * 60;
const NEWEST_DAY: u32 = 10;
const NEWEST_MINUTE_OF_DAY: u32 = 23 * 60 + 55;

#[derive(Debug, Clone)]
pub struct DemoSheetSource {
    layout: SheetLayout,
    rows: u32,
    latency: Duration,
    malformed_row: Option<u32>,
}

impl DemoSheetSource {
    pub fn new(layout: SheetLayout, rows: u32) -> Self {
        Self {
            layout,
            rows: rows.min(MAX_DEMO_ROWS),
            latency: Duration::ZERO,
            malformed_row: None,
        }
    }

    /// Delay every read, to make overlapping requests observable
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Corrupt the temperature cell of one sheet row
    pub fn with_malformed_row(mut self, row: Option<u32>) -> Self {
        self.malformed_row = row;
        self
    }

    fn last_row(&self) -> Option<u32> {
        self.rows
            .checked_sub(1)
            .map(|n| self.layout.first_data_row.saturating_add(n))
    }

    /// Cells of sheet row `row`, which must be a data row
    fn row_cells(&self, row: u32) -> Vec<String> {
        let age = row - self.layout.first_data_row;
        let minutes_back = age * SAMPLE_INTERVAL_MIN;
        let total = NEWEST_DAY * MINUTES_PER_DAY + NEWEST_MINUTE_OF_DAY - minutes_back;
        let (day, minute) = (total / MINUTES_PER_DAY, total % MINUTES_PER_DAY);
        let timestamp = format!(
            "2021-03-{:02} {:02}:{:02}:00",
            day,
            minute / 60,
            minute % 60
        );

        let t = age as f64;
        let temperature = 22.5 + 2.5 * (t / 40.0).sin() + 0.4 * (t / 7.0).cos();
        let humidity = 50.0 + 9.0 * (t / 65.0).sin() + 1.5 * (t / 11.0).cos();

        let temperature = if self.malformed_row == Some(row) {
            "n/a".to_string()
        } else {
            format!("{:.3}", temperature)
        };

        vec![timestamp, temperature, format!("{:.3}", humidity)]
    }
}

impl SheetSource for DemoSheetSource {
    async fn read_range(&self, range: &SheetRange) -> Result<ValueRange, FetchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let rows = range.rows();
        let Some(last) = self.last_row() else {
            return Ok(ValueRange::empty(range.as_str()));
        };
        if rows.start > last || rows.start < self.layout.first_data_row {
            debug!("Demo sheet has no rows in {}", range.as_str());
            return Ok(ValueRange::empty(range.as_str()));
        }

        let values = (rows.start..=rows.end.min(last))
            .map(|row| self.row_cells(row))
            .collect();
        Ok(ValueRange::with_rows(range.as_str(), values))
    }
}
