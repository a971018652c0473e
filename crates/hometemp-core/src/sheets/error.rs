use alloc::string::String;
use thiserror_no_std::Error;

use crate::reading::DecimalError;

/// Why a row could not be turned into a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RowDefect {
    #[error("expected 3 cells, found {found}")]
    CellCount { found: usize },
    #[error("temperature: {0}")]
    Temperature(DecimalError),
    #[error("humidity: {0}")]
    Humidity(DecimalError),
}

/// Errors that end a fetch. None of them are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("No data")]
    NoData,
    #[error("Malformed row {row}: {defect}")]
    MalformedRow {
        /// Spreadsheet row number (1-based, header is row 1)
        row: u32,
        defect: RowDefect,
    },
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Undecodable response: {0}")]
    Decode(String),
}
