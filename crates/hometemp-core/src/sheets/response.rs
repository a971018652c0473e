use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use super::FetchError;

/// Body of a `spreadsheets.values.get` response
///
/// The service omits `values` entirely when the requested range holds no
/// data, which is how "no data" is told apart from an explicit empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub major_dimension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Vec<String>>>,
}

impl ValueRange {
    /// Build a response holding the given rows
    pub fn with_rows(range: &str, rows: Vec<Vec<String>>) -> Self {
        Self {
            range: range.to_string(),
            major_dimension: Some("ROWS".to_string()),
            values: Some(rows),
        }
    }

    /// Build a response for a range with no data
    pub fn empty(range: &str) -> Self {
        Self {
            range: range.to_string(),
            major_dimension: Some("ROWS".to_string()),
            values: None,
        }
    }

    /// Decode a JSON response body
    pub fn from_json(body: &[u8]) -> Result<Self, FetchError> {
        serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
