use alloc::string::{String, ToString};
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::gesture::SwipeThresholds;
use crate::sheets::SheetLayout;

/// Frames an error banner stays up before dismissing itself
pub const DEFAULT_ERROR_BANNER_FRAMES: u32 = 120;

/// Seconds before an HTTP request is abandoned
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub sheet: SheetConfig,
    pub http: HttpConfig,
    pub gesture: SwipeThresholds,
    pub ui: UiConfig,
}

impl Config {
    /// Parse a JSON configuration document; absent fields take defaults
    pub fn from_json(text: &[u8]) -> Result<Self, ConfigError> {
        serde_json::from_slice(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SheetConfig {
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub layout: SheetLayout,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            sheet_name: "Sheet1".to_string(),
            layout: SheetLayout::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            api_base: "https://sheets.googleapis.com".to_string(),
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub error_banner_frames: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            error_banner_frames: DEFAULT_ERROR_BANNER_FRAMES,
        }
    }
}
