use std::path::PathBuf;

use hometemp_core::config::ConfigError;
use thiserror::Error;

/// Errors that stop the viewer before the first frame
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Config(ConfigError),
    #[error("Invalid credentials: {0}")]
    Credentials(String),
    #[error("Invalid API base URL {url:?}: {reason}")]
    ApiBase { url: String, reason: String },
    #[error("No spreadsheet id configured")]
    MissingSpreadsheetId,
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[cfg(not(feature = "window"))]
    #[error("Built without the window feature; use --snapshot")]
    WindowUnavailable,
    #[error("Failed to write snapshot {}: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ViewerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<ConfigError> for ViewerError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
