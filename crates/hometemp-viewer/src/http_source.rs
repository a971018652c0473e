//! Spreadsheet source backed by the Sheets REST API

use std::time::Duration;

use hometemp_core::config::HttpConfig;
use hometemp_core::sheets::{FetchError, SheetRange, SheetSource, ValueRange};
use log::debug;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::ViewerError;

/// How requests are authorized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Sent as `Authorization: Bearer ...`
    AccessToken(String),
    /// Sent as the `key` query parameter
    ApiKey(String),
}

#[derive(Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    api_key: Option<String>,
}

impl Credentials {
    /// Parse a credentials document. An access token wins over an API key.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ViewerError> {
        let file: CredentialsFile =
            serde_json::from_slice(bytes).map_err(|e| ViewerError::Credentials(e.to_string()))?;

        match (file.access_token, file.api_key) {
            (Some(token), _) if !token.is_empty() => Ok(Self::AccessToken(token)),
            (_, Some(key)) if !key.is_empty() => Ok(Self::ApiKey(key)),
            _ => Err(ViewerError::Credentials(
                "expected an access_token or api_key".to_string(),
            )),
        }
    }
}

pub struct HttpSheetSource {
    client: Client,
    api_base: Url,
    spreadsheet_id: String,
    credentials: Credentials,
}

impl HttpSheetSource {
    pub fn new(
        http: &HttpConfig,
        spreadsheet_id: &str,
        credentials: Credentials,
    ) -> Result<Self, ViewerError> {
        if spreadsheet_id.is_empty() {
            return Err(ViewerError::MissingSpreadsheetId);
        }

        let api_base = Url::parse(&http.api_base).map_err(|e| ViewerError::ApiBase {
            url: http.api_base.clone(),
            reason: e.to_string(),
        })?;
        if api_base.cannot_be_a_base() {
            return Err(ViewerError::ApiBase {
                url: http.api_base.clone(),
                reason: "not a base URL".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base,
            spreadsheet_id: spreadsheet_id.to_string(),
            credentials,
        })
    }

    /// `{base}/v4/spreadsheets/{id}/values/{range}`, plus the API key if used
    fn values_url(&self, range: &SheetRange) -> Result<Url, FetchError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport("API base cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                range.as_str(),
            ]);

        if let Credentials::ApiKey(key) = &self.credentials {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }
}

impl SheetSource for HttpSheetSource {
    async fn read_range(&self, range: &SheetRange) -> Result<ValueRange, FetchError> {
        let url = self.values_url(range)?;
        debug!("GET {}", url.path());

        let mut request = self.client.get(url);
        if let Credentials::AccessToken(token) = &self.credentials {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(transport_error)?;
        let body = response.bytes().await.map_err(transport_error)?;

        ValueRange::from_json(&body)
    }
}

fn transport_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Transport("request timed out".to_string())
    } else {
        FetchError::Transport(e.without_url().to_string())
    }
}
