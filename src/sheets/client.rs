use crate::sheets::credentials::Credentials;
use crate::sheets::credentials::RefreshResponse;
use crate::sheets::GridSource;
use crate::sheets::SheetsConfig;
use crate::sheets::SheetsError;
use crate::spreadsheet::CellValue;
use crate::spreadsheet::Grid;
use chrono::Utc;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use tracing::info;
use url::Url;

/// Body of a `spreadsheets.values.get` response.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    range: Option<String>,
    #[serde(default, rename = "majorDimension")]
    major_dimension: Option<String>,
    /// Omitted entirely when the range holds no values
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

/// Blocking client for the Sheets values API.
pub struct SheetsClient {
    config: SheetsConfig,
    credentials: Credentials,
    http: Client,
}

impl SheetsClient {
    const TIMEOUT: Duration = Duration::from_secs(15);

    /// Loads credentials from the configured paths and prepares an HTTP client.
    pub fn new(config: SheetsConfig) -> Result<Self, SheetsError> {
        let credentials = Credentials::load(&config.secrets_path, &config.token_path)?;
        Self::with_credentials(config, credentials)
    }

    pub fn with_credentials(config: SheetsConfig, credentials: Credentials) -> Result<Self, SheetsError> {
        let http = Client::builder()
            .timeout(Self::TIMEOUT)
            .user_agent(concat!("speedrun_sheet/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            config,
            credentials,
            http,
        })
    }

    /// Builds the values endpoint for `range`, percent-encoding it as a single path segment.
    pub fn values_url(&self, range: &str) -> Result<Url, SheetsError> {
        let mut url = Url::parse(&self.config.api_base)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["spreadsheets", self.config.spreadsheet_id.as_str(), "values", range]);
        url.query_pairs_mut()
            .append_pair("majorDimension", "ROWS")
            .append_pair("valueRenderOption", &self.config.value_render_option);
        Ok(url)
    }

    /// Swaps an expired access token for a fresh one.
    fn ensure_token(&mut self) -> Result<(), SheetsError> {
        let now = Utc::now();
        if !self.credentials.token.is_expired(now) {
            return Ok(());
        }
        let refresh_token = self
            .credentials
            .token
            .refresh_token
            .clone()
            .ok_or_else(|| SheetsError::TokenRefresh {
                message: "token expired and no refresh token is stored".to_owned(),
            })?;
        info!("Access token expired, refreshing");
        let response = self
            .http
            .post(&self.config.token_endpoint)
            .form(&[
                ("client_id", self.credentials.secret.client_id.as_str()),
                ("client_secret", self.credentials.secret.client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(SheetsError::TokenRefresh {
                message: format!("{}: {}", status.as_u16(), error_message(&body)),
            });
        }
        let refreshed: RefreshResponse = serde_json::from_str(&body)?;
        self.credentials.token = self.credentials.token.refreshed(refreshed, now);
        Ok(())
    }
}

impl GridSource for SheetsClient {
    fn fetch(&mut self, range: &str) -> Result<Grid, SheetsError> {
        self.ensure_token()?;
        let url = self.values_url(range)?;
        debug!(url = url.as_str(), "Fetching sheet values");
        let response = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, self.credentials.token.authorization())
            .send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        check_status(status, &body, range)?;
        parse_value_range(&body)
    }
}

/// Maps a non-success response to the matching error.
pub(crate) fn check_status(status: u16, body: &str, range: &str) -> Result<(), SheetsError> {
    match status {
        200..=299 => Ok(()),
        400 => Err(SheetsError::InvalidRange {
            range: range.to_owned(),
            message: error_message(body),
        }),
        _ => Err(SheetsError::Api {
            status,
            message: error_message(body),
        }),
    }
}

/// Pulls `error.message` out of an API error body, falling back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.trim().to_owned())
}

/// Converts a value range body into a grid.
pub(crate) fn parse_value_range(body: &str) -> Result<Grid, SheetsError> {
    let value_range: ValueRange = serde_json::from_str(body)?;
    debug!(
        range = value_range.range.as_deref().unwrap_or_default(),
        major_dimension = value_range.major_dimension.as_deref().unwrap_or("ROWS"),
        rows = value_range.values.len(),
        "Parsed value range"
    );
    let rows = value_range
        .values
        .iter()
        .map(|row| row.iter().map(CellValue::from).collect())
        .collect();
    Ok(Grid::new(rows))
}
