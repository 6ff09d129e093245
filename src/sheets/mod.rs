//! # Sheets Data Source
//!
//! Fetches cell grids from the Google Sheets values API on behalf of the
//! lookup. The lookup itself only sees the [`GridSource`] trait, so tests and
//! other backends can hand it any grid they like.
use crate::spreadsheet::Grid;
use std::path::PathBuf;
use thiserror::Error;

pub mod client;
pub mod credentials;

pub use client::SheetsClient;
pub use credentials::ClientSecret;
pub use credentials::Credentials;
pub use credentials::Token;

/// Default spreadsheet holding the leaderboards.
pub const SPREADSHEET_ID: &str = "11gTjAkpm4D3uoxnYCN7ZfbiVnKyi7tmm9Vp9HvTkGpw";
/// Default location of the stored OAuth token.
pub const TOKEN_PATH: &str = "secrets/credentials.json";
/// Default location of the OAuth client secret.
pub const SECRETS_PATH: &str = "secrets/client_secret.json";
/// Default values API root.
pub const API_BASE: &str = "https://sheets.googleapis.com/v4/";
/// Default OAuth2 token endpoint used for refreshing access tokens.
pub const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Errors raised while loading credentials or talking to the Sheets API.
#[derive(Error, Debug)]
pub enum SheetsError {
    /// Credential file could not be read
    #[error("Unable to open '{path}': {source}")]
    MissingCredentials {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Credential file is not the expected JSON document
    #[error("Malformed credentials in '{path}': {source}")]
    MalformedCredentials {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The stored token is expired and cannot be refreshed
    #[error("Access token refresh failed: {message}")]
    TokenRefresh { message: String },

    /// The API rejected the requested range (HTTP 400)
    #[error("Invalid range '{range}': {message}")]
    InvalidRange { range: String, message: String },

    /// Any other non-success API response
    #[error("Sheets API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body is not a value range
    #[error("Unexpected response body: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Invalid API url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{0}")]
    HttpError(#[from] reqwest::Error),
}

/// Connection settings for the Sheets values API.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub secrets_path: PathBuf,
    pub token_path: PathBuf,
    pub api_base: String,
    pub token_endpoint: String,
    /// `FORMATTED_VALUE`, `UNFORMATTED_VALUE` or `FORMULA`
    pub value_render_option: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: SPREADSHEET_ID.to_owned(),
            secrets_path: PathBuf::from(SECRETS_PATH),
            token_path: PathBuf::from(TOKEN_PATH),
            api_base: API_BASE.to_owned(),
            token_endpoint: TOKEN_ENDPOINT.to_owned(),
            value_render_option: "FORMATTED_VALUE".to_owned(),
        }
    }
}

/// Anything that can produce a grid of values for a named sheet range.
pub trait GridSource {
    /// Fetches the values of `range` (a sheet name, optionally followed by `!A1:B2`).
    fn fetch(&mut self, range: &str) -> Result<Grid, SheetsError>;
}
