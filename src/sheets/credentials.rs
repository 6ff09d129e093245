use crate::sheets::SheetsError;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// OAuth client registration for an installed application.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

#[derive(Deserialize)]
struct ClientSecretFile {
    installed: ClientSecret,
}

/// Stored OAuth token, in the layout written by the Google auth libraries.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    /// Expiry as epoch milliseconds
    #[serde(default)]
    pub expiry_date: Option<i64>,
}

impl Token {
    /// Tokens without an expiry are assumed valid.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date
            .map(|expiry| expiry <= now.timestamp_millis())
            .unwrap_or(false)
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        let kind = self.token_type.as_deref().unwrap_or("Bearer");
        format!("{} {}", kind, self.access_token)
    }

    /// Applies a refresh response, keeping the refresh token when the
    /// response omits it.
    pub(crate) fn refreshed(&self, response: RefreshResponse, now: DateTime<Utc>) -> Token {
        Token {
            access_token: response.access_token,
            refresh_token: response.refresh_token.or_else(|| self.refresh_token.clone()),
            token_type: response.token_type.or_else(|| self.token_type.clone()),
            scope: response.scope.or_else(|| self.scope.clone()),
            expiry_date: response
                .expires_in
                .map(|seconds| (now + Duration::seconds(seconds)).timestamp_millis()),
        }
    }
}

/// Body returned by the OAuth2 token endpoint for a refresh grant.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    pub(crate) access_token: String,
    #[serde(default)]
    pub(crate) expires_in: Option<i64>,
    #[serde(default)]
    pub(crate) refresh_token: Option<String>,
    #[serde(default)]
    pub(crate) token_type: Option<String>,
    #[serde(default)]
    pub(crate) scope: Option<String>,
}

/// Client secret plus the token authorizing requests on its behalf.
#[derive(Clone, Debug, PartialEq)]
pub struct Credentials {
    pub secret: ClientSecret,
    pub token: Token,
}

impl Credentials {
    /// Loads the client secret and the stored token from disk.
    ///
    /// # Arguments
    ///
    /// * `secrets_path` - JSON file with an `installed` client registration
    /// * `token_path` - JSON file with the stored token
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` if either file cannot be read and
    /// `MalformedCredentials` if either is not the expected JSON.
    pub fn load(secrets_path: &Path, token_path: &Path) -> Result<Self, SheetsError> {
        let secret: ClientSecretFile = read_json(secrets_path)?;
        let token: Token = read_json(token_path)?;
        Ok(Self {
            secret: secret.installed,
            token,
        })
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, SheetsError> {
    let content = fs::read_to_string(path).map_err(|source| SheetsError::MissingCredentials {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| SheetsError::MalformedCredentials {
        path: path.to_owned(),
        source,
    })
}
