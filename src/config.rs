use crate::category::CategoryAliases;
use crate::error::SpeedrunError;
use crate::lookup::DEFAULT_MAX_ROWS;
use crate::sheets::SheetsConfig;
use crate::sheets::API_BASE;
use crate::sheets::SECRETS_PATH;
use crate::sheets::SPREADSHEET_ID;
use crate::sheets::TOKEN_ENDPOINT;
use crate::sheets::TOKEN_PATH;
use crate::spreadsheet::Matcher;
use crate::spreadsheet::Range;
use crate::spreadsheet::RowLimitMode;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Errors related to configuration values.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for '{name}': expected {expected}")]
    InvalidValue {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Settings for a lookup run, as read from a TOML file.
///
/// Every field is optional in the file; missing ones keep their defaults.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub spreadsheet_id: String,
    pub secrets_path: PathBuf,
    pub token_path: PathBuf,
    pub api_base: String,
    pub token_endpoint: String,
    pub value_render_option: String,
    /// Optional A1 window applied to every sheet, e.g. "A1:Z200"
    pub window: Option<String>,
    /// `loose` or `exact`
    pub matcher: String,
    /// `absolute` or `count`
    pub row_limit: String,
    /// Largest row bound a request may ask for
    pub max_rows: usize,
    /// Extra aliases, overriding the built-in ones
    pub aliases: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spreadsheet_id: SPREADSHEET_ID.to_owned(),
            secrets_path: PathBuf::from(SECRETS_PATH),
            token_path: PathBuf::from(TOKEN_PATH),
            api_base: API_BASE.to_owned(),
            token_endpoint: TOKEN_ENDPOINT.to_owned(),
            value_render_option: "FORMATTED_VALUE".to_owned(),
            window: None,
            matcher: "loose".to_owned(),
            row_limit: "absolute".to_owned(),
            max_rows: DEFAULT_MAX_ROWS,
            aliases: HashMap::new(),
        }
    }
}

impl Config {
    /// Reads a TOML config file.
    pub fn load(path: &Path) -> Result<Self, SpeedrunError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, SpeedrunError> {
        Ok(toml::from_str(content)?)
    }

    pub fn sheets(&self) -> SheetsConfig {
        SheetsConfig {
            spreadsheet_id: self.spreadsheet_id.to_owned(),
            secrets_path: self.secrets_path.to_owned(),
            token_path: self.token_path.to_owned(),
            api_base: self.api_base.to_owned(),
            token_endpoint: self.token_endpoint.to_owned(),
            value_render_option: self.value_render_option.to_owned(),
        }
    }

    pub fn matcher(&self) -> Result<Matcher, SpeedrunError> {
        Matcher::parse(&self.matcher).ok_or_else(|| invalid("matcher", &self.matcher, "'loose' or 'exact'"))
    }

    pub fn row_limit_mode(&self) -> Result<RowLimitMode, SpeedrunError> {
        RowLimitMode::parse(&self.row_limit)
            .ok_or_else(|| invalid("row_limit", &self.row_limit, "'absolute' or 'count'"))
    }

    pub fn window(&self) -> Result<Range, SpeedrunError> {
        self.window
            .as_deref()
            .map(Range::try_from)
            .transpose()
            .map(Option::unwrap_or_default)
    }

    /// Built-in aliases with the configured overrides applied.
    pub fn aliases(&self) -> CategoryAliases {
        let mut aliases = CategoryAliases::default();
        aliases.extend(self.aliases.iter().map(|(alias, sheet)| (alias.to_owned(), sheet.to_owned())));
        aliases
    }
}

fn invalid(name: &'static str, value: &str, expected: &'static str) -> SpeedrunError {
    ConfigError::InvalidValue {
        name,
        value: value.to_owned(),
        expected,
    }
    .into()
}
