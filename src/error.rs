use thiserror::Error;

/// Main error type for the speedrun lookup.
/// Aggregates errors from the standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum SpeedrunError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    // Third-party library errors
    #[error("{0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    TomlError(#[from] toml::de::Error),

    // Internal module errors
    #[error("{0}")]
    RangeError(#[from] crate::spreadsheet::range::RangeError),

    #[error("{0}")]
    SheetsError(#[from] crate::sheets::SheetsError),

    #[error("{0}")]
    ConfigError(#[from] crate::config::ConfigError),

    /// A negative row count reached the extractor boundary
    #[error("Row count must not be negative, got {0}")]
    InvalidRowCount(i64),
}

pub trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, SpeedrunError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| SpeedrunError::WithContextError(format!("{}: {}", message, e)))
    }
}
