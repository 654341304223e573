//! Error types for Strata

use thiserror::Error;

/// The main error type for Strata operations
#[derive(Debug, Error)]
pub enum StrataError {
    #[error("Invalid {kind}: {value} is not one of {allowed:?}")]
    InvalidEnumValue {
        kind: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: i64,
        max: i64,
        value: i64,
    },

    #[error("Node not found: {0}")]
    MissingNode(String),

    #[error("Host error: {0}")]
    HostError(String),

    #[error("Import error: {0}")]
    ImportError(String),

    #[error("Descriptor error: {0}")]
    DescriptorError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("JSON error: {0}")]
    JsonError(String),
}

impl StrataError {
    /// Build an `InvalidEnumValue` error from any list of allowed names
    pub fn invalid_enum<I, S>(kind: &str, value: &str, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StrataError::InvalidEnumValue {
            kind: kind.to_string(),
            value: value.to_string(),
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result type alias for Strata operations
pub type Result<T> = std::result::Result<T, StrataError>;

impl From<toml::de::Error> for StrataError {
    fn from(err: toml::de::Error) -> Self {
        StrataError::TomlParseError(err.to_string())
    }
}

impl From<serde_json::Error> for StrataError {
    fn from(err: serde_json::Error) -> Self {
        StrataError::JsonError(err.to_string())
    }
}
