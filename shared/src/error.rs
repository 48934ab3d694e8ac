use std::path::PathBuf;

use serde_json::Error as JsonError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable missing: {0}")]
    MissingVar(String),

    #[error("Unknown environment: {0}")]
    UnknownVariant(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid URL '{value}': {source}")]
    Url {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to load env file {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenv::Error,
    },

    #[error("Environment configuration is already initialized")]
    AlreadyInitialized,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

impl From<JsonError> for ConfigError {
    fn from(error: JsonError) -> Self {
        Self::Serialization(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_var_message() {
        let err = ConfigError::MissingVar("AUTH0_CLIENT_ID".to_string());
        assert_eq!(
            err.to_string(),
            "Required environment variable missing: AUTH0_CLIENT_ID"
        );
    }

    #[test]
    fn test_url_error_keeps_source() {
        let source = url::Url::parse("not a url").unwrap_err();
        let err = ConfigError::Url {
            value: "not a url".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Invalid URL 'not a url'"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ConfigError = json_err.into();
        assert!(matches!(err, ConfigError::Serialization(_)));
    }
}
