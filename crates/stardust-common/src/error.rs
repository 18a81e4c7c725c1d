//! Error types for Stardust.

use thiserror::Error;

/// Top-level error type for Stardust operations.
#[derive(Debug, Error)]
pub enum StardustError {
    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Pointer script errors
    #[error("Script error: {0}")]
    Script(String),

    /// Snapshot encoding errors
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A color string could not be parsed
    #[error("Invalid color '{0}': expected #rgb, #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    /// The configuration file could not be parsed
    #[error("Failed to parse config: {0}")]
    Parse(String),
}

/// Result type alias for Stardust operations.
pub type StardustResult<T> = Result<T, StardustError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: StardustError = ConfigError::Parse("bad table".to_string()).into();
        assert!(matches!(err, StardustError::Config(ConfigError::Parse(_))));
        assert_eq!(err.to_string(), "Config error: Failed to parse config: bad table");
    }

    #[test]
    fn test_invalid_color_message() {
        let err = ConfigError::InvalidColor("blue".to_string());
        assert!(err.to_string().contains("'blue'"));
    }
}
