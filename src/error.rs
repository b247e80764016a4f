//! Error types and handling for `EcoRoute`

use thiserror::Error;

/// Main error type for the `EcoRoute` engine
#[derive(Error, Debug)]
pub enum EcoRouteError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Directions or place-search provider errors
    #[error("Provider error: {message}")]
    Provider { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Cache and trip-store errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Strict lookup of a mode identifier that does not exist
    #[error("Unknown transport mode: {mode}")]
    UnknownMode { mode: String },

    /// Every requested mode, native and synthetic, failed
    #[error("No routes found ({})", reasons.join("; "))]
    NoRoutes { reasons: Vec<String> },
}

impl EcoRouteError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new provider error
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn unknown_mode<S: Into<String>>(mode: S) -> Self {
        Self::UnknownMode { mode: mode.into() }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            EcoRouteError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            EcoRouteError::Provider { .. } => {
                "Unable to reach the directions service. Please check your connection or API key."
                    .to_string()
            }
            EcoRouteError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            EcoRouteError::Cache { .. } => {
                "Cache operation failed. You may need to clear your cache.".to_string()
            }
            EcoRouteError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            EcoRouteError::UnknownMode { mode } => format!("Unknown transport mode '{mode}'"),
            EcoRouteError::NoRoutes { .. } => {
                "Could not find any routes between these locations.".to_string()
            }
        }
    }
}

impl From<anyhow::Error> for EcoRouteError {
    fn from(err: anyhow::Error) -> Self {
        EcoRouteError::provider(format!("{err:#}"))
    }
}
