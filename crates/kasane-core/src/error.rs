//! Error types for the Kasane console.

use thiserror::Error;

/// A shared error type for the whole console.
///
/// Every variant is terminal for the action that produced it. None of them
/// leaves the command queue or the session in a modified state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KasaneError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Local input validation failed (missing field, bad option, no selection)
    #[error("{0}")]
    Validation(String),

    /// Execute was requested with nothing queued
    #[error("Please add at least one command")]
    EmptyQueue,

    /// Execute was requested before logging in
    #[error("Not logged in")]
    NotAuthenticated,

    /// Login was requested while a session is active
    #[error("Already logged in; log out first")]
    AlreadyAuthenticated,

    /// The same operation is already in flight
    #[error("{0} is already in progress")]
    Busy(&'static str),

    /// Server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// No response could be obtained on any applicable path
    #[error("Network error: {0}")]
    Network(String),

    /// Login succeeded at the HTTP level but the body is not a usable session
    #[error("Invalid session: {0}")]
    Session(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },
}

impl KasaneError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates the validation error reported for an empty required field
    pub fn required_field(field: &str) -> Self {
        Self::Validation(format!("{} is required", field))
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for KasaneError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for KasaneError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for KasaneError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, KasaneError>`.
pub type Result<T> = std::result::Result<T, KasaneError>;
