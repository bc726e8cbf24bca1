//! Session returned by a successful login.

use serde::Serialize;
use serde_json::Value;

use crate::error::{KasaneError, Result};

/// Field of the login response that carries the session identifier.
pub const SESSION_ID_FIELD: &str = "session_id";

/// Server-issued session, kept exactly as the server returned it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Session {
    raw: Value,
}

impl Session {
    /// Wraps a login response body.
    ///
    /// Fails when the value has no string `session_id`; such a response
    /// cannot be used for any later execute.
    pub fn from_value(raw: Value) -> Result<Self> {
        match raw.get(SESSION_ID_FIELD) {
            Some(Value::String(_)) => Ok(Self { raw }),
            Some(other) => Err(KasaneError::Session(format!(
                "{} must be a string, got {}",
                SESSION_ID_FIELD, other
            ))),
            None => Err(KasaneError::Session(format!(
                "login response has no {}",
                SESSION_ID_FIELD
            ))),
        }
    }

    /// Parses a login response body.
    pub fn from_body(body: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(body)
            .map_err(|e| KasaneError::Session(format!("login response is not JSON: {}", e)))?;
        Self::from_value(raw)
    }

    pub fn session_id(&self) -> &str {
        self.raw
            .get(SESSION_ID_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// The response body as the server sent it.
    pub fn as_value(&self) -> &Value {
        &self.raw
    }
}

/// Who is logged in and where; shown next to the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub username: String,
    pub server_url: String,
}
