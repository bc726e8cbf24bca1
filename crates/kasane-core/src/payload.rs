//! Request bodies sent to the server.

use serde::{Deserialize, Serialize};

use crate::command::ComposedCommand;
use crate::error::Result;

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginPayload<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl LoginPayload<'_> {
    /// Compact JSON body.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Body of `POST /execute`: a session id and the batch in execution order.
///
/// Field order is part of the wire format: `session` first, then `command`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutePayload {
    pub session: String,
    pub command: Vec<ComposedCommand>,
}

impl ExecutePayload {
    /// Builds a payload from a queue snapshot.
    pub fn new(session: impl Into<String>, command: &[ComposedCommand]) -> Self {
        Self {
            session: session.into(),
            command: command.to_vec(),
        }
    }

    /// Two-space indented JSON. This exact string is both displayed and sent.
    pub fn to_request_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
