//! Composed commands: the values that make up a command batch.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::error::{KasaneError, Result};

/// A command ready to be queued and sent.
///
/// Commands without fields travel as a bare JSON string (`"version"`).
/// Commands with fields travel as a single-key object mapping the command
/// name to its parameters (`{"createSpace": {"spaceName": "s"}}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposedCommand {
    Bare(String),
    WithParams {
        name: String,
        /// Parameters in the command's declared field order
        params: Vec<(String, String)>,
    },
}

impl ComposedCommand {
    /// Name of the command.
    pub fn name(&self) -> &str {
        match self {
            Self::Bare(name) | Self::WithParams { name, .. } => name,
        }
    }

    /// Parameter value by field name.
    pub fn param(&self, field: &str) -> Option<&str> {
        match self {
            Self::Bare(_) => None,
            Self::WithParams { params, .. } => params
                .iter()
                .find(|(name, _)| name == field)
                .map(|(_, value)| value.as_str()),
        }
    }

    /// Two-space indented JSON, as shown in the queue listing.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

struct Params<'a>(&'a [(String, String)]);

impl Serialize for Params<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for ComposedCommand {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Bare(name) => serializer.serialize_str(name),
            Self::WithParams { name, params } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(name, &Params(params))?;
                map.end()
            }
        }
    }
}

impl TryFrom<Value> for ComposedCommand {
    type Error = KasaneError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(name) => Ok(Self::Bare(name)),
            Value::Object(outer) if outer.len() == 1 => {
                let Some((name, inner)) = outer.into_iter().next() else {
                    return Err(KasaneError::validation("command object is empty"));
                };
                let Value::Object(fields) = inner else {
                    return Err(KasaneError::validation(format!(
                        "parameters of {} must be an object",
                        name
                    )));
                };
                let params = fields
                    .into_iter()
                    .map(|(key, value)| match value {
                        Value::String(text) => Ok((key, text)),
                        other => Err(KasaneError::validation(format!(
                            "parameter {} of {} must be a string, got {}",
                            key, name, other
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::WithParams { name, params })
            }
            other => Err(KasaneError::validation(format!(
                "a command is a string or a single-key object, got {}",
                other
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for ComposedCommand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::try_from(value).map_err(de::Error::custom)
    }
}
