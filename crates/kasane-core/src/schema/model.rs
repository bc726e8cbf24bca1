//! Command schema domain models.

use serde::Serialize;

/// How a field is entered by the operator.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text input
    Text,
    /// Free text input that must not be echoed
    Password,
    /// One value out of a fixed option list
    Select,
}

/// A single input field of a command.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    /// Field name, also the parameter key sent to the server
    pub name: &'static str,
    /// Input kind
    pub kind: FieldKind,
    /// Whether submit is refused while this field is empty
    pub required: bool,
    /// Allowed values, in display order (only for `Select`)
    pub options: &'static [&'static str],
}

impl FieldSpec {
    /// Creates a required text field.
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required: true,
            options: &[],
        }
    }

    /// Creates a required password field.
    pub const fn password(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Password,
            required: true,
            options: &[],
        }
    }

    /// Creates a required select field.
    pub const fn select(name: &'static str, options: &'static [&'static str]) -> Self {
        Self {
            name,
            kind: FieldKind::Select,
            required: true,
            options,
        }
    }

    /// Returns true if `value` is acceptable for this field.
    ///
    /// The empty string is always accepted; it stands for "not filled in".
    pub fn accepts(&self, value: &str) -> bool {
        match self.kind {
            FieldKind::Select => value.is_empty() || self.options.contains(&value),
            FieldKind::Text | FieldKind::Password => true,
        }
    }
}

/// UI grouping of commands.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum CommandGroup {
    Database,
    Key,
    User,
}

impl CommandGroup {
    /// Display label of the group.
    pub fn label(self) -> &'static str {
        match self {
            Self::Database => "Database Operations",
            Self::Key => "Key Operations",
            Self::User => "User Operations",
        }
    }
}

/// A command the server understands, with the inputs it takes.
#[derive(Debug, Clone, Serialize)]
pub struct CommandSpec {
    /// Command name, unique within the registry
    pub name: &'static str,
    /// Human-readable label
    pub label: &'static str,
    /// Group the command is listed under
    pub group: CommandGroup,
    /// Input fields in declaration order
    pub fields: &'static [FieldSpec],
}

impl CommandSpec {
    /// Creates a new command spec.
    pub const fn new(
        name: &'static str,
        label: &'static str,
        group: CommandGroup,
        fields: &'static [FieldSpec],
    ) -> Self {
        Self {
            name,
            label,
            group,
            fields,
        }
    }

    /// Finds a field by name.
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// True when the command is sent as a bare name.
    pub fn is_bare(&self) -> bool {
        self.fields.is_empty()
    }
}
