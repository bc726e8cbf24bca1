//! Schema-driven command form.
//!
//! The form holds the command currently selected by the operator and the
//! values typed so far. Submitting validates the required fields, turns the
//! values into a [`ComposedCommand`] and appends it to a [`CommandQueue`].

use std::collections::HashMap;

use crate::command::ComposedCommand;
use crate::error::{KasaneError, Result};
use crate::queue::CommandQueue;
use crate::schema::{self, CommandSpec, FieldKind};

/// Form state.
#[derive(Debug, Clone, Default)]
pub enum FormState {
    #[default]
    NoSelection,
    Editing {
        spec: &'static CommandSpec,
        values: HashMap<String, String>,
    },
}

/// One option of a select field as offered to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Value stored in the form; empty for the "unselected" entry
    pub value: String,
    pub label: String,
}

/// A field ready to be drawn by a front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
    /// Placeholder for text/password inputs
    pub placeholder: String,
    /// Empty for non-select fields; otherwise the unselected entry followed
    /// by the declared options in order
    pub options: Vec<SelectOption>,
}

/// The command form state machine.
#[derive(Debug, Clone, Default)]
pub struct CommandForm {
    state: FormState,
}

impl CommandForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Spec of the selected command, if any.
    pub fn selected(&self) -> Option<&'static CommandSpec> {
        match &self.state {
            FormState::NoSelection => None,
            FormState::Editing { spec, .. } => Some(*spec),
        }
    }

    /// Selects a command and resets every field value.
    pub fn select(&mut self, name: &str) -> Result<&'static CommandSpec> {
        let spec = schema::lookup(name)?;
        self.state = FormState::Editing {
            spec,
            values: HashMap::new(),
        };
        Ok(spec)
    }

    /// Updates a single field of the selected command.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> Result<()> {
        let FormState::Editing { spec, values } = &mut self.state else {
            return Err(KasaneError::validation("no command selected"));
        };
        let field_spec = spec
            .field(field)
            .ok_or_else(|| KasaneError::not_found("field", format!("{}.{}", spec.name, field)))?;

        let value = value.into();
        if !field_spec.accepts(&value) {
            return Err(KasaneError::validation(format!(
                "{} must be one of {}",
                field_spec.name,
                field_spec.options.join(", ")
            )));
        }

        values.insert(field_spec.name.to_string(), value);
        Ok(())
    }

    /// Current value of a field; empty when never set.
    pub fn field_value(&self, field: &str) -> &str {
        match &self.state {
            FormState::NoSelection => "",
            FormState::Editing { values, .. } => values.get(field).map_or("", String::as_str),
        }
    }

    /// Fields of the selected command, ready for display.
    pub fn render_fields(&self) -> Vec<FieldView> {
        let Some(spec) = self.selected() else {
            return Vec::new();
        };

        spec.fields
            .iter()
            .map(|field| {
                let options = if field.kind == FieldKind::Select {
                    std::iter::once(SelectOption {
                        value: String::new(),
                        label: format!("Select {}", field.name),
                    })
                    .chain(field.options.iter().map(|option| SelectOption {
                        value: (*option).to_string(),
                        label: (*option).to_string(),
                    }))
                    .collect()
                } else {
                    Vec::new()
                };

                FieldView {
                    name: field.name,
                    kind: field.kind,
                    required: field.required,
                    value: self.field_value(field.name).to_string(),
                    placeholder: format!("Enter {}", field.name),
                    options,
                }
            })
            .collect()
    }

    /// Validates the form and builds the command without touching any queue.
    pub fn compose(&self) -> Result<ComposedCommand> {
        let FormState::Editing { spec, values } = &self.state else {
            return Err(KasaneError::validation("no command selected"));
        };

        for field in spec.fields.iter().filter(|f| f.required) {
            if values.get(field.name).is_none_or(|v| v.is_empty()) {
                return Err(KasaneError::required_field(field.name));
            }
        }

        if spec.is_bare() {
            return Ok(ComposedCommand::Bare(spec.name.to_string()));
        }

        let params = spec
            .fields
            .iter()
            .filter_map(|field| {
                values
                    .get(field.name)
                    .map(|value| (field.name.to_string(), value.clone()))
            })
            .collect();

        Ok(ComposedCommand::WithParams {
            name: spec.name.to_string(),
            params,
        })
    }

    /// Composes the command, appends it to `queue` and clears the values.
    ///
    /// The selection is kept so another command of the same type can be
    /// added right away. On validation failure neither the queue nor the
    /// form changes.
    pub fn submit(&mut self, queue: &mut CommandQueue) -> Result<ComposedCommand> {
        let command = self.compose()?;
        queue.append(command.clone());
        if let FormState::Editing { values, .. } = &mut self.state {
            values.clear();
        }
        Ok(command)
    }
}
