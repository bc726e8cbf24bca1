//! Builtin command table.
//!
//! The set of commands is fixed; it is built once on first access and cached
//! for the lifetime of the process.

use std::sync::OnceLock;

use super::model::{CommandGroup, CommandSpec, FieldSpec};
use crate::error::{KasaneError, Result};

const KEY_TYPES: &[&str] = &["INT", "BOOLEAN", "TEXT", "FLOAT"];
const KEY_MODES: &[&str] = &["UniqueKey", "MultiKey"];

const SPACE_FIELDS: &[FieldSpec] = &[FieldSpec::text("spaceName")];
const KEY_FIELDS: &[FieldSpec] = &[FieldSpec::text("spaceName"), FieldSpec::text("keyName")];
const CREATE_KEY_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("spaceName"),
    FieldSpec::text("keyName"),
    FieldSpec::select("keyType", KEY_TYPES),
    FieldSpec::select("keyMode", KEY_MODES),
];
const USER_FIELDS: &[FieldSpec] = &[FieldSpec::text("userName")];
const CREATE_USER_FIELDS: &[FieldSpec] =
    &[FieldSpec::text("userName"), FieldSpec::password("password")];

/// Static storage for the command table (initialized once).
static COMMAND_SPECS: OnceLock<Vec<CommandSpec>> = OnceLock::new();

/// Static storage for the grouped command names (initialized once).
static COMMAND_GROUPS: OnceLock<Vec<(CommandGroup, Vec<&'static str>)>> = OnceLock::new();

/// Returns every command spec in declaration order.
pub fn command_specs() -> &'static [CommandSpec] {
    COMMAND_SPECS.get_or_init(|| {
        use CommandGroup::{Database, Key, User};

        vec![
            // Database operations
            CommandSpec::new("createSpace", "Create Space", Database, SPACE_FIELDS),
            CommandSpec::new("dropSpace", "Drop Space", Database, SPACE_FIELDS),
            CommandSpec::new("infoSpace", "Info Space", Database, SPACE_FIELDS),
            CommandSpec::new("showSpaces", "Show Spaces", Database, &[]),
            CommandSpec::new("version", "Version", Database, &[]),
            // Key operations
            CommandSpec::new("createKey", "Create Key", Key, CREATE_KEY_FIELDS),
            CommandSpec::new("dropKey", "Drop Key", Key, KEY_FIELDS),
            CommandSpec::new("showKeys", "Show Keys", Key, SPACE_FIELDS),
            CommandSpec::new("infoKey", "Info Key", Key, KEY_FIELDS),
            // User operations
            CommandSpec::new("createUser", "Create User", User, CREATE_USER_FIELDS),
            CommandSpec::new("dropUser", "Drop User", User, USER_FIELDS),
            CommandSpec::new("infoUser", "Info User", User, USER_FIELDS),
            CommandSpec::new("showUsers", "Show Users", User, &[]),
        ]
    })
}

/// Finds a command spec by name.
pub fn lookup(name: &str) -> Result<&'static CommandSpec> {
    command_specs()
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| KasaneError::not_found("command", name))
}

/// Returns command names grouped for display, Database then Key then User.
pub fn list_groups() -> &'static [(CommandGroup, Vec<&'static str>)] {
    COMMAND_GROUPS.get_or_init(|| {
        [CommandGroup::Database, CommandGroup::Key, CommandGroup::User]
            .into_iter()
            .map(|group| {
                let names = command_specs()
                    .iter()
                    .filter(|spec| spec.group == group)
                    .map(|spec| spec.name)
                    .collect();
                (group, names)
            })
            .collect()
    })
}
