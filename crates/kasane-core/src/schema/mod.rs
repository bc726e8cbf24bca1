//! Command schema registry.
//!
//! A static, declarative table describing every administrative command the
//! console can compose: its label, its group and the fields it takes.

pub mod builtin;
pub mod model;

pub use builtin::{command_specs, list_groups, lookup};
pub use model::{CommandGroup, CommandSpec, FieldKind, FieldSpec};
