//! Application layer for the Kasane console.
//!
//! [`ConsoleController`] coordinates the domain types from `kasane-core`
//! with the dispatcher from `kasane-client` and holds every piece of state a
//! front end displays.

pub mod console;

pub use console::{
    ActiveSession, CompletedExecute, CompletedLogin, ConsoleController, PendingExecute,
    PendingLogin,
};
