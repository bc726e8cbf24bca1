pub mod command;
pub mod config;
pub mod error;
pub mod form;
pub mod payload;
pub mod queue;
pub mod schema;
pub mod session;

// Re-export common types
pub use command::ComposedCommand;
pub use config::ConsoleConfig;
pub use error::{KasaneError, Result};
pub use form::CommandForm;
pub use payload::{ExecutePayload, LoginPayload};
pub use queue::CommandQueue;
pub use session::{Session, UserRecord};
