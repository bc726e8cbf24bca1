//! Network side of the Kasane console.
//!
//! - [`transport`]: the HTTP seam and its `reqwest` implementation
//! - [`endpoint`]: URL rules for primary and proxy attempts
//! - [`dispatcher`]: connect-then-fallback dispatch and result classification
//! - [`auth`]: the login handshake

pub mod auth;
pub mod dispatcher;
pub mod endpoint;
pub mod transport;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use auth::{LoginOutcome, login_error_text};
pub use dispatcher::{DispatchResult, Dispatcher, classify};
pub use endpoint::Operation;
pub use transport::{HttpTransport, RawResponse, Transport, TransportError};
