//! Login handshake.
//!
//! Uses the same connect-then-fallback path as execute. A 2xx body is the
//! session and is kept exactly as received.

use kasane_core::{KasaneError, LoginPayload, Result, Session, UserRecord};

use crate::dispatcher::Dispatcher;
use crate::endpoint::Operation;

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub session: Session,
    pub user: UserRecord,
}

impl Dispatcher {
    /// Logs in to `server_url`.
    ///
    /// Errors: [`KasaneError::Network`] when no response could be obtained,
    /// [`KasaneError::Http`] for a non-2xx answer, [`KasaneError::Session`]
    /// when a 2xx body is not a usable session.
    pub async fn login(
        &self,
        server_url: &str,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome> {
        let body = LoginPayload { username, password }.to_json()?;

        let response = self
            .send(server_url, Operation::Login, &body)
            .await
            .map_err(|e| KasaneError::network(e.message()))?;

        if !response.is_success() {
            tracing::warn!(status = response.status, "Login rejected");
            return Err(KasaneError::Http {
                status: response.status,
                body: response.body,
            });
        }

        let session = Session::from_body(&response.body)?;
        tracing::info!(%username, %server_url, "Logged in");

        Ok(LoginOutcome {
            session,
            user: UserRecord {
                username: username.to_string(),
                server_url: server_url.to_string(),
            },
        })
    }
}

/// Text shown to the operator when login fails.
///
/// A rejected login shows the server's body verbatim, or `Login failed`
/// when the body is empty.
pub fn login_error_text(error: &KasaneError) -> String {
    match error {
        KasaneError::Http { body, .. } if body.is_empty() => "Login failed".to_string(),
        KasaneError::Http { body, .. } => body.clone(),
        other => other.to_string(),
    }
}
