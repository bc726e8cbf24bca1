//! Connect-then-fallback dispatch.
//!
//! Every request first goes to the configured server. When that attempt
//! fails before any response arrives and the server is one of the two
//! well-known local forms, the same request is sent once more through the
//! local `/api` proxy. HTTP error statuses are never retried.

use std::sync::Arc;
use std::time::Duration;

use kasane_core::ConsoleConfig;
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::endpoint::{Operation, fallback_url, is_fallback_eligible, primary_url};
use crate::transport::{HttpTransport, RawResponse, Transport, TransportError};

/// Classified result of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    /// 2xx; the body re-pretty-printed if it was JSON, verbatim otherwise
    Success(String),
    /// non-2xx; the body verbatim
    HttpError { status: u16, body: String },
    /// no response on any applicable path
    NetworkError(String),
}

impl DispatchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Text for the response pane: the body when there is one.
    pub fn response_text(&self) -> &str {
        match self {
            Self::Success(body) | Self::HttpError { body, .. } => body,
            Self::NetworkError(_) => "",
        }
    }

    /// Text for the error line, `None` on success.
    pub fn error_text(&self) -> Option<String> {
        match self {
            Self::Success(_) => None,
            Self::HttpError { status, body } => Some(format!("HTTP {}: {}", status, body)),
            Self::NetworkError(message) => Some(format!("Network error: {}", message)),
        }
    }
}

enum Stage {
    AttemptingPrimary {
        url: String,
    },
    AttemptingFallback {
        url: String,
        primary_error: TransportError,
    },
    Resolved(Result<RawResponse, TransportError>),
}

/// Sends requests with the connect-then-fallback strategy.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    proxy_origin: String,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, proxy_origin: impl Into<String>) -> Self {
        Self {
            transport,
            proxy_origin: proxy_origin.into(),
        }
    }

    /// Dispatcher over a `reqwest` transport configured from `config`.
    pub fn from_config(config: &ConsoleConfig) -> Self {
        let transport = HttpTransport::new()
            .with_timeout(config.request_timeout_secs.map(Duration::from_secs));
        Self::new(Arc::new(transport), config.proxy_origin.clone())
    }

    /// Posts `body` for `operation`, falling back to the proxy at most once.
    ///
    /// When both attempts fail before a response, the primary failure is
    /// returned.
    pub async fn send(
        &self,
        server_url: &str,
        operation: Operation,
        body: &str,
    ) -> Result<RawResponse, TransportError> {
        let span = tracing::info_span!(
            "dispatch",
            dispatch_id = %Uuid::new_v4(),
            operation = operation.as_str(),
            %server_url,
        );

        async {
            let mut stage = Stage::AttemptingPrimary {
                url: primary_url(server_url, operation),
            };

            loop {
                stage = match stage {
                    Stage::AttemptingPrimary { url } => {
                        tracing::debug!(%url, "POST");
                        match self.transport.post_json(&url, body).await {
                            Err(error @ TransportError::Send(_))
                                if is_fallback_eligible(server_url) =>
                            {
                                tracing::warn!(
                                    %url,
                                    %error,
                                    "Direct connection failed, trying proxy"
                                );
                                Stage::AttemptingFallback {
                                    url: fallback_url(&self.proxy_origin, operation),
                                    primary_error: error,
                                }
                            }
                            outcome => Stage::Resolved(outcome),
                        }
                    }
                    Stage::AttemptingFallback { url, primary_error } => {
                        tracing::debug!(%url, "POST via proxy");
                        match self.transport.post_json(&url, body).await {
                            Err(TransportError::Send(error)) => {
                                tracing::warn!(%url, %error, "Proxy connection failed");
                                Stage::Resolved(Err(primary_error))
                            }
                            outcome => Stage::Resolved(outcome),
                        }
                    }
                    Stage::Resolved(outcome) => {
                        match &outcome {
                            Ok(response) => {
                                tracing::info!(status = response.status, "Response received")
                            }
                            Err(error) => tracing::warn!(%error, "No response"),
                        }
                        return outcome;
                    }
                };
            }
        }
        .instrument(span)
        .await
    }

    /// Sends `body` and classifies the outcome.
    pub async fn dispatch(
        &self,
        server_url: &str,
        operation: Operation,
        body: &str,
    ) -> DispatchResult {
        match self.send(server_url, operation, body).await {
            Ok(response) => classify(response),
            Err(error) => DispatchResult::NetworkError(error.message().to_string()),
        }
    }
}

/// Turns a response into a [`DispatchResult`].
///
/// Error bodies are never parsed. Success bodies are pretty-printed when
/// they are JSON and passed through untouched otherwise.
pub fn classify(response: RawResponse) -> DispatchResult {
    if !response.is_success() {
        return DispatchResult::HttpError {
            status: response.status,
            body: response.body,
        };
    }

    match serde_json::from_str::<Value>(&response.body)
        .and_then(|value| serde_json::to_string_pretty(&value))
    {
        Ok(pretty) => DispatchResult::Success(pretty),
        Err(_) => DispatchResult::Success(response.body),
    }
}
