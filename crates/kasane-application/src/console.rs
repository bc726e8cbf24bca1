use chrono::{DateTime, Utc};
use kasane_client::{DispatchResult, Dispatcher, LoginOutcome, Operation, login_error_text};
use kasane_core::schema::CommandSpec;
use kasane_core::{
    CommandForm, CommandQueue, ComposedCommand, ExecutePayload, KasaneError, Result, Session,
    UserRecord,
};

/// The logged-in session together with who holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSession {
    pub session: Session,
    pub user: UserRecord,
    pub logged_in_at: DateTime<Utc>,
}

/// A login that has been started but not applied yet.
pub struct PendingLogin {
    dispatcher: Dispatcher,
    server_url: String,
    username: String,
    password: String,
    epoch: u64,
}

impl PendingLogin {
    pub async fn run(self) -> CompletedLogin {
        let result = self
            .dispatcher
            .login(&self.server_url, &self.username, &self.password)
            .await;
        CompletedLogin {
            result,
            epoch: self.epoch,
        }
    }
}

/// Result of [`PendingLogin::run`], to be handed back to
/// [`ConsoleController::finish_login`].
#[derive(Debug, Clone)]
pub struct CompletedLogin {
    pub result: Result<LoginOutcome>,
    epoch: u64,
}

/// An execute that has been started but not applied yet.
///
/// Owns its own copy of the batch, so edits to the queue made while the
/// request is in flight do not change what is sent.
pub struct PendingExecute {
    dispatcher: Dispatcher,
    server_url: String,
    request_json: String,
    epoch: u64,
}

impl PendingExecute {
    /// The request body that will be transmitted.
    pub fn request_json(&self) -> &str {
        &self.request_json
    }

    /// Performs the dispatch. Does not touch the controller.
    pub async fn run(self) -> CompletedExecute {
        let result = self
            .dispatcher
            .dispatch(&self.server_url, Operation::Execute, &self.request_json)
            .await;
        CompletedExecute {
            result,
            epoch: self.epoch,
        }
    }
}

/// Result of [`PendingExecute::run`], to be handed back to
/// [`ConsoleController::finish_execute`].
#[derive(Debug, Clone)]
pub struct CompletedExecute {
    pub result: DispatchResult,
    epoch: u64,
}

/// Owner of all console state.
///
/// Front ends call these methods in response to operator input, one at a
/// time, and read the accessors to draw the screen.
pub struct ConsoleController {
    dispatcher: Dispatcher,
    active: Option<ActiveSession>,
    form: CommandForm,
    queue: CommandQueue,
    request_json: String,
    response_json: String,
    error: Option<String>,
    login_pending: bool,
    execute_pending: bool,
    /// Bumped on logout so results of abandoned requests are discarded
    epoch: u64,
}

impl ConsoleController {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            active: None,
            form: CommandForm::new(),
            queue: CommandQueue::new(),
            request_json: String::new(),
            response_json: String::new(),
            error: None,
            login_pending: false,
            execute_pending: false,
            epoch: 0,
        }
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn active_session(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.active.is_some()
    }

    pub fn form(&self) -> &CommandForm {
        &self.form
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    pub fn request_json(&self) -> &str {
        &self.request_json
    }

    pub fn response_json(&self) -> &str {
        &self.response_json
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_logging_in(&self) -> bool {
        self.login_pending
    }

    pub fn is_executing(&self) -> bool {
        self.execute_pending
    }

    // ============================================================================
    // Session
    // ============================================================================

    /// Starts a login.
    ///
    /// Refused while a session is active (log out first) or while another
    /// login is in flight. A refusal leaves every piece of state untouched.
    pub fn begin_login(
        &mut self,
        server_url: &str,
        username: &str,
        password: &str,
    ) -> Result<PendingLogin> {
        if self.active.is_some() {
            return Err(KasaneError::AlreadyAuthenticated);
        }
        if self.login_pending {
            return Err(KasaneError::Busy("login"));
        }
        self.error = None;
        self.login_pending = true;

        Ok(PendingLogin {
            dispatcher: self.dispatcher.clone(),
            server_url: server_url.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            epoch: self.epoch,
        })
    }

    /// Applies a finished login, storing the session on success.
    ///
    /// On failure the error text is kept for display. A login abandoned by [`Self::logout`] is
    /// discarded and reported as [`KasaneError::NotAuthenticated`].
    pub fn finish_login(&mut self, completed: CompletedLogin) -> Result<()> {
        if completed.epoch != self.epoch {
            tracing::debug!("Discarding result of abandoned login");
            return Err(KasaneError::NotAuthenticated);
        }
        self.login_pending = false;

        match completed.result {
            Ok(outcome) => {
                self.active = Some(ActiveSession {
                    session: outcome.session,
                    user: outcome.user,
                    logged_in_at: Utc::now(),
                });
                Ok(())
            }
            Err(err) => {
                self.error = Some(login_error_text(&err));
                Err(err)
            }
        }
    }

    /// Runs a whole login: begin, dispatch, apply.
    pub async fn login(&mut self, server_url: &str, username: &str, password: &str) -> Result<()> {
        let pending = self.begin_login(server_url, username, password)?;
        let completed = pending.run().await;
        self.finish_login(completed)
    }

    /// Drops the session and everything composed under it.
    ///
    /// Requests still in flight are abandoned; their results will be ignored.
    pub fn logout(&mut self) {
        if let Some(active) = self.active.take() {
            tracing::info!(username = %active.user.username, "Logged out");
        }
        self.epoch += 1;
        self.login_pending = false;
        self.execute_pending = false;
        self.form = CommandForm::new();
        self.reset_batch();
    }

    // ============================================================================
    // Composition
    // ============================================================================

    pub fn select_command(&mut self, name: &str) -> Result<&'static CommandSpec> {
        self.form.select(name)
    }

    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> Result<()> {
        self.form.set_field(field, value)
    }

    /// Submits the form into the queue.
    pub fn add_command(&mut self) -> Result<ComposedCommand> {
        self.form.submit(&mut self.queue)
    }

    /// Removes the queued command at `index`; out of range does nothing.
    pub fn remove_command(&mut self, index: usize) -> Option<ComposedCommand> {
        self.queue.remove_at(index)
    }

    /// Empties the queue and the request/response panes.
    pub fn clear_all(&mut self) -> Result<()> {
        if self.execute_pending {
            return Err(KasaneError::Busy("execute"));
        }
        self.reset_batch();
        Ok(())
    }

    fn reset_batch(&mut self) {
        self.queue.clear();
        self.request_json.clear();
        self.response_json.clear();
        self.error = None;
    }

    // ============================================================================
    // Execution
    // ============================================================================

    /// Snapshots the queue and prepares the request.
    ///
    /// Fails without any network call when an execute is already running,
    /// nobody is logged in, or the queue is empty.
    pub fn begin_execute(&mut self) -> Result<PendingExecute> {
        if self.execute_pending {
            return Err(KasaneError::Busy("execute"));
        }
        let Some(active) = &self.active else {
            return Err(KasaneError::NotAuthenticated);
        };
        if self.queue.is_empty() {
            let err = KasaneError::EmptyQueue;
            self.error = Some(err.to_string());
            return Err(err);
        }

        let payload = ExecutePayload::new(active.session.session_id(), self.queue.snapshot());
        let request_json = payload.to_request_json()?;
        let server_url = active.user.server_url.clone();

        tracing::info!(commands = self.queue.len(), %server_url, "Executing batch");

        self.error = None;
        self.request_json = request_json.clone();
        self.execute_pending = true;

        Ok(PendingExecute {
            dispatcher: self.dispatcher.clone(),
            server_url,
            request_json,
            epoch: self.epoch,
        })
    }

    /// Applies a finished execute to the response and error panes.
    ///
    /// Returns `false` when the result belongs to an abandoned session and
    /// was discarded.
    pub fn finish_execute(&mut self, completed: CompletedExecute) -> bool {
        if completed.epoch != self.epoch {
            tracing::debug!("Discarding result of abandoned execute");
            return false;
        }
        self.execute_pending = false;

        let result = completed.result;
        self.error = result.error_text();
        self.response_json = result.response_text().to_string();
        true
    }

    /// Runs a whole execute: snapshot, dispatch, apply.
    pub async fn execute(&mut self) -> Result<DispatchResult> {
        let pending = self.begin_execute()?;
        let completed = pending.run().await;
        let result = completed.result.clone();
        self.finish_execute(completed);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kasane_client::testing::ScriptedTransport;
    use serde_json::{Value, json};
    use std::sync::Arc;

    const SERVER: &str = "http://127.0.0.1:8080";

    fn controller(transport: &Arc<ScriptedTransport>) -> ConsoleController {
        ConsoleController::new(Dispatcher::new(transport.clone(), "http://localhost:5173"))
    }

    async fn logged_in(transport: &Arc<ScriptedTransport>) -> ConsoleController {
        let mut console = controller(transport);
        console.login(SERVER, "admin", "nekocute").await.unwrap();
        console
    }

    fn add_create_space(console: &mut ConsoleController, name: &str) {
        console.select_command("createSpace").unwrap();
        console.set_field("spaceName", name).unwrap();
        console.add_command().unwrap();
    }

    #[tokio::test]
    async fn test_login_stores_session_and_user() {
        let transport = Arc::new(ScriptedTransport::new().respond(200, r#"{"session_id":"s1"}"#));
        let console = logged_in(&transport).await;

        let active = console.active_session().unwrap();
        assert_eq!(active.session.session_id(), "s1");
        assert_eq!(active.user.username, "admin");
        assert_eq!(active.user.server_url, SERVER);
        assert!(console.error().is_none());
    }

    #[tokio::test]
    async fn test_failed_login_sets_error_and_no_session() {
        let transport = Arc::new(ScriptedTransport::new().respond(401, "bad password"));
        let mut console = controller(&transport);

        assert!(console.login(SERVER, "admin", "x").await.is_err());
        assert!(!console.is_logged_in());
        assert_eq!(console.error(), Some("bad password"));
    }

    #[tokio::test]
    async fn test_second_login_refused_while_pending() {
        let transport = Arc::new(ScriptedTransport::new().respond(200, r#"{"session_id":"s2"}"#));
        let mut console = controller(&transport);

        let pending = console.begin_login(SERVER, "admin", "pw").unwrap();
        assert!(console.is_logging_in());
        assert_eq!(
            console.begin_login(SERVER, "admin", "pw").err(),
            Some(KasaneError::Busy("login"))
        );

        console.finish_login(pending.run().await).unwrap();
        assert!(!console.is_logging_in());
        assert_eq!(console.active_session().unwrap().session.session_id(), "s2");
    }

    #[tokio::test]
    async fn test_login_refused_while_session_active() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, r#"{"session_id":"alice-session"}"#)
                .respond(200, r#"{"spaces":["alice-private"]}"#)
                .respond(200, r#"{"session_id":"bob-session"}"#),
        );
        let mut console = controller(&transport);
        console.login(SERVER, "alice", "pw").await.unwrap();
        add_create_space(&mut console, "alice-private");
        let pending = console.begin_execute().unwrap();

        assert_eq!(
            console.login(SERVER, "bob", "pw").await,
            Err(KasaneError::AlreadyAuthenticated)
        );
        assert!(!console.is_logging_in());
        // no login request went out for bob
        assert_eq!(transport.requests().len(), 1);

        assert!(console.finish_execute(pending.run().await));
        let active = console.active_session().unwrap();
        assert_eq!(active.user.username, "alice");
        assert_eq!(active.session.session_id(), "alice-session");
        assert_eq!(console.queue().len(), 1);
        assert!(console.response_json().contains("alice-private"));
        assert!(transport.requests()[1].body.contains("alice-session"));

        // after logout the next operator starts from a clean console
        console.logout();
        console.login(SERVER, "bob", "pw").await.unwrap();
        assert_eq!(console.active_session().unwrap().user.username, "bob");
        assert!(console.queue().is_empty());
        assert_eq!(console.response_json(), "");
    }

    #[tokio::test]
    async fn test_execute_version_batch() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, r#"{"session_id":"s1"}"#)
                .respond(200, r#"{"version":"1.0.0"}"#),
        );
        let mut console = logged_in(&transport).await;
        console.select_command("version").unwrap();
        console.add_command().unwrap();

        let result = console.execute().await.unwrap();
        assert!(result.is_success());

        assert_eq!(
            console.request_json(),
            "{\n  \"session\": \"s1\",\n  \"command\": [\n    \"version\"\n  ]\n}"
        );
        assert_eq!(transport.requests()[1].body, console.request_json());
        assert_eq!(console.response_json(), "{\n  \"version\": \"1.0.0\"\n}");
        assert!(console.error().is_none());
        // the queue survives a successful execute
        assert_eq!(console.queue().len(), 1);
        assert!(!console.is_executing());
    }

    #[tokio::test]
    async fn test_execute_empty_queue_makes_no_request() {
        let transport = Arc::new(ScriptedTransport::new().respond(200, r#"{"session_id":"s1"}"#));
        let mut console = logged_in(&transport).await;

        let err = console.execute().await.unwrap_err();
        assert_eq!(err, KasaneError::EmptyQueue);
        assert_eq!(console.error(), Some("Please add at least one command"));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_execute_requires_login() {
        let transport = Arc::new(ScriptedTransport::new());
        let mut console = controller(&transport);
        console.select_command("version").unwrap();
        console.add_command().unwrap();

        assert_eq!(
            console.begin_execute().err(),
            Some(KasaneError::NotAuthenticated)
        );
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_in_flight_payload_ignores_later_queue_edits() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, r#"{"session_id":"s1"}"#)
                .respond(200, "ok"),
        );
        let mut console = logged_in(&transport).await;
        add_create_space(&mut console, "first");

        let pending = console.begin_execute().unwrap();
        add_create_space(&mut console, "second");
        console.remove_command(0);

        // a second execute is refused while the first is in flight
        assert_eq!(
            console.begin_execute().err(),
            Some(KasaneError::Busy("execute"))
        );
        assert_eq!(console.clear_all(), Err(KasaneError::Busy("execute")));

        let completed = pending.run().await;
        assert!(console.finish_execute(completed));

        let sent: Value = serde_json::from_str(&transport.requests()[1].body).unwrap();
        assert_eq!(
            sent,
            json!({"session": "s1", "command": [{"createSpace": {"spaceName": "first"}}]})
        );
        assert_eq!(console.response_json(), "ok");
        assert_eq!(console.queue().snapshot()[0].param("spaceName"), Some("second"));
    }

    #[tokio::test]
    async fn test_http_error_keeps_queue_and_shows_status() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, r#"{"session_id":"s1"}"#)
                .respond(500, "internal error"),
        );
        let mut console = logged_in(&transport).await;
        add_create_space(&mut console, "s");

        let result = console.execute().await.unwrap();
        assert_eq!(
            result,
            DispatchResult::HttpError {
                status: 500,
                body: "internal error".to_string()
            }
        );
        assert_eq!(console.error(), Some("HTTP 500: internal error"));
        assert_eq!(console.response_json(), "internal error");
        assert_eq!(console.queue().len(), 1);
        assert!(console.is_logged_in());
    }

    #[tokio::test]
    async fn test_network_error_clears_response() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, r#"{"session_id":"s1"}"#)
                .respond(200, "previous")
                .fail("connection refused")
                .fail("proxy down"),
        );
        let mut console = logged_in(&transport).await;
        add_create_space(&mut console, "s");
        console.execute().await.unwrap();
        assert_eq!(console.response_json(), "previous");

        console.execute().await.unwrap();
        assert_eq!(console.error(), Some("Network error: connection refused"));
        assert_eq!(console.response_json(), "");
    }

    #[tokio::test]
    async fn test_logout_discards_in_flight_result() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, r#"{"session_id":"s1"}"#)
                .respond(200, "late"),
        );
        let mut console = logged_in(&transport).await;
        add_create_space(&mut console, "s");

        let pending = console.begin_execute().unwrap();
        console.logout();
        let completed = pending.run().await;

        assert!(!console.finish_execute(completed));
        assert!(!console.is_logged_in());
        assert!(console.queue().is_empty());
        assert_eq!(console.response_json(), "");
        assert_eq!(console.request_json(), "");
    }

    #[tokio::test]
    async fn test_clear_all_resets_panes() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, r#"{"session_id":"s1"}"#)
                .respond(200, "[]"),
        );
        let mut console = logged_in(&transport).await;
        add_create_space(&mut console, "s");
        console.execute().await.unwrap();

        console.clear_all().unwrap();
        assert!(console.queue().is_empty());
        assert_eq!(console.request_json(), "");
        assert_eq!(console.response_json(), "");
        assert!(console.error().is_none());
        assert!(console.is_logged_in());
    }
}
