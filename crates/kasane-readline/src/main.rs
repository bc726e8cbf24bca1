use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use tokio::sync::{Mutex, mpsc};

use kasane_application::{CompletedExecute, ConsoleController};
use kasane_client::Dispatcher;
use kasane_core::{ConsoleConfig, KasaneError};
use kasane_infrastructure::logging::init_file_logging;
use kasane_infrastructure::{ConfigService, KasanePaths};

mod helper;
mod verb;
mod view;

use helper::{CliHelper, MaskingHelper};
use verb::Verb;

type SharedConsole = Arc<Mutex<ConsoleController>>;

/// Entry point for the interactive Kasane console.
///
/// Sets up a rustyline REPL over a [`ConsoleController`]. Executes run in
/// background tasks and report back through an mpsc channel to a response
/// handler, so the prompt stays usable while a batch is in flight.
#[tokio::main]
async fn main() -> Result<()> {
    // ===== Configuration & logging =====
    let config = ConfigService::new_default()?.load()?;
    let _log_guard = match KasanePaths::logs_dir() {
        Ok(dir) => init_file_logging(&dir, "kasane-console.log", &config.log_level).ok(),
        Err(_) => None,
    };
    tracing::info!(server_url = %config.server_url, "Kasane console starting");

    let console: SharedConsole = Arc::new(Mutex::new(ConsoleController::new(
        Dispatcher::from_config(&config),
    )));

    // Results of background executes
    let (response_tx, mut response_rx) = mpsc::channel::<CompletedExecute>(8);

    let handler_console = Arc::clone(&console);
    let response_handler = tokio::spawn(async move {
        while let Some(completed) = response_rx.recv().await {
            let result = completed.result.clone();
            let applied = handler_console.lock().await.finish_execute(completed);
            if applied {
                view::print_dispatch_result(&result);
            }
        }
    });

    // ===== REPL Setup =====
    let rl_config = Config::builder()
        .max_history_size(config.history_size)?
        .auto_add_history(false)
        .build();
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::with_config(rl_config)?;
    rl.set_helper(Some(CliHelper::new()));

    let history_file = KasanePaths::history_file().ok();
    if let Some(path) = &history_file {
        let _ = rl.load_history(path);
    }

    view::print_banner();

    // ===== Main REPL Loop =====
    loop {
        let prompt = prompt(&console).await;
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let verb = match Verb::parse(trimmed) {
                    Ok(verb) => verb,
                    Err(usage) => {
                        view::print_error(&usage);
                        continue;
                    }
                };
                if verb == Verb::Quit {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                handle_verb(verb, &console, &config, &response_tx).await;
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                view::print_error(&format!("Error: {:?}", err));
                break;
            }
        }
    }

    if let Some(path) = &history_file {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(err) = rl.save_history(path) {
            tracing::warn!(error = %err, "Failed to save history");
        }
    }

    // Drop the sender to let the response handler finish
    drop(response_tx);
    let _ = response_handler.await;

    Ok(())
}

async fn prompt(console: &SharedConsole) -> String {
    let console = console.lock().await;
    let user = console
        .active_session()
        .map(|active| active.user.username.clone());
    let command = console.form().selected().map(|spec| spec.name);

    let mut prompt = user.unwrap_or_else(|| "kasane".to_string());
    if let Some(command) = command {
        prompt.push(':');
        prompt.push_str(command);
    }
    if console.is_executing() {
        prompt.push_str(" (executing)");
    }
    prompt.push_str(">> ");
    prompt
}

async fn handle_verb(
    verb: Verb,
    console: &SharedConsole,
    config: &ConsoleConfig,
    response_tx: &mpsc::Sender<CompletedExecute>,
) {
    match verb {
        Verb::Login { server_url } => {
            let server_url = server_url.unwrap_or_else(|| config.server_url.clone());
            login(console, &server_url).await;
        }
        Verb::Logout => {
            console.lock().await.logout();
            view::print_info("Logged out");
        }
        Verb::WhoAmI => view::print_whoami(&*console.lock().await),
        Verb::Commands => view::print_commands(),
        Verb::Select { command } => {
            let mut console = console.lock().await;
            match console.select_command(&command) {
                Ok(_) => view::print_fields(&console),
                Err(err) => view::print_error(&err.to_string()),
            }
        }
        Verb::Fields => view::print_fields(&*console.lock().await),
        Verb::Set { field, value } => {
            if let Err(err) = console.lock().await.set_field(&field, value) {
                view::print_error(&err.to_string());
            }
        }
        Verb::Add => {
            let mut console = console.lock().await;
            match console.add_command() {
                Ok(command) => view::print_info(&format!(
                    "Added {} ({} queued)",
                    command.name(),
                    console.queue().len()
                )),
                Err(err) => view::print_error(&err.to_string()),
            }
        }
        Verb::Queue => view::print_queue(&*console.lock().await),
        Verb::Remove { index } => match console.lock().await.remove_command(index) {
            Some(command) => view::print_info(&format!("Removed {}", command.name())),
            None => view::print_info("Nothing at that index"),
        },
        Verb::Clear => {
            if let Err(err) = console.lock().await.clear_all() {
                view::print_error(&err.to_string());
            }
        }
        Verb::Execute => execute(console, response_tx).await,
        Verb::Request => view::print_request(&*console.lock().await),
        Verb::Response => view::print_response(&*console.lock().await),
        Verb::Help => view::print_help(),
        Verb::Quit => {}
    }
}

/// Prompts for credentials and logs in. The lock is not held while the
/// request is in flight.
async fn login(console: &SharedConsole, server_url: &str) {
    if console.lock().await.is_logged_in() {
        view::print_error(&KasaneError::AlreadyAuthenticated.to_string());
        return;
    }

    let Some((username, password)) = read_credentials() else {
        view::print_info("Login cancelled");
        return;
    };

    let pending = match console
        .lock()
        .await
        .begin_login(server_url, &username, &password)
    {
        Ok(pending) => pending,
        Err(err) => {
            view::print_error(&err.to_string());
            return;
        }
    };

    view::print_info(&format!("Logging in to {}...", server_url));
    let completed = pending.run().await;

    let mut console = console.lock().await;
    match console.finish_login(completed) {
        Ok(()) => println!("{}", format!("Logged in as {}", username).bright_green()),
        Err(_) => view::print_error(console.error().unwrap_or("Login failed")),
    }
}

fn read_credentials() -> Option<(String, String)> {
    let mut plain: Editor<(), DefaultHistory> = Editor::new().ok()?;
    let username = plain.readline("username: ").ok()?.trim().to_string();

    let mut masked: Editor<MaskingHelper, DefaultHistory> = Editor::new().ok()?;
    masked.set_helper(Some(MaskingHelper));
    let password = masked.readline("password: ").ok()?;

    Some((username, password))
}

/// Starts an execute in the background; the response handler prints the
/// outcome when it arrives.
async fn execute(console: &SharedConsole, response_tx: &mpsc::Sender<CompletedExecute>) {
    let pending = match console.lock().await.begin_execute() {
        Ok(pending) => pending,
        Err(err) => {
            view::print_error(&err.to_string());
            return;
        }
    };

    println!("{}", pending.request_json().bright_black());

    let tx = response_tx.clone();
    tokio::spawn(async move {
        let completed = pending.run().await;
        if tx.send(completed).await.is_err() {
            tracing::warn!("Console closed before execute finished");
        }
    });
}
