//! Terminal rendering of console state.

use colored::Colorize;

use kasane_application::ConsoleController;
use kasane_client::DispatchResult;
use kasane_core::form::FieldView;
use kasane_core::schema::{FieldKind, list_groups, lookup};

pub fn print_banner() {
    println!("{}", "=== Kasane Console ===".bright_magenta().bold());
    println!(
        "{}",
        "Type 'login' to connect, 'help' for all commands, or 'quit' to exit.".bright_black()
    );
    println!();
}

pub fn print_help() {
    let rows = [
        ("login [server_url]", "Log in (prompts for username and password)"),
        ("logout", "Drop the session, queue and results"),
        ("whoami", "Show the logged-in user"),
        ("commands", "List available commands by group"),
        ("select <command>", "Choose the command to compose"),
        ("fields", "Show the fields of the selected command"),
        ("set <field> <value...>", "Set a field value"),
        ("add", "Add the composed command to the queue"),
        ("queue", "Show queued commands"),
        ("remove <index>", "Remove a queued command"),
        ("clear", "Empty the queue, request and response"),
        ("execute", "Send the queue to the server"),
        ("request", "Show the last request JSON"),
        ("response", "Show the last response"),
        ("quit | exit", "Leave the console"),
    ];
    for (usage, text) in rows {
        println!("  {:<26}{}", usage.bright_cyan(), text);
    }
}

pub fn print_error(message: &str) {
    eprintln!("{}", message.red());
}

pub fn print_info(message: &str) {
    println!("{}", message.bright_black());
}

pub fn print_commands() {
    for (group, names) in list_groups() {
        println!("{}", group.label().bright_yellow().bold());
        for name in names {
            let label = lookup(name).map(|spec| spec.label).unwrap_or_default();
            println!("  {:<14}{}", name.bright_cyan(), label.bright_black());
        }
    }
}

pub fn print_whoami(console: &ConsoleController) {
    match console.active_session() {
        Some(active) => println!(
            "{} @ {} {}",
            active.user.username.bright_green(),
            active.user.server_url,
            format!(
                "(since {})",
                active.logged_in_at.format("%Y-%m-%d %H:%M:%S UTC")
            )
            .bright_black()
        ),
        None => print_info("Not logged in"),
    }
}

pub fn print_fields(console: &ConsoleController) {
    let Some(spec) = console.form().selected() else {
        print_info("No command selected");
        return;
    };
    println!("{}", spec.label.bright_yellow().bold());
    let fields = console.form().render_fields();
    if fields.is_empty() {
        print_info("  No parameters. Type 'add' to queue it.");
    }
    for field in &fields {
        println!("  {}", describe_field(field));
    }
}

fn describe_field(field: &FieldView) -> String {
    let value = match (field.kind, field.value.is_empty()) {
        (_, true) => field.placeholder.bright_black().to_string(),
        (FieldKind::Password, false) => "*".repeat(field.value.chars().count()),
        (_, false) => field.value.green().to_string(),
    };
    let marker = if field.required { "*" } else { " " };
    let mut line = format!("{}{:<12} {}", marker.red(), field.name, value);

    if field.kind == FieldKind::Select {
        // first entry is the unselected one
        let choices: Vec<&str> = field
            .options
            .iter()
            .skip(1)
            .map(|option| option.label.as_str())
            .collect();
        line.push_str(&format!("  [{}]", choices.join("|")).bright_black().to_string());
    }
    line
}

pub fn print_queue(console: &ConsoleController) {
    if console.queue().is_empty() {
        print_info("Queue is empty");
        return;
    }
    match console.queue().render() {
        Ok(entries) => {
            for (index, entry) in entries.iter().enumerate() {
                println!("{}", format!("[{}]", index).bright_yellow());
                println!("{}", entry);
            }
        }
        Err(err) => print_error(&err.to_string()),
    }
}

pub fn print_request(console: &ConsoleController) {
    if console.request_json().is_empty() {
        print_info("No request sent yet");
    } else {
        println!("{}", console.request_json());
    }
}

pub fn print_response(console: &ConsoleController) {
    if let Some(error) = console.error() {
        print_error(error);
    }
    if console.response_json().is_empty() {
        print_info("No response");
    } else {
        println!("{}", console.response_json().bright_blue());
    }
}

pub fn print_dispatch_result(result: &DispatchResult) {
    if let Some(error) = result.error_text() {
        print_error(&error);
    } else {
        println!("{}", "Execute succeeded".bright_green());
    }
    let text = result.response_text();
    if !text.is_empty() {
        for line in text.lines() {
            println!("{}", line.bright_blue());
        }
    }
}
