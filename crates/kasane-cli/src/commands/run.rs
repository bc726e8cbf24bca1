use anyhow::{Context, Result, bail};
use clap::Args;

use kasane_application::ConsoleController;
use kasane_client::Dispatcher;
use kasane_core::ConsoleConfig;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Kasane API base URL (defaults to the configured server)
    #[arg(long)]
    pub server_url: Option<String>,

    #[arg(long)]
    pub username: String,

    #[arg(long, env = "KASANE_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Command to queue, as NAME or NAME:field=value,field=value
    #[arg(long = "command", short = 'c', required = true)]
    pub commands: Vec<String>,
}

/// A `--command` argument split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArg {
    pub name: String,
    pub values: Vec<(String, String)>,
}

/// Parses `NAME` or `NAME:field=value,...`.
pub fn parse_command_arg(arg: &str) -> Result<CommandArg> {
    let (name, rest) = match arg.split_once(':') {
        Some((name, rest)) => (name.trim(), Some(rest)),
        None => (arg.trim(), None),
    };
    if name.is_empty() {
        bail!("Missing command name in '{}'", arg);
    }

    let mut values = Vec::new();
    for pair in rest.into_iter().flat_map(|rest| rest.split(',')) {
        if pair.trim().is_empty() {
            continue;
        }
        let (field, value) = pair
            .split_once('=')
            .with_context(|| format!("Expected field=value, got '{}'", pair))?;
        values.push((field.trim().to_string(), value.to_string()));
    }

    Ok(CommandArg {
        name: name.to_string(),
        values,
    })
}

/// Queues every command through the form so the same validation applies as
/// in the interactive console.
pub fn queue_commands(console: &mut ConsoleController, args: &[String]) -> Result<()> {
    for arg in args {
        let parsed = parse_command_arg(arg)?;
        console.select_command(&parsed.name)?;
        for (field, value) in parsed.values {
            console.set_field(&field, value)?;
        }
        console
            .add_command()
            .with_context(|| format!("Invalid command '{}'", arg))?;
    }
    Ok(())
}

pub async fn run(args: RunArgs, config: &ConsoleConfig) -> Result<()> {
    let server_url = args
        .server_url
        .clone()
        .unwrap_or_else(|| config.server_url.clone());

    let mut console = ConsoleController::new(Dispatcher::from_config(config));
    queue_commands(&mut console, &args.commands)?;

    if let Err(err) = console
        .login(&server_url, &args.username, &args.password)
        .await
    {
        let message = console.error().unwrap_or("Login failed").to_string();
        return Err(err).context(message);
    }

    tracing::info!(username = %args.username, %server_url, "Logged in");

    let result = console.execute().await?;
    match result.error_text() {
        Some(error) => tracing::warn!(%error, "Execute failed"),
        None => tracing::info!(commands = console.queue().len(), "Execute succeeded"),
    }

    println!("{}", console.request_json());
    if !result.response_text().is_empty() {
        println!("{}", result.response_text());
    }
    if let Some(error) = result.error_text() {
        bail!(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use kasane_client::HttpTransport;
    use kasane_core::KasaneError;

    fn console() -> ConsoleController {
        ConsoleController::new(Dispatcher::new(
            Arc::new(HttpTransport::new()),
            "http://localhost:5173",
        ))
    }

    #[test]
    fn test_parse_bare_command() {
        let parsed = parse_command_arg("version").unwrap();
        assert_eq!(parsed.name, "version");
        assert!(parsed.values.is_empty());
    }

    #[test]
    fn test_parse_command_with_values() {
        let parsed = parse_command_arg("createKey:spaceName=s,keyName=k,keyType=INT").unwrap();
        assert_eq!(parsed.name, "createKey");
        assert_eq!(
            parsed.values,
            vec![
                ("spaceName".to_string(), "s".to_string()),
                ("keyName".to_string(), "k".to_string()),
                ("keyType".to_string(), "INT".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_malformed_pairs() {
        assert!(parse_command_arg(":spaceName=s").is_err());
        assert!(parse_command_arg("createSpace:spaceName").is_err());
    }

    #[test]
    fn test_queue_commands_in_order() {
        let mut console = console();
        queue_commands(
            &mut console,
            &["createSpace:spaceName=a".to_string(), "showSpaces".to_string()],
        )
        .unwrap();

        let queued = console.queue().snapshot();
        assert_eq!(queued.len(), 2);
        assert_eq!(queued[0].param("spaceName"), Some("a"));
        assert_eq!(queued[1].name(), "showSpaces");
    }

    #[test]
    fn test_queue_commands_applies_form_validation() {
        let mut console = console();
        let err = queue_commands(&mut console, &["dropKey:spaceName=s".to_string()]).unwrap_err();
        assert_eq!(
            err.root_cause().downcast_ref::<KasaneError>(),
            Some(&KasaneError::required_field("keyName"))
        );

        let err = queue_commands(&mut console, &["frobnicate".to_string()]).unwrap_err();
        assert!(err.downcast_ref::<KasaneError>().unwrap().is_not_found());
    }
}
