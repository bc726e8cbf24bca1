//! Parsing of console input lines.

/// Every verb the console understands, in the order `help` lists them.
pub const VERBS: &[&str] = &[
    "login", "logout", "whoami", "commands", "select", "fields", "set", "add", "queue", "remove",
    "clear", "execute", "request", "response", "help", "quit", "exit",
];

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Login { server_url: Option<String> },
    Logout,
    WhoAmI,
    Commands,
    Select { command: String },
    Fields,
    Set { field: String, value: String },
    Add,
    Queue,
    Remove { index: usize },
    Clear,
    Execute,
    Request,
    Response,
    Help,
    Quit,
}

impl Verb {
    /// Parses a trimmed, non-empty line.
    ///
    /// On failure returns the usage message to show.
    pub fn parse(line: &str) -> Result<Self, String> {
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        let verb = match head {
            "login" => Verb::Login {
                server_url: (!rest.is_empty()).then(|| rest.to_string()),
            },
            "logout" => Verb::Logout,
            "whoami" => Verb::WhoAmI,
            "commands" => Verb::Commands,
            "select" if !rest.is_empty() => Verb::Select {
                command: rest.to_string(),
            },
            "select" => return Err("Usage: select <command>".to_string()),
            "fields" => Verb::Fields,
            "set" => {
                let (field, value) = match rest.split_once(char::is_whitespace) {
                    Some((field, value)) => (field, value.trim_start()),
                    None => (rest, ""),
                };
                if field.is_empty() {
                    return Err("Usage: set <field> <value...>".to_string());
                }
                Verb::Set {
                    field: field.to_string(),
                    value: value.to_string(),
                }
            }
            "add" => Verb::Add,
            "queue" => Verb::Queue,
            "remove" => match rest.parse() {
                Ok(index) => Verb::Remove { index },
                Err(_) => return Err("Usage: remove <index>".to_string()),
            },
            "clear" => Verb::Clear,
            "execute" => Verb::Execute,
            "request" => Verb::Request,
            "response" => Verb::Response,
            "help" => Verb::Help,
            "quit" | "exit" => Verb::Quit,
            other => return Err(format!("Unknown command: {}. Type 'help'.", other)),
        };
        Ok(verb)
    }
}
