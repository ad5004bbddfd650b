//! Terminal commands exposed at the chat prompt.
//!
//! Plain text is sent to the assistant; lines starting with `/` are
//! session commands (`/clear`, `/temperature`, `/stats`, `/help`, `/quit`).

pub mod chat;
pub mod session;
pub mod settings;

use crate::agent_core::Orchestrator;

/// Shown for `/help`.
pub const HELP_TEXT: &str = "\
Commands:
  /clear              Clear chat history
  /temperature [v]    Show or set the temperature (0.0 to 1.0)
  /stats              Show chat statistics
  /help               Show this help
  /quit               Exit
Anything else is sent to the assistant.";

/// A parsed prompt line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Blank line.
    Empty,
    /// Message for the assistant.
    Chat(String),
    Clear,
    /// `None` shows the current value.
    Temperature(Option<f32>),
    Stats,
    Help,
    Quit,
}

/// Parse one line of input.
///
/// Returns an error message for unknown commands or a malformed temperature.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Command::Empty);
    }
    if !trimmed.starts_with('/') {
        return Ok(Command::Chat(line.to_string()));
    }

    let mut parts = trimmed.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    match name {
        "/clear" | "/reset" => Ok(Command::Clear),
        "/temperature" | "/temp" => match arg {
            None => Ok(Command::Temperature(None)),
            Some(raw) => raw.parse::<f32>().map(|v| Command::Temperature(Some(v))).map_err(|_| {
                format!("Invalid temperature '{raw}': expected a number between 0.0 and 1.0")
            }),
        },
        "/stats" => Ok(Command::Stats),
        "/help" | "/?" => Ok(Command::Help),
        "/quit" | "/exit" => Ok(Command::Quit),
        other => Err(format!("Unknown command '{other}'. Type /help for commands.")),
    }
}

/// Run a parsed command against the session.
///
/// Returns a notice to show, if any. Conversation changes are shown by the
/// renderer from the event stream, not from here.
pub async fn execute(orchestrator: &mut Orchestrator, command: Command) -> Option<String> {
    match command {
        Command::Empty | Command::Quit => None,
        Command::Chat(text) => chat::send_message(orchestrator, &text).await.err(),
        Command::Clear => {
            session::clear_history(orchestrator);
            None
        }
        Command::Temperature(None) => Some(settings::get_temperature(orchestrator)),
        Command::Temperature(Some(value)) => {
            Some(settings::update_temperature(orchestrator, value).unwrap_or_else(|e| e))
        }
        Command::Stats => Some(session::chat_statistics(orchestrator)),
        Command::Help => Some(HELP_TEXT.to_string()),
    }
}
