//! Special commands parser for interactive chat
//!
//! Lines starting with `/` manage the conversation instead of being sent
//! to the assistant. Commands are case-insensitive; arguments (session
//! ids) keep their case.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Start a fresh conversation
    NewSession,

    /// List cached conversations
    ListSessions,

    /// Switch to a cached conversation
    Resume(String),

    /// Delete a cached conversation
    Delete(String),

    /// Reprint the current transcript
    Transcript,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command; send it to the assistant
    None,
}

/// Parse a line of chat input
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` for unrecognised `/` commands and
/// `CommandError::MissingArgument` when `/resume` or `/delete` has no id.
///
/// # Examples
///
/// ```
/// use solace::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/new").unwrap(), SpecialCommand::NewSession);
/// assert_eq!(
///     parse_special_command("/resume lx1AbC").unwrap(),
///     SpecialCommand::Resume("lx1AbC".to_string())
/// );
/// assert_eq!(parse_special_command("hello").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if lower == "exit" || lower == "quit" {
        return Ok(SpecialCommand::Exit);
    }
    if !trimmed.starts_with('/') {
        return Ok(SpecialCommand::None);
    }

    let (command, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((command, arg)) => (command.to_lowercase(), arg.trim()),
        None => (lower, ""),
    };

    match command.as_str() {
        "/new" => Ok(SpecialCommand::NewSession),
        "/sessions" | "/list" => Ok(SpecialCommand::ListSessions),
        "/history" | "/transcript" => Ok(SpecialCommand::Transcript),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        "/resume" => require_arg("/resume", arg).map(SpecialCommand::Resume),
        "/delete" => require_arg("/delete", arg).map(SpecialCommand::Delete),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

fn require_arg(command: &str, arg: &str) -> Result<String, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument {
            command: command.to_string(),
            usage: format!("{} <session-id>", command),
        });
    }
    Ok(arg.to_string())
}

/// Print the special command reference
pub fn print_help() {
    println!(
        r#"
Chat Commands
=============

  /new             - Start a new conversation
  /sessions        - List saved conversations
  /resume <id>     - Continue a saved conversation
  /delete <id>     - Delete a saved conversation
  /history         - Show the current conversation again
  /help            - Show this help
  exit, quit       - Leave the chat

Anything else is sent to the assistant.
"#
    );
}
