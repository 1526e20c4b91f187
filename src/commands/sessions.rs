use crate::cli::SessionCommand;
use crate::error::{Result, SolaceError};
use crate::session::{Message, Role, SessionStore};
use colored::Colorize;
use prettytable::{format, Table};

use super::truncate;

/// Handle local session commands
pub fn handle_sessions(sessions: &SessionStore, command: SessionCommand) -> Result<()> {
    match command {
        SessionCommand::List => print_session_list(sessions),
        SessionCommand::Show { id } => {
            let session = sessions
                .load(&id)
                .ok_or_else(|| SolaceError::NotFound(format!("session {}", id)))?;

            println!(
                "\nSession {} ({} messages, last updated {})\n",
                session.id.cyan(),
                session.messages.len(),
                session.last_updated.format("%Y-%m-%d %H:%M")
            );
            print_transcript(&session.messages);
        }
        SessionCommand::Delete { id } => {
            delete_session(sessions, &id)?;
            println!("{}", format!("Deleted conversation {}", id).green());
        }
        SessionCommand::New => {
            println!("{}", SessionStore::generate_id());
        }
    }

    Ok(())
}

/// Delete a cached conversation, including one whose record is unreadable
///
/// # Errors
///
/// Returns `SolaceError::NotFound` when nothing is stored under `id`, or
/// `SolaceError::Storage` when the removal fails
pub fn delete_session(sessions: &SessionStore, id: &str) -> Result<()> {
    if !sessions.exists(id) {
        return Err(SolaceError::NotFound(format!("session {}", id)).into());
    }
    if !sessions.delete(id) {
        return Err(SolaceError::Storage(format!("could not delete session {}", id)).into());
    }
    Ok(())
}

/// Print cached conversations, most recent first
pub fn print_session_list(sessions: &SessionStore) {
    let summaries = sessions.list();

    if summaries.is_empty() {
        println!("{}", "No saved conversations found.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "ID".bold(),
        "Preview".bold(),
        "Messages".bold(),
        "Last Updated".bold()
    ]);

    for summary in summaries {
        let preview = summary
            .preview
            .as_deref()
            .map(|line| truncate(line, 40))
            .unwrap_or_else(|| "-".to_string());
        let updated = summary
            .last_updated
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();

        table.add_row(prettytable::row![
            summary.id.cyan(),
            preview,
            summary.message_count,
            updated
        ]);
    }

    println!("\nSaved Conversations:");
    table.printstd();
    println!();
    println!(
        "Use {} to continue a conversation.",
        "solace chat --resume <ID>".cyan()
    );
    println!();
}

/// Print a transcript turn by turn
pub fn print_transcript(messages: &[Message]) {
    for message in messages {
        let label = match message.role {
            Role::User => "You".bold().green(),
            Role::Assistant => "Solace".bold().blue(),
        };
        println!("{}: {}\n", label, message.content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    fn store() -> SessionStore {
        SessionStore::with_default_prefix(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_show_missing_session_is_not_found() {
        let err = handle_sessions(
            &store(),
            SessionCommand::Show {
                id: "nope".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SolaceError>(),
            Some(SolaceError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_removes_session() {
        let sessions = store();
        assert!(sessions.save("s1", &[Message::user("hello")]));

        handle_sessions(
            &sessions,
            SessionCommand::Delete {
                id: "s1".to_string(),
            },
        )
        .unwrap();
        assert!(sessions.load("s1").is_none());
    }

    #[test]
    fn test_list_handles_empty_and_populated_store() {
        let sessions = store();
        handle_sessions(&sessions, SessionCommand::List).unwrap();

        assert!(sessions.save("s1", &[Message::assistant("hi"), Message::user("tired")]));
        handle_sessions(&sessions, SessionCommand::List).unwrap();
    }

    #[test]
    fn test_delete_removes_unreadable_session() {
        let backing = Arc::new(MemoryStore::new());
        let sessions = SessionStore::with_default_prefix(backing.clone());
        backing.set("chat_session_bad", "{not json").unwrap();

        handle_sessions(
            &sessions,
            SessionCommand::Delete {
                id: "bad".to_string(),
            },
        )
        .unwrap();
        assert!(backing.get("chat_session_bad").unwrap().is_none());
    }

    #[test]
    fn test_delete_unknown_session_is_not_found() {
        let err = handle_sessions(
            &store(),
            SessionCommand::Delete {
                id: "nope".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SolaceError>(),
            Some(SolaceError::NotFound(_))
        ));
    }
}
