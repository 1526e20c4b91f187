//! Interactive chat handler.
//!
//! Runs a readline loop over a [`ChatController`] backed by the API client.
//! Every exchange is saved to the local session cache by the controller, so
//! the loop itself only renders state and dispatches special commands.

use super::sessions::{delete_session, print_session_list, print_transcript};
use super::special_commands::{parse_special_command, print_help, SpecialCommand};
use super::AppContext;
use crate::api::ApiClient;
use crate::chat::{ChatController, SendOutcome};
use crate::error::{Result, SolaceError};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::sync::Arc;

type Controller = ChatController<Arc<ApiClient>>;

/// Start interactive chat
///
/// # Arguments
///
/// * `ctx` - Shared command context
/// * `resume` - Optional id of a cached session to continue
///
/// # Errors
///
/// Returns `SolaceError::NotFound` if `resume` names a session that is not
/// cached, or an error if the terminal cannot be initialised
pub async fn run_chat(ctx: AppContext, resume: Option<String>) -> Result<()> {
    let mut chat = ChatController::new(
        ctx.client.clone(),
        ctx.sessions.clone(),
        ctx.config.chat.clone(),
    );

    if let Some(id) = resume.as_deref() {
        if !chat.resume(id) {
            return Err(SolaceError::NotFound(format!("session {}", id)).into());
        }
    }

    let mut rl = DefaultEditor::new()?;

    print_welcome_banner(&chat);
    if ctx.client.token().is_none() {
        println!(
            "{}\n",
            "You are not logged in. Run `solace login` if the server asks for it.".yellow()
        );
    }
    print_transcript(&chat.state().messages);

    loop {
        match rl.readline(&format!("{} ", "you>".green().bold())) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                match parse_special_command(trimmed) {
                    Ok(SpecialCommand::None) => send_turn(&mut chat, trimmed).await,
                    Ok(SpecialCommand::Exit) => break,
                    Ok(command) => handle_special(&mut chat, command),
                    Err(e) => eprintln!("{}\n", e.to_string().red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                tracing::error!("Readline error: {:?}", err);
                break;
            }
        }
    }

    println!(
        "Conversation saved as {}. Take care!",
        chat.state().session_id.cyan()
    );
    Ok(())
}

async fn send_turn(chat: &mut Controller, text: &str) {
    println!("{}", "...".dimmed());
    match chat.send(text).await {
        Ok(SendOutcome::Replied(reply)) => {
            println!("\n{}: {}\n", "Solace".bold().blue(), reply);
        }
        Ok(SendOutcome::Failed(notice)) => {
            if let Some(apology) = chat.state().messages.last() {
                println!("\n{}: {}", "Solace".bold().blue(), apology.content);
            }
            eprintln!("{}\n", notice.red());
        }
        Err(e) => eprintln!("{}\n", e.to_string().red()),
    }
}

fn handle_special(chat: &mut Controller, command: SpecialCommand) {
    match command {
        SpecialCommand::NewSession => {
            chat.new_session();
            println!(
                "{}\n",
                format!("Started conversation {}", chat.state().session_id).green()
            );
            print_transcript(&chat.state().messages);
        }
        SpecialCommand::ListSessions => print_session_list(chat.sessions()),
        SpecialCommand::Resume(id) => {
            if chat.resume(&id) {
                println!("{}\n", format!("Resumed conversation {}", id).green());
                print_transcript(&chat.state().messages);
            } else {
                eprintln!("{}\n", format!("No saved conversation {}", id).red());
            }
        }
        SpecialCommand::Delete(id) => {
            if id == chat.state().session_id {
                eprintln!(
                    "{}\n",
                    "Cannot delete the conversation in progress; use /new first.".red()
                );
            } else {
                match delete_session(chat.sessions(), &id) {
                    Ok(()) => println!("{}\n", format!("Deleted conversation {}", id).green()),
                    Err(e) => eprintln!("{}\n", e.to_string().red()),
                }
            }
        }
        SpecialCommand::Transcript => print_transcript(&chat.state().messages),
        SpecialCommand::Help => print_help(),
        SpecialCommand::Exit | SpecialCommand::None => {}
    }
}

fn print_welcome_banner(chat: &Controller) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                 Solace - you are not alone                   ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
    println!("Session: {}", chat.state().session_id.cyan());
    println!("Type '/help' for available commands, 'exit' to quit\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::{KeyValueStore, MemoryStore};

    fn controller(store: Arc<dyn KeyValueStore>) -> Controller {
        let ctx = AppContext::with_store(Config::default(), store).unwrap();
        ChatController::new(ctx.client, ctx.sessions, ctx.config.chat)
    }

    #[test]
    fn test_delete_command_removes_unreadable_session() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set("chat_session_bad", "{not json").unwrap();
        let mut chat = controller(store.clone());

        handle_special(&mut chat, SpecialCommand::Delete("bad".to_string()));
        assert!(store.get("chat_session_bad").unwrap().is_none());
    }

    #[test]
    fn test_delete_command_keeps_current_session() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut chat = controller(store.clone());
        let current = chat.state().session_id.clone();
        assert!(chat.sessions().save(&current, &chat.state().messages));

        handle_special(&mut chat, SpecialCommand::Delete(current.clone()));
        assert!(chat.sessions().exists(&current));
    }
}
