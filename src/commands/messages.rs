//! Server-side message commands: chat history, unread messages and opening
//! a named conversation

use super::print_json;
use crate::api::{ApiClient, HistoryQuery};
use crate::cli::MessageCommand;
use crate::error::Result;
use colored::Colorize;
use serde_json::Value;

/// Handle server-side message commands
pub async fn handle_messages(client: &ApiClient, command: MessageCommand) -> Result<()> {
    match command {
        MessageCommand::History {
            user_id,
            psychologist_id,
        } => {
            let query = HistoryQuery {
                user_id,
                psychologist_id,
            };
            let history = client.chat_history(&query).await?;
            if is_empty_listing(&history) {
                println!("{}", "No messages found.".yellow());
            } else {
                print_json(&history)?;
            }
        }
        MessageCommand::Unread => {
            let unread = client.unread_messages().await?;
            if is_empty_listing(&unread) {
                println!("{}", "No unread messages.".green());
            } else {
                print_json(&unread)?;
            }
        }
        MessageCommand::Open { name } => {
            let created = client.create_chat_session(&name).await?;
            println!("{}", format!("Opened conversation \"{}\"", name).green());
            print_json(&created)?;
        }
    }
    Ok(())
}

/// True for `null`, `[]`, and envelopes whose `data` is empty or null
fn is_empty_listing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => match map.get("data") {
            Some(Value::Null) => true,
            Some(Value::Array(items)) => items.is_empty(),
            _ => map.is_empty(),
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_empty_listing() {
        assert!(is_empty_listing(&Value::Null));
        assert!(is_empty_listing(&json!([])));
        assert!(is_empty_listing(&json!({})));
        assert!(is_empty_listing(&json!({"data": []})));
        assert!(is_empty_listing(&json!({"data": null})));

        assert!(!is_empty_listing(&json!([{"content": "hi"}])));
        assert!(!is_empty_listing(&json!({"data": [{"content": "hi"}]})));
        assert!(!is_empty_listing(&json!({"count": 2})));
    }
}
