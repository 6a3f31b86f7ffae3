use crate::cli::HistoryCommand;
use crate::config::Config;
use crate::error::Result;
use crate::storage::{MessageOrder, SqliteStorage};
use colored::Colorize;
use prettytable::{format, Table};

/// Shorten `text` to at most `max` characters, marking the cut with `...`
fn truncate(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() > max {
        let kept: String = single_line.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        single_line
    }
}

/// Handle history commands
///
/// Only storage is opened, so no API key is needed.
pub fn handle_history(config: &Config, command: HistoryCommand) -> Result<()> {
    let storage = SqliteStorage::from_config(&config.storage)?;

    match command {
        HistoryCommand::List => {
            let chats = storage.list_chats()?;

            if chats.is_empty() {
                println!("{}", "No conversation history found.".yellow());
                return Ok(());
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

            table.add_row(prettytable::row![
                "ID".bold(),
                "First message".bold(),
                "Messages".bold(),
                "Created".bold()
            ]);

            for chat in chats {
                let label = chat
                    .first_message
                    .as_deref()
                    .map(|m| truncate(m, 40))
                    .unwrap_or_else(|| "-".to_string());
                let count = storage.messages(chat.id, MessageOrder::Chronological)?.len();
                let created = chat.created_at.format("%Y-%m-%d %H:%M").to_string();

                table.add_row(prettytable::row![
                    chat.id.to_string().cyan(),
                    label,
                    count,
                    created
                ]);
            }

            println!("\nConversation History:");
            table.printstd();
            println!();
            println!(
                "Use {} to read a chat.",
                "gemini-caller history show <ID>".cyan()
            );
            println!();
        }
        HistoryCommand::Show { id } => {
            if storage.get_chat(id)?.is_none() {
                println!("{}", format!("No chat with id {}", id).yellow());
                return Ok(());
            }

            for message in storage.messages(id, MessageOrder::Chronological)? {
                let when = message.timestamp.format("%Y-%m-%d %H:%M:%S");
                println!("{} {}", format!("[{}] User:", when).bold(), message.user_message);
                println!(
                    "{} {}",
                    "Gemini:".green().bold(),
                    message.response.as_deref().unwrap_or_default()
                );
                println!();
            }
        }
        HistoryCommand::Delete { id } => {
            if storage.delete_chat(id)? {
                println!("{}", format!("Deleted chat {}", id).green());
            } else {
                println!("{}", format!("No chat with id {}", id).yellow());
            }
        }
    }

    Ok(())
}
