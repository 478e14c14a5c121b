use teloxide::{
    prelude::*,
    types::{BotCommand, BotCommandScope, Recipient},
    utils::command::BotCommands,
};

use crate::services::user_service::UserDirectory;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case", description = "Available commands:")]
pub enum Command {
    #[command(description = "greet and offer registration")]
    Start,
    #[command(description = "count the words in your next message")]
    WordCount,
    #[command(description = "buy a 30-day subscription")]
    Subscribe,
    #[command(description = "promote a user to admin")]
    AddAdmin,
    #[command(description = "show per-user task counters")]
    AdminStats,
}

pub fn user_commands() -> Vec<BotCommand> {
    vec![
        BotCommand::new("start", "Greet and offer registration"),
        BotCommand::new("word_count", "Count the words in a text"),
        BotCommand::new("subscribe", "Buy a 30-day subscription"),
    ]
}

pub fn admin_commands() -> Vec<BotCommand> {
    let mut commands = user_commands();
    commands.push(BotCommand::new("add_admin", "Promote a user to admin"));
    commands.push(BotCommand::new("admin_stats", "Show daily statistics"));
    commands
}

/// Installs the default menu, then a chat-scoped one for every registered
/// user. A failure for one chat is logged and the pass goes on.
pub async fn install_command_menus(bot: &Bot, users: &dyn UserDirectory) -> anyhow::Result<usize> {
    bot.set_my_commands(user_commands()).await?;

    let mut installed = 0;
    for user in users.list().await? {
        let commands = if user.is_admin {
            admin_commands()
        } else {
            user_commands()
        };
        let res = bot
            .set_my_commands(commands)
            .scope(BotCommandScope::Chat {
                chat_id: Recipient::Id(ChatId(user.telegram_id)),
            })
            .await;
        match res {
            Ok(_) => installed += 1,
            Err(e) => tracing::warn!("command menu for {} not set: {}", user.telegram_id, e),
        }
    }
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_snake_case_commands() {
        assert_eq!(Command::parse("/word_count", "wordtally_bot").unwrap(), Command::WordCount);
        assert_eq!(Command::parse("/add_admin", "wordtally_bot").unwrap(), Command::AddAdmin);
        assert_eq!(
            Command::parse("/admin_stats@wordtally_bot", "wordtally_bot").unwrap(),
            Command::AdminStats
        );
        assert!(Command::parse("/unknown", "wordtally_bot").is_err());
    }

    #[test]
    fn admins_get_extra_commands() {
        let names: Vec<_> = admin_commands().into_iter().map(|c| c.command).collect();
        assert_eq!(
            names,
            vec!["start", "word_count", "subscribe", "add_admin", "admin_stats"]
        );
        assert_eq!(user_commands().len(), 3);
    }
}
