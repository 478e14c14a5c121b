use teloxide::prelude::*;
use tracing::info;

use super::{send_reply, sender_id};
use crate::AppState;
use crate::bot::commands::Command;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: AppState,
) -> Result<(), teloxide::RequestError> {
    let chat_id = msg.chat.id;
    let sender = sender_id(&msg);
    info!("command {:?} from {} in chat {}", cmd, sender, chat_id.0);

    let conv = &state.conversation;
    let reply = match cmd {
        Command::Start => conv.start(),
        Command::WordCount => conv.begin_word_count(chat_id.0).await,
        Command::Subscribe => conv.subscribe(chat_id.0, sender).await,
        Command::AddAdmin => conv.begin_add_admin(chat_id.0, sender).await,
        Command::AdminStats => conv.admin_stats(sender).await,
    };
    send_reply(&bot, chat_id, reply, &state).await;
    Ok(())
}

pub async fn text_handler(
    bot: Bot,
    msg: Message,
    state: AppState,
) -> Result<(), teloxide::RequestError> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let reply = state
        .conversation
        .handle_text(msg.chat.id.0, sender_id(&msg), text)
        .await;
    send_reply(&bot, msg.chat.id, reply, &state).await;
    Ok(())
}
