use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::info;

use super::send_reply;
use crate::AppState;
use crate::bot::keyboards::REGISTER_ACTION;

pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    state: AppState,
) -> Result<(), teloxide::RequestError> {
    info!("callback {:?} from {}", q.data, q.from.id.0);
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        tracing::warn!("callback answer failed: {}", e);
    }

    if q.data.as_deref() != Some(REGISTER_ACTION) {
        return Ok(());
    }

    let chat_id = q
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(q.from.id.0 as i64));
    let name = q
        .from
        .username
        .clone()
        .unwrap_or_else(|| q.from.full_name());

    let reply = state.conversation.register(chat_id.0, &name).await;
    send_reply(&bot, chat_id, reply, &state).await;
    Ok(())
}
