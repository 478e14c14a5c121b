pub mod callback;
pub mod command;
pub mod payment;

use teloxide::prelude::*;
use teloxide::types::LabeledPrice;

use crate::AppState;
use crate::bot::conversation::Reply;
use crate::bot::keyboards::register_keyboard;

/// Sends a conversation reply; Telegram errors are logged, never raised.
pub async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply, state: &AppState) {
    let res = match reply {
        Reply::Text(text) => bot.send_message(chat_id, text).await.map(|_| ()),
        Reply::AskToRegister(text) => bot
            .send_message(chat_id, text)
            .reply_markup(register_keyboard())
            .await
            .map(|_| ()),
        Reply::Invoice(payload) => {
            let prices = vec![LabeledPrice {
                label: "Subscription, 30 days".to_string(),
                amount: payload.amount,
            }];
            bot.send_invoice(
                chat_id,
                "Subscription",
                "30 days of unlimited word counts",
                payload.to_string(),
                state.invoice.currency.clone(),
                prices,
            )
            .provider_token(state.invoice.provider_token.clone())
            .await
            .map(|_| ())
        }
    };
    if let Err(e) = res {
        tracing::error!("failed to reply to chat {}: {}", chat_id.0, e);
    }
}

/// Platform-authenticated sender id, falling back to the chat for channel posts.
pub fn sender_id(msg: &Message) -> i64 {
    msg.from
        .as_ref()
        .map(|u| u.id.0 as i64)
        .unwrap_or(msg.chat.id.0)
}
