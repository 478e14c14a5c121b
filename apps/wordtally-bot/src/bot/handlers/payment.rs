use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::PreCheckoutQuery;
use tracing::{info, warn};

use super::send_reply;
use crate::AppState;
use crate::models::payment::SubscriptionPayload;

pub async fn pre_checkout_handler(
    bot: Bot,
    q: PreCheckoutQuery,
) -> Result<(), teloxide::RequestError> {
    info!("pre-checkout {} from {}", q.invoice_payload, q.from.id.0);
    bot.answer_pre_checkout_query(q.id, true).await?;
    Ok(())
}

pub async fn successful_payment_handler(
    bot: Bot,
    msg: Message,
    state: AppState,
) -> Result<(), teloxide::RequestError> {
    let Some(payment) = msg.successful_payment() else {
        return Ok(());
    };
    info!(
        "payment of {} received in chat {}",
        payment.total_amount, msg.chat.id.0
    );

    let telegram_id = match payment.invoice_payload.parse::<SubscriptionPayload>() {
        Ok(p) => p.chat_id,
        Err(e) => {
            warn!("{}; crediting chat {}", e, msg.chat.id.0);
            msg.chat.id.0
        }
    };
    let reply = state
        .conversation
        .complete_payment(telegram_id, Utc::now())
        .await;
    send_reply(&bot, msg.chat.id, reply, &state).await;
    Ok(())
}
