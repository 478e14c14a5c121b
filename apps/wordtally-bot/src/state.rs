use std::sync::Arc;

use crate::bot::conversation::Conversation;
use crate::services::session_service::SessionStore;
use crate::services::user_service::UserDirectory;

/// Invoice parameters for the subscription product.
#[derive(Clone, Debug)]
pub struct InvoiceSettings {
    pub provider_token: String,
    pub currency: String,
    pub price: u32,
}

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserDirectory>,
    pub sessions: SessionStore,
    pub conversation: Conversation,
    pub invoice: InvoiceSettings,
}

impl AppState {
    pub fn new(users: Arc<dyn UserDirectory>, sessions: SessionStore, invoice: InvoiceSettings) -> Self {
        let conversation = Conversation::new(users.clone(), sessions.clone(), invoice.price);
        Self {
            users,
            sessions,
            conversation,
            invoice,
        }
    }
}
