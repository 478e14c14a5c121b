use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

pub const REGISTER_ACTION: &str = "register";

pub fn register_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "Register",
        REGISTER_ACTION,
    )]])
}
