pub mod reset_service;
pub mod user_service;
