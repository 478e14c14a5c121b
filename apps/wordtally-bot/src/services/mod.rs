pub mod session_service;
pub mod subscription_service;
pub mod user_service;
