pub mod config;
pub mod error;
pub mod handlers;
pub mod services;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;
use wordtally_db::sqlx::SqlitePool;

use crate::handlers::api::{auth, users};
use crate::services::user_service::UserService;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub api_token: Option<String>,
}

impl AppState {
    pub fn new(pool: SqlitePool, api_token: Option<String>) -> Self {
        let user_service = Arc::new(UserService::new(pool));
        Self {
            user_service,
            // An empty token in the environment means "no token".
            api_token: api_token.filter(|t| !t.trim().is_empty()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/users/", get(users::list_users).post(users::create_user))
        .route("/users/register/", post(users::register_user))
        .route(
            "/users/{telegram_id}/",
            get(users::get_user).patch(users::patch_user),
        )
        .route("/users/{telegram_id}/update_tasks/", patch(users::update_tasks))
        .route(
            "/users/{telegram_id}/daily_statistics/",
            get(users::daily_statistics),
        )
        .route("/users/{telegram_id}/make_admin/", post(users::make_admin))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bot_token,
        ));

    Router::new()
        .route("/", get(handlers::home))
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(tower_http::limit::RequestBodyLimitLayer::new(64 * 1024))
        .layer(tower_http::set_header::SetResponseHeaderLayer::overriding(
            axum::http::header::X_CONTENT_TYPE_OPTIONS,
            axum::http::HeaderValue::from_static("nosniff"),
        ))
}
