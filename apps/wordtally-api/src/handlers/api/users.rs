use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use wordtally_shared::api::{
    INVALID_DATA, MessageBody, NewUser, RegisterRequest, TaskIncrement, UserPatch,
};

use crate::AppState;
use crate::error::{ApiError, ApiResult};

pub async fn list_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.user_service.list().await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let user = state.user_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn register_user(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload.map_err(|_| ApiError::Validation(INVALID_DATA.to_string()))?;
    let resp = state.user_service.register(payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(telegram_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.user_service.get(telegram_id).await?))
}

pub async fn patch_user(
    State(state): State<AppState>,
    Path(telegram_id): Path<i64>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    Ok(Json(state.user_service.patch(telegram_id, payload).await?))
}

pub async fn update_tasks(
    State(state): State<AppState>,
    Path(telegram_id): Path<i64>,
    payload: Result<Json<TaskIncrement>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    state.user_service.add_tasks(telegram_id, payload).await?;
    Ok(Json(MessageBody {
        message: "Tasks updated successfully".to_string(),
    }))
}

pub async fn daily_statistics(
    State(state): State<AppState>,
    Path(telegram_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.user_service.daily_statistics(telegram_id).await?))
}

pub async fn make_admin(
    State(state): State<AppState>,
    Path(telegram_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    state.user_service.make_admin(telegram_id).await?;
    Ok(Json(MessageBody {
        message: "User promoted to admin successfully".to_string(),
    }))
}
