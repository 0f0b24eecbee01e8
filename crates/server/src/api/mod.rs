use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use shared::{
    domain::{User, UserId},
    error::{ApiError, ErrorCode},
    protocol::{CreateUserRequest, UpdateUserRequest},
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;

use crate::app_state::AppState;

pub(crate) const MAX_JSON_BODY_BYTES: usize = 64 * 1024;

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

pub(crate) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(http_list_users).post(http_create_user))
        .route(
            "/api/users/:user_id",
            put(http_update_user).delete(http_delete_user),
        )
        .layer(RequestBodyLimitLayer::new(MAX_JSON_BODY_BYTES))
}

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    (status_for(err.code), Json(err))
}

async fn http_list_users(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<User>>> {
    let users = server_api::list_users(&state.api).await.map_err(reject)?;
    Ok(Json(users))
}

async fn http_create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = server_api::create_user(&state.api, &req.name, &req.email)
        .await
        .map_err(reject)?;
    info!(user_id = user.id.0, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn http_update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    let user = server_api::update_user(&state.api, UserId(user_id), &req.name, &req.email)
        .await
        .map_err(reject)?;
    info!(user_id, "user updated");
    Ok(Json(user))
}

async fn http_delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> ApiResult<StatusCode> {
    server_api::delete_user(&state.api, UserId(user_id))
        .await
        .map_err(reject)?;
    info!(user_id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
