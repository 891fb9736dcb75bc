use axum::{extract::State, routing::get, Router};
use tracing::instrument;

use crate::error::ApiError;
use crate::extract::{Json, Path};
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::users::dto::{CreateUserRequest, UserView};
use crate::users::services;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", get(get_user))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<axum::Json<ApiResponse<UserView>>, ApiError> {
    let user = services::create_user(&state.db, payload).await?;
    Ok(axum::Json(ApiResponse::success(
        "User created successfully",
        user,
    )))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<axum::Json<ApiResponse<Vec<UserView>>>, ApiError> {
    let users = services::list_users(&state.db).await?;
    Ok(axum::Json(ApiResponse::success(
        "Users retrieved successfully",
        users,
    )))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<axum::Json<ApiResponse<UserView>>, ApiError> {
    let user = services::get_user(&state.db, id).await?;
    Ok(axum::Json(ApiResponse::success(
        "User retrieved successfully",
        user,
    )))
}
