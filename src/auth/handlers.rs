use axum::{
    extract::{FromRef, State},
    routing::post,
    Router,
};
use tracing::instrument;

use crate::auth::dto::{LoginRequest, LoginResponse};
use crate::auth::jwt::JwtKeys;
use crate::auth::services;
use crate::error::ApiError;
use crate::extract::Json;
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<axum::Json<ApiResponse<LoginResponse>>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let response = services::login(&state.db, &keys, payload).await?;
    Ok(axum::Json(ApiResponse::success(
        "Login successful",
        response,
    )))
}
