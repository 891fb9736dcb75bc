use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod services;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
