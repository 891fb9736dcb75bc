use axum::{extract::State, routing::get, Router};
use tracing::instrument;

use crate::auth::middleware::CurrentUser;
use crate::error::ApiError;
use crate::extract::{Json, Path};
use crate::payments::dto::{PaymentRequest, PaymentView};
use crate::payments::services;
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments).post(create_payment))
        .route(
            "/payments/:id",
            get(get_payment).put(update_payment).delete(delete_payment),
        )
}

#[instrument(skip(state, user, payload), fields(creator = %user.email))]
pub async fn create_payment(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<PaymentRequest>,
) -> Result<axum::Json<ApiResponse<PaymentView>>, ApiError> {
    let payment = services::create_payment(&state.db, payload, &user.email).await?;
    Ok(axum::Json(ApiResponse::success(
        "Payment created successfully",
        payment,
    )))
}

#[instrument(skip(state))]
pub async fn list_payments(
    State(state): State<AppState>,
) -> Result<axum::Json<ApiResponse<Vec<PaymentView>>>, ApiError> {
    let payments = services::list_payments(&state.db).await?;
    Ok(axum::Json(ApiResponse::success(
        "Payments retrieved successfully",
        payments,
    )))
}

#[instrument(skip(state))]
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<axum::Json<ApiResponse<PaymentView>>, ApiError> {
    let payment = services::get_payment(&state.db, id).await?;
    Ok(axum::Json(ApiResponse::success(
        "Payment retrieved successfully",
        payment,
    )))
}

#[instrument(skip(state, payload))]
pub async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentRequest>,
) -> Result<axum::Json<ApiResponse<PaymentView>>, ApiError> {
    let payment = services::update_payment(&state.db, id, payload).await?;
    Ok(axum::Json(ApiResponse::success(
        "Payment updated successfully",
        payment,
    )))
}

#[instrument(skip(state))]
pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<axum::Json<ApiResponse<String>>, ApiError> {
    services::delete_payment(&state.db, id).await?;
    Ok(axum::Json(ApiResponse::success(
        "Payment deleted successfully",
        format!("Payment with ID {id} has been deleted"),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn non_numeric_payment_id_is_rejected_with_envelope() {
        let app = routes().with_state(AppState::fake());
        let res = app
            .oneshot(Request::get("/payments/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body = res.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["message"].is_string());
        assert!(json["data"].is_null());
    }
}
