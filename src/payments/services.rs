use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::info;

use crate::error::ApiError;
use crate::payments::dto::{PaymentRequest, PaymentView};
use crate::payments::repo::Payment;
use crate::users::repo::User;

/// Record a payment on behalf of the authenticated creator. The creation
/// date is the server clock; creator and date are immutable afterwards.
pub async fn create_payment(
    db: &PgPool,
    req: PaymentRequest,
    creator_email: &str,
) -> Result<PaymentView, ApiError> {
    let valid = req.validate()?;

    let creator = User::find_by_email(db, creator_email)
        .await?
        .ok_or_else(|| ApiError::UserNotFoundByEmail(creator_email.to_string()))?;

    let payment = Payment::create(
        db,
        valid.amount,
        valid.payment_type,
        &valid.category,
        valid.status,
        OffsetDateTime::now_utc(),
        creator.id,
    )
    .await?;
    info!(payment_id = payment.id, creator_id = payment.created_by, "payment created");

    Ok(PaymentView {
        id: payment.id,
        amount: payment.amount,
        payment_type: payment.payment_type,
        category: payment.category,
        status: payment.status,
        date: payment.date,
        created_by_name: creator.name,
    })
}

pub async fn list_payments(db: &PgPool) -> Result<Vec<PaymentView>, ApiError> {
    let rows = Payment::list(db).await?;
    Ok(rows.into_iter().map(PaymentView::from).collect())
}

pub async fn get_payment(db: &PgPool, id: i64) -> Result<PaymentView, ApiError> {
    let row = Payment::find_by_id(db, id)
        .await?
        .ok_or(ApiError::PaymentNotFound(id))?;
    Ok(row.into())
}

pub async fn update_payment(
    db: &PgPool,
    id: i64,
    req: PaymentRequest,
) -> Result<PaymentView, ApiError> {
    let valid = req.validate()?;
    let row = Payment::update(
        db,
        id,
        valid.amount,
        valid.payment_type,
        &valid.category,
        valid.status,
    )
    .await?
    .ok_or(ApiError::PaymentNotFound(id))?;
    info!(payment_id = id, "payment updated");
    Ok(row.into())
}

pub async fn delete_payment(db: &PgPool, id: i64) -> Result<(), ApiError> {
    if !Payment::delete(db, id).await? {
        return Err(ApiError::PaymentNotFound(id));
    }
    info!(payment_id = id, "payment deleted");
    Ok(())
}
