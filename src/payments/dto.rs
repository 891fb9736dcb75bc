use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ApiError;
use crate::payments::repo::{PaymentStatus, PaymentType, PaymentWithCreator};

/// Request body for creating or updating a payment. Enum-valued fields
/// arrive as strings so bad values become per-field validation errors.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: f64,
    pub payment_type: String,
    pub category: String,
    pub status: String,
}

/// A PaymentRequest that passed field validation.
#[derive(Debug)]
pub struct ValidatedPayment {
    pub amount: f64,
    pub payment_type: PaymentType,
    pub category: String,
    pub status: PaymentStatus,
}

impl PaymentRequest {
    pub fn validate(self) -> Result<ValidatedPayment, ApiError> {
        let mut errors = BTreeMap::new();

        if !(self.amount.is_finite() && self.amount > 0.0) {
            errors.insert("amount".to_string(), "must be positive".to_string());
        }

        let payment_type = PaymentType::parse(&self.payment_type);
        if payment_type.is_none() {
            errors.insert(
                "paymentType".to_string(),
                "must be one of CASH, CARD, TRANSFER".to_string(),
            );
        }

        let category = self.category.trim().to_string();
        if category.is_empty() {
            errors.insert("category".to_string(), "must not be empty".to_string());
        }

        let status = PaymentStatus::parse(&self.status);
        if status.is_none() {
            errors.insert(
                "status".to_string(),
                "must be one of PENDING, COMPLETED, FAILED".to_string(),
            );
        }

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }
        Ok(ValidatedPayment {
            amount: self.amount,
            payment_type: payment_type.unwrap(),
            category,
            status: status.unwrap(),
        })
    }
}

/// Payment as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    pub id: i64,
    pub amount: f64,
    pub payment_type: PaymentType,
    pub category: String,
    pub status: PaymentStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub created_by_name: String,
}

impl From<PaymentWithCreator> for PaymentView {
    fn from(row: PaymentWithCreator) -> Self {
        Self {
            id: row.id,
            amount: row.amount,
            payment_type: row.payment_type,
            category: row.category,
            status: row.status,
            date: row.date,
            created_by_name: row.created_by_name,
        }
    }
}
