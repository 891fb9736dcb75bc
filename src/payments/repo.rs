use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "payment_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Cash,
    Card,
    Transfer,
}

impl PaymentType {
    pub fn parse(s: &str) -> Option<PaymentType> {
        match s {
            "CASH" => Some(PaymentType::Cash),
            "CARD" => Some(PaymentType::Card),
            "TRANSFER" => Some(PaymentType::Transfer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn parse(s: &str) -> Option<PaymentStatus> {
        match s {
            "PENDING" => Some(PaymentStatus::Pending),
            "COMPLETED" => Some(PaymentStatus::Completed),
            "FAILED" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

/// Payment row as stored.
#[derive(Debug, Clone, FromRow)]
pub struct Payment {
    pub id: i64,
    pub amount: f64,
    pub payment_type: PaymentType,
    pub category: String,
    pub status: PaymentStatus,
    pub date: OffsetDateTime,
    pub created_by: i64,
}

/// Payment joined with the creating user's name, the shape clients see.
#[derive(Debug, Clone, FromRow)]
pub struct PaymentWithCreator {
    pub id: i64,
    pub amount: f64,
    pub payment_type: PaymentType,
    pub category: String,
    pub status: PaymentStatus,
    pub date: OffsetDateTime,
    pub created_by_name: String,
}

const JOINED_COLUMNS: &str = r#"
    p.id, p.amount, p.payment_type, p.category, p.status, p.date,
    u.name AS created_by_name
"#;

impl Payment {
    pub async fn create(
        db: &PgPool,
        amount: f64,
        payment_type: PaymentType,
        category: &str,
        status: PaymentStatus,
        date: OffsetDateTime,
        created_by: i64,
    ) -> anyhow::Result<Payment> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (amount, payment_type, category, status, date, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, amount, payment_type, category, status, date, created_by
            "#,
        )
        .bind(amount)
        .bind(payment_type)
        .bind(category)
        .bind(status)
        .bind(date)
        .bind(created_by)
        .fetch_one(db)
        .await?;
        Ok(payment)
    }

    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<PaymentWithCreator>> {
        let rows = sqlx::query_as::<_, PaymentWithCreator>(&format!(
            r#"
            SELECT {JOINED_COLUMNS}
            FROM payments p
            JOIN users u ON u.id = p.created_by
            ORDER BY p.id
            "#,
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<PaymentWithCreator>> {
        let row = sqlx::query_as::<_, PaymentWithCreator>(&format!(
            r#"
            SELECT {JOINED_COLUMNS}
            FROM payments p
            JOIN users u ON u.id = p.created_by
            WHERE p.id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Overwrite the mutable fields; date and created_by stay untouched.
    pub async fn update(
        db: &PgPool,
        id: i64,
        amount: f64,
        payment_type: PaymentType,
        category: &str,
        status: PaymentStatus,
    ) -> anyhow::Result<Option<PaymentWithCreator>> {
        let row = sqlx::query_as::<_, PaymentWithCreator>(
            r#"
            UPDATE payments AS p
            SET amount = $2, payment_type = $3, category = $4, status = $5
            FROM users u
            WHERE p.id = $1 AND u.id = p.created_by
            RETURNING p.id, p.amount, p.payment_type, p.category, p.status, p.date,
                      u.name AS created_by_name
            "#,
        )
        .bind(id)
        .bind(amount)
        .bind(payment_type)
        .bind(category)
        .bind(status)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM payments WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_type_parse_and_serialize() {
        assert_eq!(PaymentType::parse("CASH"), Some(PaymentType::Cash));
        assert_eq!(PaymentType::parse("TRANSFER"), Some(PaymentType::Transfer));
        assert_eq!(PaymentType::parse("CHEQUE"), None);
        assert_eq!(
            serde_json::to_string(&PaymentType::Card).unwrap(),
            "\"CARD\""
        );
    }

    #[test]
    fn payment_status_parse_and_serialize() {
        assert_eq!(PaymentStatus::parse("PENDING"), Some(PaymentStatus::Pending));
        assert_eq!(PaymentStatus::parse("completed"), None);
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Failed).unwrap(),
            "\"FAILED\""
        );
    }
}
