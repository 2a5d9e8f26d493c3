// src/db/payments_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::payment::{SalePayment, SettlementMethod},
};

// Diário append-only: este repositório não expõe UPDATE nem DELETE.
#[derive(Clone)]
pub struct PaymentsRepository {
    pool: PgPool,
}

impl PaymentsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn append<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        sale_id: Uuid,
        amount: Decimal,
        method: SettlementMethod,
        notes: Option<&str>,
    ) -> Result<SalePayment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, SalePayment>(
            r#"
            INSERT INTO sale_payments (owner_id, sale_id, amount, method, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(sale_id)
        .bind(amount)
        .bind(method)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    pub async fn list_by_sale(
        &self,
        owner_id: Uuid,
        sale_id: Uuid,
    ) -> Result<Vec<SalePayment>, AppError> {
        let payments = sqlx::query_as::<_, SalePayment>(
            "SELECT * FROM sale_payments WHERE owner_id = $1 AND sale_id = $2",
        )
        .bind(owner_id)
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }
}
