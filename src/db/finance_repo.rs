// src/db/finance_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::finance::{EntryKind, FinanceEntry},
};

#[derive(Clone)]
pub struct FinanceRepository {
    pool: PgPool,
}

impl FinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn append_entry<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        kind: EntryKind,
        category: &str,
        description: &str,
        amount: Decimal,
        sale_id: Option<Uuid>,
        auto_generated: bool,
        stock_generated: bool,
    ) -> Result<FinanceEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, FinanceEntry>(
            r#"
            INSERT INTO finance_entries (
                owner_id, entry_kind, category, description, amount,
                sale_id, auto_generated, stock_generated
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(kind)
        .bind(category)
        .bind(description)
        .bind(amount)
        .bind(sale_id)
        .bind(auto_generated)
        .bind(stock_generated)
        .fetch_one(executor)
        .await?;

        Ok(entry)
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<FinanceEntry>, AppError> {
        let entries =
            sqlx::query_as::<_, FinanceEntry>("SELECT * FROM finance_entries WHERE owner_id = $1")
                .bind(owner_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(entries)
    }

    // Só filtro de igualdade; a soma é calculada em memória pelo serviço de
    // sincronização, igual ao resto dos rollups.
    pub async fn list_stock_generated(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<FinanceEntry>, AppError> {
        let entries = sqlx::query_as::<_, FinanceEntry>(
            "SELECT * FROM finance_entries WHERE owner_id = $1 AND stock_generated = true",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
