// src/db/sales_repo.rs

use sqlx::types::Json;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::sale::{BalanceUpdate, PaymentMethod, Sale, SaleItem},
};

/// Registro de criação já calculado pelo serviço (subtotal, total, saldo e
/// status derivado). O repositório só persiste; não recalcula nada.
pub struct NewSale {
    pub owner_id: Uuid,
    pub client_id: Option<Uuid>,
    pub client_name: Option<String>,
    pub items: Vec<SaleItem>,
    pub subtotal: rust_decimal::Decimal,
    pub discount: rust_decimal::Decimal,
    pub loan_amount: rust_decimal::Decimal,
    pub total: rust_decimal::Decimal,
    pub paid_amount: rust_decimal::Decimal,
    pub remaining_amount: rust_decimal::Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: crate::models::sale::PaymentStatus,
    pub notes: Option<String>,
}

// Superfície de leitura deliberadamente mínima: filtros de igualdade sobre
// owner_id (e método de pagamento) e busca por id. Nenhuma agregação no SQL;
// os rollups são calculados em memória pelos serviços.
#[derive(Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_sale<'e, E>(&self, executor: E, new_sale: NewSale) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (
                owner_id, client_id, client_name, items,
                subtotal, discount, loan_amount, total,
                paid_amount, remaining_amount,
                payment_method, payment_status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(new_sale.owner_id)
        .bind(new_sale.client_id)
        .bind(new_sale.client_name)
        .bind(Json(new_sale.items))
        .bind(new_sale.subtotal)
        .bind(new_sale.discount)
        .bind(new_sale.loan_amount)
        .bind(new_sale.total)
        .bind(new_sale.paid_amount)
        .bind(new_sale.remaining_amount)
        .bind(new_sale.payment_method)
        .bind(new_sale.payment_status)
        .bind(new_sale.notes)
        .fetch_one(executor)
        .await?;

        Ok(sale)
    }

    // Releitura no momento da operação (nunca confiar no saldo vindo da tela)
    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        sale_id: Uuid,
    ) -> Result<Option<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            "SELECT * FROM sales WHERE id = $1 AND owner_id = $2",
        )
        .bind(sale_id)
        .bind(owner_id)
        .fetch_optional(executor)
        .await?;

        Ok(sale)
    }

    /// Escrita de saldo com trava otimista: só grava se a versão ainda for a
    /// que foi lida. Retorna o número de linhas afetadas (0 = conflito).
    pub async fn update_balance<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        sale_id: Uuid,
        update: &BalanceUpdate,
        expected_version: i32,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE sales
            SET paid_amount = $1,
                remaining_amount = $2,
                payment_status = $3,
                version = version + 1,
                updated_at = now()
            WHERE id = $4 AND owner_id = $5 AND version = $6
            "#,
        )
        .bind(update.paid_amount)
        .bind(update.remaining_amount)
        .bind(update.payment_status)
        .bind(sale_id)
        .bind(owner_id)
        .bind(expected_version)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Sale>, AppError> {
        let sales = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    pub async fn list_by_owner_and_method(
        &self,
        owner_id: Uuid,
        method: PaymentMethod,
    ) -> Result<Vec<Sale>, AppError> {
        let sales = sqlx::query_as::<_, Sale>(
            "SELECT * FROM sales WHERE owner_id = $1 AND payment_method = $2",
        )
        .bind(owner_id)
        .bind(method)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }
}
