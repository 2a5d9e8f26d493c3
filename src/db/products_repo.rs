// src/db/products_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::product::Product};

// O núcleo consome produtos somente para leitura (valorização de estoque e
// alerta de reposição). Escrita de estoque fica fora deste serviço.
#[derive(Clone)]
pub struct ProductsRepository {
    pool: PgPool,
}

impl ProductsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }
}
