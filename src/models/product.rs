// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Produto do estoque. O núcleo só lê esta coleção: valorização do estoque
/// (quantidade x custo) e alerta de reposição no briefing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,

    #[schema(ignore)]
    pub owner_id: Uuid,

    #[schema(example = "Coca-Cola 2L")]
    pub name: String,

    #[schema(example = "12")]
    pub quantity: Decimal,

    #[schema(example = "6.80")]
    pub cost_price: Decimal,

    #[schema(example = "9.50")]
    pub sale_price: Decimal,

    // Limite de estoque baixo; quando ausente o briefing assume 5.
    pub min_stock: Option<Decimal>,

    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn stock_value(&self) -> Decimal {
        self.quantity * self.cost_price
    }

    pub fn is_low_stock(&self) -> bool {
        let threshold = self.min_stock.unwrap_or(Decimal::from(5));
        self.quantity <= threshold
    }
}
