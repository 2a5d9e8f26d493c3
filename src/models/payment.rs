// src/models/payment.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Vendas fiado são liquidadas em dinheiro ou Pix; nunca com mais fiado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "settlement_method", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementMethod {
    Cash,            // Dinheiro
    InstantTransfer, // Pix
}

/// Entrada do diário de pagamentos. Criada uma única vez quando um pagamento
/// é registrado; nunca alterada ou removida. O saldo oficial fica na venda,
/// o diário é trilha de auditoria.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalePayment {
    pub id: Uuid,

    pub sale_id: Uuid,

    #[schema(ignore)]
    pub owner_id: Uuid,

    #[schema(example = "40.00")]
    pub amount: Decimal,

    pub method: SettlementMethod,

    pub paid_at: DateTime<Utc>,

    #[schema(example = "Pagou metade, volta sexta")]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
}
