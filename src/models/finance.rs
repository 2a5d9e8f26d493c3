// src/models/finance.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "entry_kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    Income,  // Receita
    Expense, // Despesa
}

/// Lançamento do diário financeiro pessoal/comercial.
///
/// Recebe dois tipos de escrita automática do núcleo:
/// - receita quando um pagamento fiado (ou venda à vista) entra;
/// - despesa de ajuste quando a sincronização de estoque encontra diferença
///   (`stock_generated = true`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinanceEntry {
    pub id: Uuid,

    #[schema(ignore)]
    pub owner_id: Uuid,

    pub entry_kind: EntryKind,

    #[schema(example = "Vendas")]
    pub category: String,

    #[schema(example = "Pagamento fiado - Dona Maria")]
    pub description: String,

    #[schema(example = "40.00")]
    pub amount: Decimal,

    pub entry_date: DateTime<Utc>,

    // Vínculo com a venda que originou o lançamento, quando houver
    pub sale_id: Option<Uuid>,

    pub auto_generated: bool,

    // Marca os lançamentos criados pelo ajuste de estoque
    pub stock_generated: bool,

    pub created_at: DateTime<Utc>,
}

// --- Sincronização de estoque (resposta efêmera) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockSyncOutcome {
    AlreadySynchronized,
    Adjusted,
    ManualReviewRequired,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockSyncReport {
    pub outcome: StockSyncOutcome,

    #[schema(example = "500.00")]
    pub stock_value: Decimal,

    #[schema(example = "420.00")]
    pub recorded_expenses: Decimal,

    #[schema(example = "80.00")]
    pub delta: Decimal,

    // Lançamento de ajuste criado, quando houver
    pub adjustment_entry: Option<FinanceEntry>,
}
