// src/models/dashboard.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

// Todos os modelos deste módulo são efêmeros: recalculados a cada leitura,
// nunca persistidos.

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DebtorEntry {
    pub client_id: Option<Uuid>,

    #[schema(example = "Dona Maria")]
    pub client_name: String,

    #[schema(example = "170.00")]
    pub total_owed: Decimal,

    #[schema(example = 2)]
    pub sales_count: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DebtSummary {
    #[schema(example = "170.00")]
    pub total_outstanding: Decimal,

    #[schema(example = 2)]
    pub open_count: usize,

    // Vendas fiado em aberto há mais de 30 dias
    #[schema(example = 1)]
    pub overdue_count: usize,

    pub top_debtors: Vec<DebtorEntry>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopSale {
    pub sale_id: Uuid,

    #[schema(example = "250.00")]
    pub total: Decimal,

    #[schema(example = "Dona Maria")]
    pub client_name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LowStockItem {
    #[schema(example = "Coca-Cola 2L")]
    pub name: String,

    #[schema(example = "2")]
    pub quantity: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyBriefing {
    #[schema(example = "320.00")]
    pub today_revenue: Decimal,

    #[schema(example = 4)]
    pub today_sales_count: usize,

    // Maior venda já registrada (não só do dia)
    pub top_sale: Option<TopSale>,

    pub debts: DebtSummary,

    pub low_stock: Vec<LowStockItem>,
}

/// Objeto de dados que o componente de mensagens de cobrança formata.
/// O núcleo não sabe nada de canal de envio (e-mail, WhatsApp etc.).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionNotice {
    pub sale_id: Uuid,

    #[schema(example = "Dona Maria")]
    pub client_name: String,

    pub sale_date: DateTime<Utc>,

    #[schema(example = "100.00")]
    pub total: Decimal,

    #[schema(example = "40.00")]
    pub paid_amount: Decimal,

    #[schema(example = "60.00")]
    pub remaining_amount: Decimal,

    // Resumo "2x Coca-Cola 2L, 1x Pão"
    #[schema(example = "2x Coca-Cola 2L, 1x Pão")]
    pub items_summary: String,

    pub payment_history: Vec<CollectionPayment>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPayment {
    #[schema(example = "40.00")]
    pub amount: Decimal,

    pub paid_at: DateTime<Utc>,

    pub notes: Option<String>,
}
