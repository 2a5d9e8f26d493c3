// src/services/briefing_service.rs

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProductsRepository, SalesRepository},
    models::{
        dashboard::{DailyBriefing, DebtSummary, DebtorEntry, LowStockItem, TopSale},
        product::Product,
        sale::{PaymentMethod, PaymentStatus, Sale},
    },
};

// Limiares fixos do produto: dívida vira "vencida" depois de 30 dias da
// venda; o ranking de devedores mostra os 5 maiores; o briefing lista os
// 3 produtos mais críticos.
const OVERDUE_AFTER_DAYS: i64 = 30;
const TOP_DEBTORS: usize = 5;
const LOW_STOCK_ITEMS: usize = 3;

fn is_open_debt(sale: &Sale) -> bool {
    sale.payment_method == PaymentMethod::Credit
        && sale.remaining_amount > Decimal::ZERO
        && sale.payment_status != PaymentStatus::Paid
}

fn debtor_key(sale: &Sale) -> String {
    if let Some(id) = sale.client_id {
        return id.to_string();
    }
    sale.client_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("Cliente avulso")
        .to_string()
}

fn debtor_label(sale: &Sale) -> String {
    sale.client_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("Cliente avulso")
        .to_string()
}

/// Rollup de dívidas sobre o conjunto completo de vendas fiado do usuário.
/// Tudo em memória: a loja de registros só oferece filtro de igualdade.
pub fn summarize_debts(sales: &[Sale], now: DateTime<Utc>, top_n: usize) -> DebtSummary {
    let open: Vec<&Sale> = sales.iter().filter(|s| is_open_debt(s)).collect();

    let total_outstanding: Decimal = open.iter().map(|s| s.remaining_amount).sum();

    let overdue_cutoff = now - Duration::days(OVERDUE_AFTER_DAYS);
    let overdue_count = open.iter().filter(|s| s.created_at < overdue_cutoff).count();

    // Agrupa por cliente (id quando existe, nome livre como reserva).
    let mut by_client: HashMap<String, DebtorEntry> = HashMap::new();
    for sale in &open {
        let entry = by_client.entry(debtor_key(sale)).or_insert_with(|| DebtorEntry {
            client_id: sale.client_id,
            client_name: debtor_label(sale),
            total_owed: Decimal::ZERO,
            sales_count: 0,
        });
        entry.total_owed += sale.remaining_amount;
        entry.sales_count += 1;
    }

    let mut top_debtors: Vec<DebtorEntry> = by_client.into_values().collect();
    top_debtors.sort_by(|a, b| b.total_owed.cmp(&a.total_owed));
    top_debtors.truncate(top_n);

    DebtSummary {
        total_outstanding,
        open_count: open.len(),
        overdue_count,
        top_debtors,
    }
}

/// Briefing do dia: faturamento de hoje, maior venda já registrada, bloco de
/// dívidas e produtos precisando de reposição. Rollups independentes sobre a
/// mesma varredura completa.
pub fn build_briefing(sales: &[Sale], products: &[Product], now: DateTime<Utc>) -> DailyBriefing {
    let today = now.date_naive();
    let today_sales: Vec<&Sale> =
        sales.iter().filter(|s| s.created_at.date_naive() == today).collect();

    let today_revenue: Decimal = today_sales.iter().map(|s| s.total).sum();

    let top_sale = sales
        .iter()
        .max_by(|a, b| a.total.cmp(&b.total))
        .map(|sale| TopSale {
            sale_id: sale.id,
            total: sale.total,
            client_name: debtor_label(sale),
        });

    let mut low: Vec<&Product> = products.iter().filter(|p| p.is_low_stock()).collect();
    low.sort_by(|a, b| a.quantity.cmp(&b.quantity));
    let low_stock = low
        .into_iter()
        .take(LOW_STOCK_ITEMS)
        .map(|p| LowStockItem { name: p.name.clone(), quantity: p.quantity })
        .collect();

    DailyBriefing {
        today_revenue,
        today_sales_count: today_sales.len(),
        top_sale,
        debts: summarize_debts(sales, now, TOP_DEBTORS),
        low_stock,
    }
}

#[derive(Clone)]
pub struct BriefingService {
    sales_repo: SalesRepository,
    products_repo: ProductsRepository,
}

impl BriefingService {
    pub fn new(sales_repo: SalesRepository, products_repo: ProductsRepository) -> Self {
        Self { sales_repo, products_repo }
    }

    pub async fn debt_summary(&self, owner_id: Uuid) -> Result<DebtSummary, AppError> {
        let sales = self
            .sales_repo
            .list_by_owner_and_method(owner_id, PaymentMethod::Credit)
            .await?;

        Ok(summarize_debts(&sales, Utc::now(), TOP_DEBTORS))
    }

    pub async fn daily_briefing(&self, owner_id: Uuid) -> Result<DailyBriefing, AppError> {
        let sales = self.sales_repo.list_by_owner(owner_id).await?;
        let products = self.products_repo.list_by_owner(owner_id).await?;

        Ok(build_briefing(&sales, &products, Utc::now()))
    }
}
