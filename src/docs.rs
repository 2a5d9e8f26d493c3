// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Vendas ---
        handlers::sales::create_sale,
        handlers::sales::list_sales,
        handlers::sales::get_sale,
        handlers::sales::get_collection_notice,

        // --- Pagamentos ---
        handlers::payments::register_payment,
        handlers::payments::list_payments,

        // --- Dashboard ---
        handlers::dashboard::get_debt_summary,
        handlers::dashboard::get_daily_briefing,

        // --- Financeiro ---
        handlers::finance::sync_stock_expenses,
        handlers::finance::list_entries,
    ),
    components(
        schemas(
            // --- Vendas ---
            models::sale::PaymentMethod,
            models::sale::PaymentStatus,
            models::sale::SaleItem,
            models::sale::Sale,
            handlers::sales::CreateSalePayload,
            handlers::sales::SaleDetailResponse,

            // --- Pagamentos ---
            models::payment::SettlementMethod,
            models::payment::SalePayment,
            handlers::payments::RegisterPaymentPayload,
            handlers::payments::RegisterPaymentResponse,

            // --- Dashboard ---
            models::dashboard::DebtSummary,
            models::dashboard::DebtorEntry,
            models::dashboard::DailyBriefing,
            models::dashboard::TopSale,
            models::dashboard::LowStockItem,
            models::dashboard::CollectionNotice,
            models::dashboard::CollectionPayment,

            // --- Financeiro ---
            models::finance::EntryKind,
            models::finance::FinanceEntry,
            models::finance::StockSyncOutcome,
            models::finance::StockSyncReport,

            // --- Produtos ---
            models::product::Product,
        )
    ),
    tags(
        (name = "Vendas", description = "Caderno de vendas (fiado e à vista)"),
        (name = "Pagamentos", description = "Pagamentos parciais contra vendas fiado"),
        (name = "Dashboard", description = "Rollups de dívidas e briefing do dia"),
        (name = "Financeiro", description = "Diário financeiro e sincronização de estoque")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
