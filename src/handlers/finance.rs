// src/handlers/finance.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::finance::{FinanceEntry, StockSyncReport},
};

// POST /api/finance/sync-stock
#[utoipa::path(
    post,
    path = "/api/finance/sync-stock",
    tag = "Financeiro",
    responses(
        (status = 200, description = "Resultado da sincronização (no-op, ajuste ou revisão manual)", body = StockSyncReport),
        (status = 401, description = "Não autorizado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn sync_stock_expenses(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.reconciliation_service.sync_stock_expenses(user.0).await?;
    Ok((StatusCode::OK, Json(report)))
}

// GET /api/finance/entries
#[utoipa::path(
    get,
    path = "/api/finance/entries",
    tag = "Financeiro",
    responses(
        (status = 200, description = "Diário financeiro do usuário, mais recentes primeiro", body = Vec<FinanceEntry>),
        (status = 401, description = "Não autorizado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_entries(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let mut entries = app_state.finance_repo.list_by_owner(user.0).await?;
    // Ordenação no cliente, como nas demais listagens.
    entries.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));
    Ok((StatusCode::OK, Json(entries)))
}
