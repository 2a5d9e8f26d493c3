// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::dashboard::{DailyBriefing, DebtSummary},
};

// GET /api/dashboard/debts
#[utoipa::path(
    get,
    path = "/api/dashboard/debts",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Resumo de dívidas: total em aberto, vencidas e maiores devedores", body = DebtSummary),
        (status = 401, description = "Não autorizado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_debt_summary(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.briefing_service.debt_summary(user.0).await?;
    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/dashboard/briefing
#[utoipa::path(
    get,
    path = "/api/dashboard/briefing",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Briefing do dia: faturamento, maior venda, dívidas e estoque baixo", body = DailyBriefing),
        (status = 401, description = "Não autorizado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_daily_briefing(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let briefing = app_state.briefing_service.daily_briefing(user.0).await?;
    Ok((StatusCode::OK, Json(briefing)))
}
