// src/handlers/payments.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        payment::{SalePayment, SettlementMethod},
        sale::Sale,
    },
};

fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPaymentPayload {
    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "40.00")]
    pub amount: Decimal,

    pub method: SettlementMethod,

    #[schema(example = "Pagou metade, volta sexta")]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPaymentResponse {
    pub sale: Sale,
    pub payment: SalePayment,
}

// POST /api/sales/{id}/payments
#[utoipa::path(
    post,
    path = "/api/sales/{id}/payments",
    tag = "Pagamentos",
    params(
        ("id" = Uuid, Path, description = "ID da venda")
    ),
    request_body = RegisterPaymentPayload,
    responses(
        (status = 201, description = "Pagamento registrado; saldo e diário atualizados juntos", body = RegisterPaymentResponse),
        (status = 400, description = "Valor fora do intervalo permitido"),
        (status = 404, description = "Venda não encontrada"),
        (status = 409, description = "Conflito de versão (submissão concorrente)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn register_payment(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(sale_id): Path<Uuid>,
    Json(payload): Json<RegisterPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (sale, payment) = app_state
        .ledger_service
        .register_payment(
            user.0,
            sale_id,
            payload.amount,
            payload.method,
            payload.notes.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(RegisterPaymentResponse { sale, payment })))
}

// GET /api/sales/{id}/payments
#[utoipa::path(
    get,
    path = "/api/sales/{id}/payments",
    tag = "Pagamentos",
    params(
        ("id" = Uuid, Path, description = "ID da venda")
    ),
    responses(
        (status = 200, description = "Diário de pagamentos da venda", body = Vec<SalePayment>),
        (status = 404, description = "Venda não encontrada")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_payments(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(sale_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (_sale, payments) = app_state.ledger_service.get_sale_detail(user.0, sale_id).await?;
    Ok((StatusCode::OK, Json(payments)))
}
