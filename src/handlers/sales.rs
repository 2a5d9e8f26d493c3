// src/handlers/sales.rs

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
        dashboard::CollectionNotice,
        payment::SalePayment,
        sale::{PaymentMethod, Sale, SaleItem},
    },
    services::ledger_service::CreateSaleCommand,
};

// ---
// Validação customizada para Decimal
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: CreateSale
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalePayload {
    pub client_id: Option<Uuid>,

    #[schema(example = "Dona Maria")]
    pub client_name: Option<String>,

    #[validate(length(min = 1, message = "A venda precisa de pelo menos um item."))]
    pub items: Vec<SaleItem>,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)] // Se o JSON não tiver esse campo, assume 0
    pub discount: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub loan_amount: Decimal,

    pub payment_method: PaymentMethod,

    // Entrada inicial; venda à vista sem esse campo é quitada no total
    pub paid_amount: Option<Decimal>,

    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetailResponse {
    pub sale: Sale,
    pub payments: Vec<SalePayment>,
}

// POST /api/sales
#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "Vendas",
    request_body = CreateSalePayload,
    responses(
        (status = 201, description = "Venda criada (fiado ou à vista)", body = Sale),
        (status = 400, description = "Campos inválidos"),
        (status = 401, description = "Não autorizado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let sale = app_state
        .ledger_service
        .create_sale(
            user.0,
            CreateSaleCommand {
                client_id: payload.client_id,
                client_name: payload.client_name,
                items: payload.items,
                discount: payload.discount,
                loan_amount: payload.loan_amount,
                payment_method: payload.payment_method,
                paid_amount: payload.paid_amount,
                notes: payload.notes,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(sale)))
}

// GET /api/sales
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Vendas",
    responses(
        (status = 200, description = "Vendas do usuário, mais recentes primeiro", body = Vec<Sale>),
        (status = 401, description = "Não autorizado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let sales = app_state.ledger_service.list_sales(user.0).await?;
    Ok((StatusCode::OK, Json(sales)))
}

// GET /api/sales/{id}
#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    tag = "Vendas",
    params(
        ("id" = Uuid, Path, description = "ID da venda")
    ),
    responses(
        (status = 200, description = "Venda com o diário de pagamentos", body = SaleDetailResponse),
        (status = 404, description = "Venda não encontrada")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_sale(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(sale_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (sale, payments) = app_state.ledger_service.get_sale_detail(user.0, sale_id).await?;
    Ok((StatusCode::OK, Json(SaleDetailResponse { sale, payments })))
}

// GET /api/sales/{id}/collection-notice
#[utoipa::path(
    get,
    path = "/api/sales/{id}/collection-notice",
    tag = "Vendas",
    params(
        ("id" = Uuid, Path, description = "ID da venda")
    ),
    responses(
        (status = 200, description = "Dados para o lembrete de cobrança", body = CollectionNotice),
        (status = 404, description = "Venda não encontrada")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_collection_notice(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(sale_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let notice = app_state.ledger_service.collection_notice(user.0, sale_id).await?;
    Ok((StatusCode::OK, Json(notice)))
}
