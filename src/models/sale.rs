// src/models/sale.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,            // Dinheiro
    InstantTransfer, // Pix
    Credit,          // Fiado
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending, // Nada pago
    Partial, // Pago parcialmente
    Paid,    // Quitado
}

impl PaymentStatus {
    /// Status é sempre derivado do saldo, nunca gravado livremente.
    pub fn derive(paid_amount: Decimal, remaining_amount: Decimal) -> Self {
        if remaining_amount <= Decimal::ZERO {
            PaymentStatus::Paid
        } else if paid_amount > Decimal::ZERO {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Pending
        }
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    #[schema(example = "Coca-Cola 2L")]
    pub name: String,

    #[schema(example = "9.50")]
    pub unit_price: Decimal,

    #[schema(example = 2)]
    pub quantity: u32,
}

impl SaleItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Soma dos itens; é o único lugar que calcula o subtotal de uma venda.
pub fn items_subtotal(items: &[SaleItem]) -> Decimal {
    items.iter().map(SaleItem::line_total).sum()
}

/// A venda é a dona do saldo: `total` imutável após a criação,
/// `paid_amount + remaining_amount == total` sempre.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,

    #[schema(ignore)]
    pub owner_id: Uuid,

    pub client_id: Option<Uuid>,

    #[schema(example = "Dona Maria")]
    pub client_name: Option<String>,

    #[schema(value_type = Vec<SaleItem>)]
    pub items: Json<Vec<SaleItem>>,

    #[schema(example = "100.00")]
    pub subtotal: Decimal,

    #[schema(example = "0.00")]
    pub discount: Decimal,

    // Empréstimo em dinheiro somado por cima da compra
    #[schema(example = "0.00")]
    pub loan_amount: Decimal,

    #[schema(example = "100.00")]
    pub total: Decimal,

    #[schema(example = "40.00")]
    pub paid_amount: Decimal,

    #[schema(example = "60.00")]
    pub remaining_amount: Decimal,

    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,

    // Sequência de concorrência otimista: todo UPDATE de saldo carrega a versão lida.
    #[schema(example = 0)]
    pub version: i32,

    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Resultado puro de aplicar um pagamento sobre o saldo atual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceUpdate {
    pub paid_amount: Decimal,
    pub remaining_amount: Decimal,
    pub payment_status: PaymentStatus,
}

impl Sale {
    /// Valida e calcula o novo saldo para um pagamento de `amount`.
    /// Não tem efeito colateral: rejeição deixa a venda intacta.
    pub fn apply_payment(&self, amount: Decimal) -> Result<BalanceUpdate, AppError> {
        if self.payment_method != PaymentMethod::Credit {
            return Err(AppError::PaymentOutOfRange(
                "Apenas vendas fiado aceitam pagamentos parciais.".into(),
            ));
        }
        if self.payment_status == PaymentStatus::Paid || self.remaining_amount <= Decimal::ZERO {
            return Err(AppError::PaymentOutOfRange(
                "Esta venda já está quitada.".into(),
            ));
        }
        if amount <= Decimal::ZERO {
            return Err(AppError::PaymentOutOfRange(
                "O valor do pagamento deve ser maior que zero.".into(),
            ));
        }
        if amount > self.remaining_amount {
            return Err(AppError::PaymentOutOfRange(format!(
                "O valor deve ser entre R$ 0,01 e R$ {}.",
                self.remaining_amount
            )));
        }

        let paid_amount = self.paid_amount + amount;
        let remaining_amount = self.remaining_amount - amount;

        Ok(BalanceUpdate {
            paid_amount,
            remaining_amount,
            payment_status: PaymentStatus::derive(paid_amount, remaining_amount),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn credit_sale(total: &str, paid: &str) -> Sale {
        let total = dec(total);
        let paid = dec(paid);
        let remaining = total - paid;
        Sale {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            client_id: None,
            client_name: Some("Dona Maria".into()),
            items: Json(vec![SaleItem {
                name: "Produto".into(),
                unit_price: total,
                quantity: 1,
            }]),
            subtotal: total,
            discount: Decimal::ZERO,
            loan_amount: Decimal::ZERO,
            total,
            paid_amount: paid,
            remaining_amount: remaining,
            payment_method: PaymentMethod::Credit,
            payment_status: PaymentStatus::derive(paid, remaining),
            version: 0,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn status_derivado_do_saldo() {
        // remaining == total, nada pago => pendente
        assert_eq!(
            PaymentStatus::derive(dec("0"), dec("100")),
            PaymentStatus::Pending
        );
        // 0 < paid < total => parcial
        assert_eq!(
            PaymentStatus::derive(dec("40"), dec("60")),
            PaymentStatus::Partial
        );
        // remaining <= 0 => pago
        assert_eq!(
            PaymentStatus::derive(dec("100"), dec("0")),
            PaymentStatus::Paid
        );
        assert_eq!(
            PaymentStatus::derive(dec("100.00"), dec("-0.01")),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn venda_fiado_nasce_pendente() {
        let sale = credit_sale("100.00", "0");
        assert_eq!(sale.payment_status, PaymentStatus::Pending);
        assert_eq!(sale.remaining_amount, dec("100.00"));
    }

    #[test]
    fn pagamento_parcial_mantem_invariante_do_saldo() {
        let sale = credit_sale("100.00", "0");
        let update = sale.apply_payment(dec("40.00")).unwrap();

        assert_eq!(update.paid_amount, dec("40.00"));
        assert_eq!(update.remaining_amount, dec("60.00"));
        assert_eq!(update.payment_status, PaymentStatus::Partial);
        // paid + remaining == total, sempre
        assert_eq!(update.paid_amount + update.remaining_amount, sale.total);
    }

    #[test]
    fn pagamento_final_quita_a_venda() {
        let sale = credit_sale("100.00", "40.00");
        let update = sale.apply_payment(dec("60.00")).unwrap();

        assert_eq!(update.paid_amount, dec("100.00"));
        assert_eq!(update.remaining_amount, dec("0.00"));
        assert_eq!(update.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn pagamento_acima_do_restante_rejeitado_sem_efeito() {
        let sale = credit_sale("100.00", "40.00");
        let before = (sale.paid_amount, sale.remaining_amount, sale.payment_status);

        let err = sale.apply_payment(dec("70.01"));
        assert!(matches!(err, Err(AppError::PaymentOutOfRange(_))));

        // A venda não muda em nada numa rejeição.
        assert_eq!(
            before,
            (sale.paid_amount, sale.remaining_amount, sale.payment_status)
        );
    }

    #[test]
    fn pagamento_nao_positivo_rejeitado() {
        let sale = credit_sale("100.00", "0");
        assert!(sale.apply_payment(Decimal::ZERO).is_err());
        assert!(sale.apply_payment(dec("-5.00")).is_err());
    }

    #[test]
    fn venda_quitada_nao_aceita_pagamento() {
        let sale = credit_sale("100.00", "100.00");
        assert!(sale.apply_payment(dec("0.01")).is_err());
    }

    #[test]
    fn venda_a_vista_nao_aceita_pagamento_parcial() {
        let mut sale = credit_sale("100.00", "0");
        sale.payment_method = PaymentMethod::Cash;
        assert!(sale.apply_payment(dec("10.00")).is_err());
    }

    #[test]
    fn paid_amount_nunca_regride_em_sequencia_de_pagamentos() {
        let mut sale = credit_sale("100.00", "0");
        let mut last_paid = sale.paid_amount;

        for amount in ["10.00", "15.50", "30.00"] {
            let update = sale.apply_payment(dec(amount)).unwrap();
            assert!(update.paid_amount > last_paid);
            // status nunca regride de pago para parcial/pendente
            if sale.payment_status == PaymentStatus::Paid {
                assert_eq!(update.payment_status, PaymentStatus::Paid);
            }
            sale.paid_amount = update.paid_amount;
            sale.remaining_amount = update.remaining_amount;
            sale.payment_status = update.payment_status;
            last_paid = update.paid_amount;
        }

        assert_eq!(sale.paid_amount, dec("55.50"));
        assert_eq!(sale.remaining_amount, dec("44.50"));
        assert_eq!(sale.payment_status, PaymentStatus::Partial);
    }

    #[test]
    fn subtotal_soma_itens() {
        let items = vec![
            SaleItem { name: "Arroz".into(), unit_price: dec("25.90"), quantity: 2 },
            SaleItem { name: "Feijão".into(), unit_price: dec("8.50"), quantity: 3 },
        ];
        assert_eq!(items_subtotal(&items), dec("77.30"));
    }
}
