// src/services/ledger_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use validator::ValidationError;

use crate::{
    common::error::AppError,
    db::{sales_repo::NewSale, FinanceRepository, PaymentsRepository, SalesRepository},
    models::{
        dashboard::{CollectionNotice, CollectionPayment},
        finance::EntryKind,
        payment::{SalePayment, SettlementMethod},
        sale::{items_subtotal, PaymentMethod, PaymentStatus, Sale, SaleItem},
    },
};

/// Comando de criação já desserializado e validado pelo handler.
/// O serviço ainda reverifica as invariantes de saldo antes de gravar.
pub struct CreateSaleCommand {
    pub client_id: Option<Uuid>,
    pub client_name: Option<String>,
    pub items: Vec<SaleItem>,
    pub discount: Decimal,
    pub loan_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub paid_amount: Option<Decimal>,
    pub notes: Option<String>,
}

fn validation_error(field: &'static str, message: &str) -> AppError {
    let mut err = ValidationError::new("invalid");
    err.message = Some(message.to_string().into());
    let mut errors = validator::ValidationErrors::new();
    errors.add(field, err);
    AppError::ValidationError(errors)
}

/// Calcula subtotal, total, saldo inicial e status de uma venda nova.
/// Função pura: toda a aritmética de criação mora aqui.
pub fn plan_sale(owner_id: Uuid, cmd: CreateSaleCommand) -> Result<NewSale, AppError> {
    if cmd.items.is_empty() {
        return Err(validation_error("items", "A venda precisa de pelo menos um item."));
    }
    for item in &cmd.items {
        if item.quantity < 1 {
            return Err(validation_error("items", "Cada item precisa de quantidade >= 1."));
        }
        if item.unit_price < Decimal::ZERO {
            return Err(validation_error("items", "Preço unitário não pode ser negativo."));
        }
    }
    if cmd.discount < Decimal::ZERO {
        return Err(validation_error("discount", "O desconto não pode ser negativo."));
    }
    if cmd.loan_amount < Decimal::ZERO {
        return Err(validation_error("loanAmount", "O empréstimo não pode ser negativo."));
    }

    let subtotal = items_subtotal(&cmd.items);

    // Desconto acima do subtotal deixaria o total (e depois o restante)
    // negativo, quebrando as invariantes do saldo.
    if cmd.discount > subtotal {
        return Err(validation_error(
            "discount",
            "O desconto não pode ser maior que o subtotal.",
        ));
    }

    let total = subtotal - cmd.discount + cmd.loan_amount;

    // Venda à vista sem paid_amount informado é liquidada integralmente.
    let paid_amount = match cmd.payment_method {
        PaymentMethod::Credit => cmd.paid_amount.unwrap_or(Decimal::ZERO),
        _ => cmd.paid_amount.unwrap_or(total),
    };

    if paid_amount < Decimal::ZERO {
        return Err(validation_error("paidAmount", "O valor pago não pode ser negativo."));
    }
    if paid_amount > total {
        return Err(validation_error(
            "paidAmount",
            "O valor pago não pode ser maior que o total da venda.",
        ));
    }
    // Só venda fiado pode nascer com saldo em aberto.
    if cmd.payment_method != PaymentMethod::Credit && paid_amount != total {
        return Err(validation_error(
            "paidAmount",
            "Venda à vista deve ser quitada integralmente na criação.",
        ));
    }

    let remaining_amount = total - paid_amount;

    Ok(NewSale {
        owner_id,
        client_id: cmd.client_id,
        client_name: cmd.client_name,
        items: cmd.items,
        subtotal,
        discount: cmd.discount,
        loan_amount: cmd.loan_amount,
        total,
        paid_amount,
        remaining_amount,
        payment_method: cmd.payment_method,
        payment_status: PaymentStatus::derive(paid_amount, remaining_amount),
        notes: cmd.notes,
    })
}

fn client_label(sale: &Sale) -> String {
    sale.client_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("Cliente")
        .to_string()
}

#[derive(Clone)]
pub struct LedgerService {
    sales_repo: SalesRepository,
    payments_repo: PaymentsRepository,
    finance_repo: FinanceRepository,
    pool: PgPool,
}

impl LedgerService {
    pub fn new(
        sales_repo: SalesRepository,
        payments_repo: PaymentsRepository,
        finance_repo: FinanceRepository,
        pool: PgPool,
    ) -> Self {
        Self { sales_repo, payments_repo, finance_repo, pool }
    }

    pub async fn create_sale(
        &self,
        owner_id: Uuid,
        cmd: CreateSaleCommand,
    ) -> Result<Sale, AppError> {
        let new_sale = plan_sale(owner_id, cmd)?;
        let is_credit = new_sale.payment_method == PaymentMethod::Credit;

        let mut tx = self.pool.begin().await?;

        let sale = self.sales_repo.create_sale(&mut *tx, new_sale).await?;

        // Venda à vista entra no financeiro na hora. A receita de fiado é
        // reconhecida pagamento a pagamento, nunca na criação.
        if !is_credit {
            let description = format!("Venda - {}", client_label(&sale));
            self.finance_repo
                .append_entry(
                    &mut *tx,
                    owner_id,
                    EntryKind::Income,
                    "Vendas",
                    &description,
                    sale.total,
                    Some(sale.id),
                    true,
                    false,
                )
                .await?;
        }

        tx.commit().await?;

        tracing::info!(sale_id = %sale.id, total = %sale.total, "Venda registrada");
        Ok(sale)
    }

    /// Registra um pagamento parcial contra uma venda fiado.
    ///
    /// Tudo em uma transação só: releitura do saldo, escrita com trava de
    /// versão, apêndice no diário de pagamentos e receita no financeiro.
    /// Ou os três efeitos entram, ou nenhum.
    pub async fn register_payment(
        &self,
        owner_id: Uuid,
        sale_id: Uuid,
        amount: Decimal,
        method: SettlementMethod,
        notes: Option<&str>,
    ) -> Result<(Sale, SalePayment), AppError> {
        let mut tx = self.pool.begin().await?;

        // Relê o saldo no momento da operação, nunca o da tela.
        let mut sale = self
            .sales_repo
            .find_by_id(&mut *tx, owner_id, sale_id)
            .await?
            .ok_or(AppError::SaleNotFound)?;

        let update = sale.apply_payment(amount)?;

        let rows = self
            .sales_repo
            .update_balance(&mut *tx, owner_id, sale_id, &update, sale.version)
            .await?;
        if rows == 0 {
            // Outra submissão ganhou a corrida; nada foi gravado.
            return Err(AppError::VersionConflict);
        }

        let payment = self
            .payments_repo
            .append(&mut *tx, owner_id, sale_id, amount, method, notes)
            .await?;

        let description = format!("Pagamento fiado - {}", client_label(&sale));
        self.finance_repo
            .append_entry(
                &mut *tx,
                owner_id,
                EntryKind::Income,
                "Vendas",
                &description,
                amount,
                Some(sale_id),
                true,
                false,
            )
            .await?;

        tx.commit().await?;

        sale.paid_amount = update.paid_amount;
        sale.remaining_amount = update.remaining_amount;
        sale.payment_status = update.payment_status;
        sale.version += 1;
        sale.updated_at = payment.created_at;

        tracing::info!(
            sale_id = %sale.id,
            amount = %amount,
            remaining = %sale.remaining_amount,
            "Pagamento fiado registrado"
        );

        Ok((sale, payment))
    }

    pub async fn list_sales(&self, owner_id: Uuid) -> Result<Vec<Sale>, AppError> {
        let mut sales = self.sales_repo.list_by_owner(owner_id).await?;
        // Ordenação no cliente, espelhando a superfície mínima do repositório.
        sales.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sales)
    }

    pub async fn get_sale_detail(
        &self,
        owner_id: Uuid,
        sale_id: Uuid,
    ) -> Result<(Sale, Vec<SalePayment>), AppError> {
        let sale = self
            .sales_repo
            .find_by_id(&self.pool, owner_id, sale_id)
            .await?
            .ok_or(AppError::SaleNotFound)?;

        let mut payments = self.payments_repo.list_by_sale(owner_id, sale_id).await?;
        payments.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));

        Ok((sale, payments))
    }

    /// Monta o objeto de dados que o componente de cobrança transforma em
    /// texto. O núcleo não conhece canal de envio.
    pub async fn collection_notice(
        &self,
        owner_id: Uuid,
        sale_id: Uuid,
    ) -> Result<CollectionNotice, AppError> {
        let (sale, payments) = self.get_sale_detail(owner_id, sale_id).await?;
        Ok(build_collection_notice(&sale, &payments))
    }
}

pub fn build_collection_notice(sale: &Sale, payments: &[SalePayment]) -> CollectionNotice {
    let items_summary = sale
        .items
        .0
        .iter()
        .map(|item| format!("{}x {}", item.quantity, item.name))
        .collect::<Vec<_>>()
        .join(", ");

    CollectionNotice {
        sale_id: sale.id,
        client_name: client_label(sale),
        sale_date: sale.created_at,
        total: sale.total,
        paid_amount: sale.paid_amount,
        remaining_amount: sale.remaining_amount,
        items_summary,
        payment_history: payments
            .iter()
            .map(|p| CollectionPayment {
                amount: p.amount,
                paid_at: p.paid_at,
                notes: p.notes.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::types::Json;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn item(name: &str, price: &str, qty: u32) -> SaleItem {
        SaleItem { name: name.into(), unit_price: dec(price), quantity: qty }
    }

    fn credit_cmd(items: Vec<SaleItem>, paid: Option<&str>) -> CreateSaleCommand {
        CreateSaleCommand {
            client_id: None,
            client_name: Some("Dona Maria".into()),
            items,
            discount: Decimal::ZERO,
            loan_amount: Decimal::ZERO,
            payment_method: PaymentMethod::Credit,
            paid_amount: paid.map(dec),
            notes: None,
        }
    }

    #[test]
    fn venda_fiado_sem_entrada_nasce_pendente_com_saldo_cheio() {
        let owner = Uuid::new_v4();
        let planned = plan_sale(owner, credit_cmd(vec![item("Compra", "100.00", 1)], None)).unwrap();

        assert_eq!(planned.total, dec("100.00"));
        assert_eq!(planned.paid_amount, Decimal::ZERO);
        assert_eq!(planned.remaining_amount, dec("100.00"));
        assert_eq!(planned.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn total_soma_subtotal_menos_desconto_mais_emprestimo() {
        let owner = Uuid::new_v4();
        let mut cmd = credit_cmd(vec![item("Arroz", "25.00", 2), item("Feijão", "10.00", 5)], None);
        cmd.discount = dec("10.00");
        cmd.loan_amount = dec("20.00");

        let planned = plan_sale(owner, cmd).unwrap();
        assert_eq!(planned.subtotal, dec("100.00"));
        assert_eq!(planned.total, dec("110.00"));
        assert_eq!(planned.remaining_amount, dec("110.00"));
    }

    #[test]
    fn fiado_com_entrada_parcial_nasce_parcial() {
        let owner = Uuid::new_v4();
        let planned =
            plan_sale(owner, credit_cmd(vec![item("Compra", "100.00", 1)], Some("30.00"))).unwrap();

        assert_eq!(planned.paid_amount, dec("30.00"));
        assert_eq!(planned.remaining_amount, dec("70.00"));
        assert_eq!(planned.payment_status, PaymentStatus::Partial);
    }

    #[test]
    fn fiado_quitado_na_criacao_nasce_pago() {
        let owner = Uuid::new_v4();
        let planned =
            plan_sale(owner, credit_cmd(vec![item("Compra", "50.00", 1)], Some("50.00"))).unwrap();
        assert_eq!(planned.payment_status, PaymentStatus::Paid);
        assert_eq!(planned.remaining_amount, Decimal::ZERO);
    }

    #[test]
    fn venda_a_vista_sem_paid_amount_liquida_no_total() {
        let owner = Uuid::new_v4();
        let mut cmd = credit_cmd(vec![item("Compra", "80.00", 1)], None);
        cmd.payment_method = PaymentMethod::Cash;

        let planned = plan_sale(owner, cmd).unwrap();
        assert_eq!(planned.paid_amount, dec("80.00"));
        assert_eq!(planned.remaining_amount, Decimal::ZERO);
        assert_eq!(planned.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn venda_a_vista_com_saldo_em_aberto_rejeitada() {
        let owner = Uuid::new_v4();
        let mut cmd = credit_cmd(vec![item("Compra", "80.00", 1)], Some("50.00"));
        cmd.payment_method = PaymentMethod::InstantTransfer;

        assert!(matches!(plan_sale(owner, cmd), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn desconto_acima_do_subtotal_rejeitado() {
        let owner = Uuid::new_v4();
        let mut cmd = credit_cmd(vec![item("Compra", "50.00", 1)], None);
        cmd.discount = dec("50.01");

        assert!(matches!(plan_sale(owner, cmd), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn venda_sem_itens_rejeitada() {
        let owner = Uuid::new_v4();
        assert!(plan_sale(owner, credit_cmd(vec![], None)).is_err());
    }

    #[test]
    fn pago_acima_do_total_rejeitado() {
        let owner = Uuid::new_v4();
        let cmd = credit_cmd(vec![item("Compra", "50.00", 1)], Some("60.00"));
        assert!(plan_sale(owner, cmd).is_err());
    }

    #[test]
    fn aviso_de_cobranca_resume_itens_e_historico() {
        let now = Utc::now();
        let sale = Sale {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            client_id: None,
            client_name: Some("  Dona Maria  ".into()),
            items: Json(vec![item("Coca-Cola 2L", "9.50", 2), item("Pão", "0.75", 10)]),
            subtotal: dec("26.50"),
            discount: Decimal::ZERO,
            loan_amount: Decimal::ZERO,
            total: dec("26.50"),
            paid_amount: dec("10.00"),
            remaining_amount: dec("16.50"),
            payment_method: PaymentMethod::Credit,
            payment_status: PaymentStatus::Partial,
            version: 1,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        let payments = vec![SalePayment {
            id: Uuid::new_v4(),
            sale_id: sale.id,
            owner_id: sale.owner_id,
            amount: dec("10.00"),
            method: SettlementMethod::Cash,
            paid_at: now,
            notes: Some("Primeira parcela".into()),
            created_at: now,
        }];

        let notice = build_collection_notice(&sale, &payments);

        assert_eq!(notice.client_name, "Dona Maria");
        assert_eq!(notice.items_summary, "2x Coca-Cola 2L, 10x Pão");
        assert_eq!(notice.remaining_amount, dec("16.50"));
        assert_eq!(notice.payment_history.len(), 1);
        assert_eq!(notice.payment_history[0].amount, dec("10.00"));
    }

    #[test]
    fn cliente_sem_nome_vira_rotulo_generico() {
        let now = Utc::now();
        let sale = Sale {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            client_id: None,
            client_name: None,
            items: Json(vec![item("Pão", "0.75", 1)]),
            subtotal: dec("0.75"),
            discount: Decimal::ZERO,
            loan_amount: Decimal::ZERO,
            total: dec("0.75"),
            paid_amount: Decimal::ZERO,
            remaining_amount: dec("0.75"),
            payment_method: PaymentMethod::Credit,
            payment_status: PaymentStatus::Pending,
            version: 0,
            notes: None,
            created_at: now,
            updated_at: now,
        };

        let notice = build_collection_notice(&sale, &[]);
        assert_eq!(notice.client_name, "Cliente");
    }
}
