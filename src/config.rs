// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{FinanceRepository, PaymentsRepository, ProductsRepository, SalesRepository},
    services::{
        auth::AuthService, briefing_service::BriefingService, ledger_service::LedgerService,
        reconciliation_service::ReconciliationService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub ledger_service: LedgerService,
    pub briefing_service: BriefingService,
    pub reconciliation_service: ReconciliationService,
    pub finance_repo: FinanceRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let sales_repo = SalesRepository::new(db_pool.clone());
        let payments_repo = PaymentsRepository::new(db_pool.clone());
        let finance_repo = FinanceRepository::new(db_pool.clone());
        let products_repo = ProductsRepository::new(db_pool.clone());

        let auth_service = AuthService::new(jwt_secret);
        let ledger_service = LedgerService::new(
            sales_repo.clone(),
            payments_repo,
            finance_repo.clone(),
            db_pool.clone(),
        );
        let briefing_service = BriefingService::new(sales_repo, products_repo.clone());
        let reconciliation_service =
            ReconciliationService::new(products_repo, finance_repo.clone(), db_pool.clone());

        Ok(Self {
            db_pool,
            auth_service,
            ledger_service,
            briefing_service,
            reconciliation_service,
            finance_repo,
        })
    }
}
