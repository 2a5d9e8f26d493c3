pub mod sales_repo;
pub use sales_repo::SalesRepository;
pub mod payments_repo;
pub use payments_repo::PaymentsRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;
pub mod products_repo;
pub use products_repo::ProductsRepository;
