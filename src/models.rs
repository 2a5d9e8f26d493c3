pub mod dashboard;
pub mod finance;
pub mod payment;
pub mod product;
pub mod sale;
