pub mod dashboard;
pub mod finance;
pub mod payments;
pub mod sales;
