pub mod auth;
pub mod briefing_service;
pub mod ledger_service;
pub mod reconciliation_service;
