//! `SeaORM` entities backing the admin service.

pub mod deposit_requests;
pub mod investment_plans;
pub mod investments;
pub mod job_runs;
pub mod roi_logs;
pub mod users;
pub mod wallet_transactions;
