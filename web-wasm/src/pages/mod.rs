pub mod dashboard;
pub mod discovery;
pub mod login;
pub mod logistics;
pub mod multi_discovery;
pub mod register;
pub mod valuation;
pub mod verification;
