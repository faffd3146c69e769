//! Arbitrage OS ダッシュボード（ターミナル版）

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod session_file;

pub use client::ApiClient;
pub use error::{DashError, Result};
pub use session_file::FileStore;
