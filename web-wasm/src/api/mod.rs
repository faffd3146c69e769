pub mod client;

pub use client::use_api;
