//! Price Inference Library
//!
//! Blends exchange candles, spot quotes and token oracle data into price
//! estimates served over HTTP

pub mod config;
pub mod error;
pub mod oracle;
pub mod server;
pub mod service;
pub mod types;
