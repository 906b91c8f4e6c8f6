//! Core types used throughout the inference node
//!
//! Every value here is request-scoped: built while answering one inference
//! call and dropped with the response.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

/// Candle intervals understood by the exchange client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Min15,
}

impl Interval {
    /// Interval code used by the Binance klines endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Min15 => "15m",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One OHLCV sample as reported by the exchange.
///
/// Prices and volume stay in the exchange's decimal-string form; the
/// forecast estimator parses only what it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub close_time: DateTime<Utc>,
    pub interval: Interval,
    pub symbol: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
    /// True once the candle's close time has passed
    pub closed: bool,
}

/// Perturbed short-horizon projection derived from one candle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastResult {
    /// (close - open) / open
    pub change_rate: f64,
    /// Random multiplier in [0.1, 0.9)
    pub multiplier: f64,
    /// change_rate * (1 + multiplier)
    pub adjusted_rate: f64,
    /// close * (1 + adjusted_rate)
    pub price: f64,
}

/// Token resolved by the price oracle for a given block height
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OracleTokenRecord {
    pub token_id: String,
    pub token_symbol: String,
    pub platform: String,
    pub address: String,
}

/// Blended price and the three contributions behind it.
///
/// Spot readings are `None` when the provider failed; they count as zero in
/// the blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatedPrice {
    pub price: f64,
    pub exchange_price: f64,
    pub coingecko_price: Option<f64>,
    pub cryptocompare_price: Option<f64>,
}

/// Result of the meme oracle pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct MemeQuote {
    pub block_height: String,
    pub token: OracleTokenRecord,
    pub market_price: f64,
    pub price: f64,
}
