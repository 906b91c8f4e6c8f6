//! HTTP response DTOs

use serde::{Deserialize, Serialize};

use crate::types::AggregatedPrice;

/// Body of a crypto inference. Unavailable spot readings serialize as 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CryptoInferenceResponse {
    pub price: f64,
    pub binance_price: f64,
    pub coingecko_price: f64,
    pub cryptocompare_price: f64,
}

impl From<AggregatedPrice> for CryptoInferenceResponse {
    fn from(agg: AggregatedPrice) -> Self {
        Self {
            price: agg.price,
            binance_price: agg.exchange_price,
            coingecko_price: agg.coingecko_price.unwrap_or(0.0),
            cryptocompare_price: agg.cryptocompare_price.unwrap_or(0.0),
        }
    }
}

/// Shortest round-trip decimal, switching to exponent form (`1.23e-05`)
/// when the decimal exponent is below -4 or at least 6.
pub fn plain_price(price: f64) -> String {
    if price.is_nan() {
        return "NaN".to_string();
    }
    if price.is_infinite() {
        return if price > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }

    let sci = format!("{:e}", price);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return price.to_string(),
    };

    if price != 0.0 && (exp < -4 || exp >= 6) {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.abs())
    } else {
        price.to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
