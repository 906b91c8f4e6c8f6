//! Binance REST client for the latest kline
//!
//! Unlike the other upstream clients this one rejects non-success statuses
//! before decoding.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::error::{InferenceError, Stage};
use crate::oracle::sources::{decode_json, join_url, require_symbol, CandleSource, SourceResult};
use crate::types::{Candle, Interval};

const BINANCE_REST_URL: &str = "https://api.binance.com";
const KLINES_PATH: &str = "/api/v3/klines";
const STAGE: Stage = Stage::Klines;

#[derive(Debug, Clone)]
pub struct BinanceClient {
    http: reqwest::Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_base_url(http, BINANCE_REST_URL)
    }

    pub fn with_base_url(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn klines_url(&self) -> String {
        join_url(&self.base_url, KLINES_PATH)
    }

    /// Decode a klines response and keep the first row.
    ///
    /// Row layout: `[open_time, open, high, low, close, volume, close_time, ...]`
    pub(crate) fn parse_klines(
        symbol: &str,
        interval: Interval,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> SourceResult<Candle> {
        let klines: Vec<Vec<serde_json::Value>> = decode_json(STAGE, body)?;

        let kline = klines.into_iter().next().ok_or(InferenceError::EmptyCandles)?;
        if kline.len() < 7 {
            return Err(InferenceError::decode(
                STAGE,
                format!("kline has {} fields, expected at least 7", kline.len()),
            ));
        }

        let open_time = millis_field(&kline, 0)?;
        let close_time = millis_field(&kline, 6)?;

        Ok(Candle {
            open_time,
            close_time,
            interval,
            symbol: symbol.to_string(),
            open: decimal_field(&kline, 1)?,
            high: decimal_field(&kline, 2)?,
            low: decimal_field(&kline, 3)?,
            close: decimal_field(&kline, 4)?,
            volume: decimal_field(&kline, 5)?,
            closed: close_time <= now,
        })
    }
}

fn decimal_field(kline: &[serde_json::Value], idx: usize) -> SourceResult<String> {
    kline[idx]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| InferenceError::decode(STAGE, format!("kline field {} is not a string", idx)))
}

fn millis_field(kline: &[serde_json::Value], idx: usize) -> SourceResult<DateTime<Utc>> {
    kline[idx]
        .as_i64()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .ok_or_else(|| {
            InferenceError::decode(STAGE, format!("kline field {} is not a timestamp", idx))
        })
}

#[async_trait]
impl CandleSource for BinanceClient {
    async fn last_candle(&self, symbol: &str, interval: Interval) -> SourceResult<Candle> {
        require_symbol(STAGE, symbol)?;

        let now = Utc::now();
        let end_time = now.timestamp_millis().to_string();
        let url = self.klines_url();

        tracing::debug!(
            symbol = %symbol,
            interval = %interval,
            url = %url,
            "Fetching latest kline from Binance"
        );

        let response = self
            .http
            .get(&url)
            .query(&[
                ("endTime", end_time.as_str()),
                ("limit", "1"),
                ("symbol", symbol),
                ("interval", interval.as_str()),
            ])
            .send()
            .await
            .map_err(|e| InferenceError::transport(STAGE, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::Status {
                stage: STAGE,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| InferenceError::transport(STAGE, e))?;

        Self::parse_klines(symbol, interval, &body, now)
    }
}
