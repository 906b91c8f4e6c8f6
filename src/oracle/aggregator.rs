//! Price Aggregator - Blends the exchange forecast with two spot quotes
//!
//! The exchange candle is mandatory. The two spot providers are best-effort:
//! a failed quote is logged and counts as zero in the blend, which drags the
//! result toward zero. That trade of correctness for availability is kept
//! on purpose and is visible through the `Option` readings.

use std::sync::Arc;

use crate::config::Credentials;
use crate::error::{InferenceError, Stage};
use crate::oracle::forecast::forecast;
use crate::oracle::noise::UnitSampler;
use crate::oracle::sources::{require_symbol, CandleSource, SpotPriceSource};
use crate::types::{AggregatedPrice, Interval};

/// Quote asset appended to the token to form the exchange symbol
const QUOTE_ASSET: &str = "USDT";
/// Number of contributions in the blend, failed readings included
const BLEND_INPUTS: f64 = 3.0;

/// Spot price fetch that degrades to `None` instead of failing the request
pub struct BestEffort<'a> {
    source: &'a dyn SpotPriceSource,
}

impl<'a> BestEffort<'a> {
    pub fn new(source: &'a dyn SpotPriceSource) -> Self {
        Self { source }
    }

    pub async fn fetch(&self, token: &str, api_key: &str) -> Option<f64> {
        match self.source.spot_price(token, api_key).await {
            Ok(price) => Some(price),
            Err(e) => {
                tracing::warn!(
                    source = self.source.name(),
                    token = %token,
                    error = %e,
                    "Spot price unavailable, counting it as zero"
                );
                None
            }
        }
    }
}

/// Orchestrates the forecast and both spot lookups for one token
pub struct PriceAggregator {
    candles: Arc<dyn CandleSource>,
    coingecko: Arc<dyn SpotPriceSource>,
    cryptocompare: Arc<dyn SpotPriceSource>,
    sampler: Arc<dyn UnitSampler>,
}

impl PriceAggregator {
    pub fn new(
        candles: Arc<dyn CandleSource>,
        coingecko: Arc<dyn SpotPriceSource>,
        cryptocompare: Arc<dyn SpotPriceSource>,
        sampler: Arc<dyn UnitSampler>,
    ) -> Self {
        Self {
            candles,
            coingecko,
            cryptocompare,
            sampler,
        }
    }

    /// Exchange symbol for a token, e.g. `BTC` -> `BTCUSDT`
    pub fn exchange_symbol(token: &str) -> String {
        format!("{}{}", token, QUOTE_ASSET)
    }

    /// Arithmetic mean of the three contributions; missing readings count as 0
    pub fn blend(exchange: f64, coingecko: Option<f64>, cryptocompare: Option<f64>) -> f64 {
        (exchange + coingecko.unwrap_or(0.0) + cryptocompare.unwrap_or(0.0)) / BLEND_INPUTS
    }

    /// Produce the blended price for `token`.
    ///
    /// Fails only if the candle fetch or the forecast fails. Spot lookups run
    /// one after the other.
    pub async fn aggregate(
        &self,
        token: &str,
        credentials: &Credentials,
    ) -> Result<AggregatedPrice, InferenceError> {
        require_symbol(Stage::Klines, token)?;

        let symbol = Self::exchange_symbol(token);
        let candle = self.candles.last_candle(&symbol, Interval::Min15).await?;
        let projection = forecast(&candle, self.sampler.as_ref())?;

        tracing::debug!(
            symbol = %symbol,
            close = %candle.close,
            change_rate = projection.change_rate,
            adjusted_rate = projection.adjusted_rate,
            projected = projection.price,
            "Exchange forecast computed"
        );

        let coingecko = BestEffort::new(self.coingecko.as_ref())
            .fetch(token, &credentials.coingecko_api_key)
            .await;
        let cryptocompare = BestEffort::new(self.cryptocompare.as_ref())
            .fetch(token, &credentials.cryptocompare_api_key)
            .await;

        Ok(AggregatedPrice {
            price: Self::blend(projection.price, coingecko, cryptocompare),
            exchange_price: projection.price,
            coingecko_price: coingecko,
            cryptocompare_price: cryptocompare,
        })
    }
}
