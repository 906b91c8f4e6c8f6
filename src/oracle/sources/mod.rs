//! Upstream price sources (Binance, CoinGecko, CryptoCompare, node, Upshot, GeckoTerminal)
//!
//! Each client issues a single GET per call and decodes the body into a typed
//! result. Only the exchange client checks the HTTP status; the others decode
//! whatever body comes back.

mod binance;
mod coingecko;
mod cryptocompare;
mod geckoterminal;
mod node;
mod upshot;

pub use binance::BinanceClient;
pub use coingecko::CoinGeckoClient;
pub use cryptocompare::CryptoCompareClient;
pub use geckoterminal::GeckoTerminalClient;
pub use node::NodeStatusClient;
pub use upshot::UpshotClient;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::{InferenceError, Stage};
use crate::types::{Candle, Interval, OracleTokenRecord};

pub type SourceResult<T> = Result<T, InferenceError>;

/// Exchange candle feed
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Most recent candle for `symbol` ending now
    async fn last_candle(&self, symbol: &str, interval: Interval) -> SourceResult<Candle>;
}

/// Generic spot price quote provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpotPriceSource: Send + Sync {
    /// Get the source name
    fn name(&self) -> &'static str;

    /// USD spot price for `token`
    async fn spot_price(&self, token: &str, api_key: &str) -> SourceResult<f64>;
}

/// Chain node status endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainStatusSource: Send + Sync {
    /// Latest block height as reported by `{rpc}/status`
    async fn latest_block_height(&self, rpc: &str) -> SourceResult<String>;
}

/// Oracle mapping a block height to a token
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenOracleSource: Send + Sync {
    async fn token_at_height(&self, height: &str, api_key: &str)
        -> SourceResult<OracleTokenRecord>;
}

/// Market data keyed by platform and token address
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenMarketSource: Send + Sync {
    /// Token price as the provider's decimal string
    async fn token_price(&self, platform: &str, address: &str) -> SourceResult<String>;
}

pub(crate) fn require_symbol(stage: Stage, symbol: &str) -> SourceResult<()> {
    if symbol.trim().is_empty() {
        return Err(InferenceError::EmptySymbol { stage });
    }
    Ok(())
}

pub(crate) fn decode_json<T: DeserializeOwned>(stage: Stage, body: &[u8]) -> SourceResult<T> {
    serde_json::from_slice(body).map_err(|e| InferenceError::decode(stage, e))
}

/// Read the full body without looking at the status code
pub(crate) async fn read_body(stage: Stage, response: reqwest::Response) -> SourceResult<Vec<u8>> {
    let body = response
        .bytes()
        .await
        .map_err(|e| InferenceError::transport(stage, e))?;
    Ok(body.to_vec())
}

/// Join a configured base URL and a path without doubling slashes
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
