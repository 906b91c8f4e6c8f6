//! Inference service wiring
//!
//! Built once at startup and shared by every request. Holds only immutable
//! configuration and stateless clients.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::{AppConfig, Credentials};
use crate::error::InferenceError;
use crate::oracle::sector::{self, DefiSnapshot, NftSnapshot};
use crate::oracle::sources::{
    BinanceClient, CandleSource, ChainStatusSource, CoinGeckoClient, CryptoCompareClient,
    GeckoTerminalClient, NodeStatusClient, SpotPriceSource, TokenMarketSource,
    TokenOracleSource, UpshotClient,
};
use crate::oracle::{MemePipeline, PriceAggregator, ThreadRngSampler, UnitSampler};
use crate::types::{AggregatedPrice, MemeQuote};

/// Trait objects for every upstream the service talks to
#[derive(Clone)]
pub struct Upstreams {
    pub candles: Arc<dyn CandleSource>,
    pub coingecko: Arc<dyn SpotPriceSource>,
    pub cryptocompare: Arc<dyn SpotPriceSource>,
    pub chain: Arc<dyn ChainStatusSource>,
    pub token_oracle: Arc<dyn TokenOracleSource>,
    pub token_market: Arc<dyn TokenMarketSource>,
}

impl Upstreams {
    /// Real HTTP clients sharing one connection pool
    pub fn http(config: &AppConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.upstream.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to create HTTP client")?;

        let upstream = &config.upstream;
        Ok(Self {
            candles: Arc::new(BinanceClient::with_base_url(
                http.clone(),
                upstream.binance_url.as_str(),
            )),
            coingecko: Arc::new(CoinGeckoClient::with_base_url(
                http.clone(),
                upstream.coingecko_url.as_str(),
            )),
            cryptocompare: Arc::new(CryptoCompareClient::with_base_url(
                http.clone(),
                upstream.cryptocompare_url.as_str(),
            )),
            chain: Arc::new(NodeStatusClient::new(http.clone())),
            token_oracle: Arc::new(UpshotClient::with_base_url(
                http.clone(),
                upstream.upshot_url.as_str(),
            )),
            token_market: Arc::new(GeckoTerminalClient::with_base_url(
                http,
                upstream.geckoterminal_url.as_str(),
            )),
        })
    }
}

pub struct InferenceService {
    credentials: Credentials,
    aggregator: PriceAggregator,
    meme: MemePipeline,
    sampler: Arc<dyn UnitSampler>,
}

impl InferenceService {
    pub fn new(
        credentials: Credentials,
        upstreams: Upstreams,
        sampler: Arc<dyn UnitSampler>,
    ) -> Self {
        let aggregator = PriceAggregator::new(
            upstreams.candles,
            upstreams.coingecko,
            upstreams.cryptocompare,
            Arc::clone(&sampler),
        );
        let meme = MemePipeline::new(
            upstreams.chain,
            upstreams.token_oracle,
            upstreams.token_market,
            Arc::clone(&sampler),
        );

        Self {
            credentials,
            aggregator,
            meme,
            sampler,
        }
    }

    /// Production wiring: HTTP clients and thread-local entropy
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(
            config.credentials.clone(),
            Upstreams::http(config)?,
            Arc::new(ThreadRngSampler),
        ))
    }

    pub async fn crypto(&self, token: &str) -> Result<AggregatedPrice, InferenceError> {
        self.aggregator.aggregate(token, &self.credentials).await
    }

    pub async fn meme(&self) -> Result<MemeQuote, InferenceError> {
        self.meme.quote(&self.credentials).await
    }

    pub fn defi(&self) -> DefiSnapshot {
        sector::defi_snapshot(self.sampler.as_ref())
    }

    pub fn nft(&self) -> NftSnapshot {
        sector::nft_snapshot(self.sampler.as_ref())
    }
}
