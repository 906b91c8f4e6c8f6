//! Meme oracle pipeline
//!
//! Block height -> oracle token record -> market price -> ±3% jitter.
//! Every stage is mandatory; the first failure aborts the request.

use std::sync::Arc;

use crate::config::Credentials;
use crate::error::{InferenceError, Stage};
use crate::oracle::noise::{jitter_price, UnitSampler};
use crate::oracle::sources::{ChainStatusSource, TokenMarketSource, TokenOracleSource};
use crate::types::MemeQuote;

pub struct MemePipeline {
    chain: Arc<dyn ChainStatusSource>,
    oracle: Arc<dyn TokenOracleSource>,
    market: Arc<dyn TokenMarketSource>,
    sampler: Arc<dyn UnitSampler>,
}

impl MemePipeline {
    pub fn new(
        chain: Arc<dyn ChainStatusSource>,
        oracle: Arc<dyn TokenOracleSource>,
        market: Arc<dyn TokenMarketSource>,
        sampler: Arc<dyn UnitSampler>,
    ) -> Self {
        Self {
            chain,
            oracle,
            market,
            sampler,
        }
    }

    /// Check the two settings the pipeline needs; the API key is checked first
    pub fn validate(credentials: &Credentials) -> Result<(), InferenceError> {
        if !credentials.has_upshot_api_key() {
            return Err(InferenceError::MissingApiKey);
        }
        if !credentials.has_rpc() {
            return Err(InferenceError::MissingRpc);
        }
        Ok(())
    }

    pub async fn quote(&self, credentials: &Credentials) -> Result<MemeQuote, InferenceError> {
        Self::validate(credentials)?;

        let block_height = self
            .chain
            .latest_block_height(credentials.rpc.trim())
            .await?;

        let token = self
            .oracle
            .token_at_height(&block_height, credentials.upshot_api_key.trim())
            .await?;

        let raw_price = self
            .market
            .token_price(&token.platform, &token.address)
            .await?;

        let market_price = raw_price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or_else(|| InferenceError::parse(Stage::TokenPrice, raw_price.as_str()))?;

        tracing::info!(
            block_height = %block_height,
            meme = %token.token_symbol,
            platform = %token.platform,
            price = %raw_price,
            "Meme token resolved"
        );

        Ok(MemeQuote {
            block_height,
            price: jitter_price(market_price, self.sampler.as_ref()),
            market_price,
            token,
        })
    }
}
