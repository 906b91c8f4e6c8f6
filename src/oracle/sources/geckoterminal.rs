//! GeckoTerminal token price lookup by network and address

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{InferenceError, Stage};
use crate::oracle::sources::{
    decode_json, join_url, read_body, require_symbol, SourceResult, TokenMarketSource,
};

const GECKOTERMINAL_REST_URL: &str = "https://api.geckoterminal.com";
const NETWORKS_PATH: &str = "/api/v2/simple/networks";
const STAGE: Stage = Stage::TokenPrice;

#[derive(Debug, Deserialize)]
struct TokenPriceResponse {
    data: TokenPriceData,
}

#[derive(Debug, Deserialize)]
struct TokenPriceData {
    attributes: TokenPriceAttributes,
}

#[derive(Debug, Deserialize)]
struct TokenPriceAttributes {
    token_prices: HashMap<String, Option<String>>,
}

#[derive(Debug, Clone)]
pub struct GeckoTerminalClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeckoTerminalClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_base_url(http, GECKOTERMINAL_REST_URL)
    }

    pub fn with_base_url(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn price_url(&self, network: &str, address: &str) -> String {
        format!(
            "{}/{}/token_price/{}",
            join_url(&self.base_url, NETWORKS_PATH),
            network,
            address
        )
    }

    pub(crate) fn parse_price(address: &str, body: &[u8]) -> SourceResult<String> {
        let response: TokenPriceResponse = decode_json(STAGE, body)?;
        response
            .data
            .attributes
            .token_prices
            .get(address)
            .cloned()
            .flatten()
            .ok_or_else(|| InferenceError::decode(STAGE, format!("no price for {}", address)))
    }
}

#[async_trait]
impl TokenMarketSource for GeckoTerminalClient {
    async fn token_price(&self, platform: &str, address: &str) -> SourceResult<String> {
        require_symbol(STAGE, address)?;

        let response = self
            .http
            .get(self.price_url(platform, address))
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| InferenceError::transport(STAGE, e))?;

        let body = read_body(STAGE, response).await?;
        Self::parse_price(address, &body)
    }
}
