//! CoinGecko `/simple/price` spot quotes
//!
//! The token is sent verbatim as the CoinGecko asset id.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::{InferenceError, Stage};
use crate::oracle::sources::{
    decode_json, join_url, read_body, require_symbol, SourceResult, SpotPriceSource,
};

const COINGECKO_REST_URL: &str = "https://api.coingecko.com";
const SIMPLE_PRICE_PATH: &str = "/api/v3/simple/price";
const STAGE: Stage = Stage::CoinGecko;

type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_base_url(http, COINGECKO_REST_URL)
    }

    pub fn with_base_url(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub(crate) fn parse_price(token: &str, body: &[u8]) -> SourceResult<f64> {
        let parsed: SimplePriceResponse = decode_json(STAGE, body)?;
        parsed
            .get(token)
            .and_then(|quotes| quotes.get("usd"))
            .copied()
            .ok_or_else(|| InferenceError::decode(STAGE, format!("no usd quote for id {}", token)))
    }
}

#[async_trait]
impl SpotPriceSource for CoinGeckoClient {
    fn name(&self) -> &'static str {
        "CoinGecko"
    }

    async fn spot_price(&self, token: &str, api_key: &str) -> SourceResult<f64> {
        require_symbol(STAGE, token)?;

        let response = self
            .http
            .get(join_url(&self.base_url, SIMPLE_PRICE_PATH))
            .query(&[
                ("ids", token),
                ("vs_currencies", "usd"),
                ("x_cg_demo_api_key", api_key),
            ])
            .send()
            .await
            .map_err(|e| InferenceError::transport(STAGE, e))?;

        let body = read_body(STAGE, response).await?;
        Self::parse_price(token, &body)
    }
}
