//! CryptoCompare `/data/price` spot quotes

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::{InferenceError, Stage};
use crate::oracle::sources::{
    decode_json, join_url, read_body, require_symbol, SourceResult, SpotPriceSource,
};

const CRYPTOCOMPARE_REST_URL: &str = "https://min-api.cryptocompare.com";
const PRICE_PATH: &str = "/data/price";
const STAGE: Stage = Stage::CryptoCompare;

#[derive(Debug, Clone)]
pub struct CryptoCompareClient {
    http: reqwest::Client,
    base_url: String,
}

impl CryptoCompareClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_base_url(http, CRYPTOCOMPARE_REST_URL)
    }

    pub fn with_base_url(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub(crate) fn parse_price(body: &[u8]) -> SourceResult<f64> {
        let parsed: HashMap<String, f64> = decode_json(STAGE, body)?;
        parsed
            .get("USD")
            .copied()
            .ok_or_else(|| InferenceError::decode(STAGE, "missing USD quote"))
    }
}

#[async_trait]
impl SpotPriceSource for CryptoCompareClient {
    fn name(&self) -> &'static str {
        "CryptoCompare"
    }

    async fn spot_price(&self, token: &str, api_key: &str) -> SourceResult<f64> {
        require_symbol(STAGE, token)?;

        let response = self
            .http
            .get(join_url(&self.base_url, PRICE_PATH))
            .query(&[("fsym", token), ("tsyms", "USD"), ("api_key", api_key)])
            .send()
            .await
            .map_err(|e| InferenceError::transport(STAGE, e))?;

        let body = read_body(STAGE, response).await?;
        Self::parse_price(&body)
    }
}
