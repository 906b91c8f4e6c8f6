//! Upshot tokens-oracle client (block height -> token)

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{InferenceError, Stage};
use crate::oracle::sources::{decode_json, join_url, read_body, SourceResult, TokenOracleSource};
use crate::types::OracleTokenRecord;

const UPSHOT_REST_URL: &str = "https://api.upshot.xyz";
const TOKEN_ORACLE_PATH: &str = "/v2/allora/tokens-oracle/token";
const STAGE: Stage = Stage::TokenOracle;

#[derive(Debug, Deserialize)]
struct TokenOracleResponse {
    #[serde(default)]
    request_id: String,
    #[serde(default)]
    status: bool,
    data: OracleTokenRecord,
}

#[derive(Debug, Clone)]
pub struct UpshotClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpshotClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_base_url(http, UPSHOT_REST_URL)
    }

    pub fn with_base_url(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn token_url(&self, height: &str) -> String {
        format!("{}/{}", join_url(&self.base_url, TOKEN_ORACLE_PATH), height)
    }

    fn into_record(response: TokenOracleResponse) -> OracleTokenRecord {
        tracing::debug!(
            request_id = %response.request_id,
            status = response.status,
            token = %response.data.token_symbol,
            "Token oracle resolved"
        );
        response.data
    }

    pub(crate) fn parse_record(body: &[u8]) -> SourceResult<OracleTokenRecord> {
        decode_json(STAGE, body).map(Self::into_record)
    }
}

#[async_trait]
impl TokenOracleSource for UpshotClient {
    async fn token_at_height(&self, height: &str, api_key: &str) -> SourceResult<OracleTokenRecord> {
        let response = self
            .http
            .get(self.token_url(height))
            .header("accept", "application/json")
            .header("x-api-key", api_key)
            .send()
            .await
            .map_err(|e| InferenceError::transport(STAGE, e))?;

        let body = read_body(STAGE, response).await?;
        Self::parse_record(&body)
    }
}
