//! Chain node `/status` client

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{InferenceError, Stage};
use crate::oracle::sources::{decode_json, join_url, read_body, ChainStatusSource, SourceResult};

const STAGE: Stage = Stage::LatestBlock;

#[derive(Debug, Deserialize)]
struct StatusResponse {
    result: StatusResult,
}

#[derive(Debug, Deserialize)]
struct StatusResult {
    sync_info: SyncInfo,
}

#[derive(Debug, Deserialize)]
struct SyncInfo {
    latest_block_height: String,
}

/// Reads the latest block height from a node's RPC status endpoint.
///
/// The RPC base is supplied per call so the client can be built before the
/// RPC setting is known to be valid.
#[derive(Debug, Clone)]
pub struct NodeStatusClient {
    http: reqwest::Client,
}

impl NodeStatusClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    pub(crate) fn parse_height(body: &[u8]) -> SourceResult<String> {
        let status: StatusResponse = decode_json(STAGE, body)?;
        Ok(status.result.sync_info.latest_block_height)
    }
}

#[async_trait]
impl ChainStatusSource for NodeStatusClient {
    async fn latest_block_height(&self, rpc: &str) -> SourceResult<String> {
        let response = self
            .http
            .get(join_url(rpc, "status"))
            .send()
            .await
            .map_err(|e| InferenceError::transport(STAGE, e))?;

        let body = read_body(STAGE, response).await?;
        Self::parse_height(&body)
    }
}
