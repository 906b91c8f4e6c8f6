//! Configuration sections

use serde::Deserialize;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub bind: String,
    /// Listen port
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip = self
            .bind
            .parse::<IpAddr>()
            .map_err(|e| anyhow::anyhow!("invalid bind address {}: {}", self.bind, e))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    pub binance_url: String,
    pub coingecko_url: String,
    pub cryptocompare_url: String,
    pub upshot_url: String,
    pub geckoterminal_url: String,
    /// Per-request timeout in milliseconds (0 = transport default, none)
    pub timeout_ms: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

/// Keys and endpoints supplied by the operator. Blank values count as absent.
#[derive(Clone, Default, Deserialize)]
pub struct Credentials {
    /// Upshot API key, required by the meme pipeline
    pub upshot_api_key: String,
    /// Node RPC base URL, required by the meme pipeline
    pub rpc: String,
    pub coingecko_api_key: String,
    pub cryptocompare_api_key: String,
}

impl Credentials {
    pub fn has_upshot_api_key(&self) -> bool {
        !self.upshot_api_key.trim().is_empty()
    }

    pub fn has_rpc(&self) -> bool {
        !self.rpc.trim().is_empty()
    }

    pub(crate) fn presence(value: &str) -> &'static str {
        if value.trim().is_empty() {
            "missing"
        } else {
            "set"
        }
    }
}

// Secrets never reach logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("upshot_api_key", &Self::presence(&self.upshot_api_key))
            .field("rpc", &Self::presence(&self.rpc))
            .field("coingecko_api_key", &Self::presence(&self.coingecko_api_key))
            .field(
                "cryptocompare_api_key",
                &Self::presence(&self.cryptocompare_api_key),
            )
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}
