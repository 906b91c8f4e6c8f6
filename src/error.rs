//! Error type shared by the upstream clients and the pricing pipelines

use std::fmt;
use thiserror::Error;

/// Pipeline stage an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Klines,
    ChangeRate,
    CoinGecko,
    CryptoCompare,
    LatestBlock,
    TokenOracle,
    TokenPrice,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Klines => "klines",
            Stage::ChangeRate => "change_rate",
            Stage::CoinGecko => "coingecko",
            Stage::CryptoCompare => "cryptocompare",
            Stage::LatestBlock => "latest_block",
            Stage::TokenOracle => "token_oracle",
            Stage::TokenPrice => "token_price",
        }
    }

    /// Message returned to HTTP clients when this stage fails
    pub fn public_message(&self) -> &'static str {
        match self {
            Stage::Klines => "Error fetching klines",
            Stage::ChangeRate => "Error calculating price change rate",
            Stage::CoinGecko => "Error fetching CoinGecko price",
            Stage::CryptoCompare => "Error fetching CryptoCompare price",
            Stage::LatestBlock => "Error fetching latest block",
            Stage::TokenOracle => "Error fetching meme oracle data",
            Stage::TokenPrice => "Error fetching meme price",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced while answering an inference request
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("need api key")]
    MissingApiKey,

    #[error("Invalid RPC configuration")]
    MissingRpc,

    #[error("{stage}: symbol must not be empty")]
    EmptySymbol { stage: Stage },

    #[error("{stage}: request failed: {source}")]
    Transport {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    #[error("{stage}: upstream returned status {status}")]
    Status { stage: Stage, status: u16 },

    #[error("{stage}: unexpected response shape: {detail}")]
    Decode { stage: Stage, detail: String },

    #[error("{stage}: invalid decimal {value:?}")]
    Parse { stage: Stage, value: String },

    #[error("open price cannot be zero")]
    ZeroOpen,

    #[error("no klines data")]
    EmptyCandles,
}

impl InferenceError {
    pub fn transport(stage: Stage, source: reqwest::Error) -> Self {
        Self::Transport { stage, source }
    }

    pub fn decode(stage: Stage, detail: impl fmt::Display) -> Self {
        Self::Decode {
            stage,
            detail: detail.to_string(),
        }
    }

    pub fn parse(stage: Stage, value: impl Into<String>) -> Self {
        Self::Parse {
            stage,
            value: value.into(),
        }
    }

    /// Stage the error belongs to, if it came from the pipeline
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::MissingApiKey | Self::MissingRpc => None,
            Self::EmptySymbol { stage }
            | Self::Transport { stage, .. }
            | Self::Status { stage, .. }
            | Self::Decode { stage, .. }
            | Self::Parse { stage, .. } => Some(*stage),
            Self::ZeroOpen => Some(Stage::ChangeRate),
            Self::EmptyCandles => Some(Stage::Klines),
        }
    }

    /// True for errors caused by the caller rather than an upstream or
    /// server-side problem
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingApiKey | Self::EmptySymbol { .. })
    }

    /// Short message safe to return to HTTP clients
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "need api key",
            Self::MissingRpc => "Invalid RPC configuration",
            Self::EmptySymbol { .. } => "invalid token",
            other => other
                .stage()
                .map(|s| s.public_message())
                .unwrap_or("internal error"),
        }
    }
}
