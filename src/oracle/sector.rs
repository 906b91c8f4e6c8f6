//! Placeholder DeFi and NFT readings
//!
//! No upstream backs these yet: the figures are fixed and only the score is
//! jittered around 100.

use serde::Serialize;

use crate::oracle::noise::{jitter_price, UnitSampler};

const TOTAL_VALUE_LOCKED_USD: f64 = 1_000_000_000.0;
const YIELD_FARMING_RATE: f64 = 0.05;
const NFT_FLOOR_PRICE_ETH: f64 = 1.5;
const NFT_TRADING_VOLUME_ETH: f64 = 250.0;
const BASE_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DefiSnapshot {
    pub total_value_locked: f64,
    pub yield_farming_rate: f64,
    pub defi_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NftSnapshot {
    pub floor_price: f64,
    pub trading_volume: f64,
    pub nft_score: f64,
}

pub fn defi_snapshot(sampler: &dyn UnitSampler) -> DefiSnapshot {
    DefiSnapshot {
        total_value_locked: TOTAL_VALUE_LOCKED_USD,
        yield_farming_rate: YIELD_FARMING_RATE,
        defi_score: jitter_price(BASE_SCORE, sampler),
    }
}

pub fn nft_snapshot(sampler: &dyn UnitSampler) -> NftSnapshot {
    NftSnapshot {
        floor_price: NFT_FLOOR_PRICE_ETH,
        trading_volume: NFT_TRADING_VOLUME_ETH,
        nft_score: jitter_price(BASE_SCORE, sampler),
    }
}
