//! Oracle module - Upstream price sources and the pricing pipelines built on them
//!
//! Fetches candles, spot quotes and token oracle data, then turns them into
//! a blended crypto price or a jittered meme token price.

mod aggregator;
pub mod forecast;
mod meme;
pub mod noise;
pub mod sector;
pub mod sources;

pub use aggregator::{BestEffort, PriceAggregator};
pub use meme::MemePipeline;
pub use noise::{FixedSampler, ThreadRngSampler, UnitSampler};
