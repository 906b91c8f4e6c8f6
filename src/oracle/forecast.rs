//! Forecast Estimator - perturbed projection from the latest candle
//!
//! This is a noise-injected heuristic, not a statistical forecast: the
//! observed change rate is scaled by a random multiplier in `[0.1, 0.9)` and
//! added back to itself, then projected from the close.

use crate::error::{InferenceError, Stage};
use crate::oracle::noise::UnitSampler;
use crate::types::{Candle, ForecastResult};

/// Lower bound of the change-rate multiplier
pub const MULTIPLIER_MIN: f64 = 0.1;
/// Width of the multiplier range
pub const MULTIPLIER_SPAN: f64 = 0.8;

fn parse_decimal(value: &str) -> Result<f64, InferenceError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InferenceError::parse(Stage::ChangeRate, value))
}

/// (close - open) / open
pub fn change_rate(open: f64, close: f64) -> Result<f64, InferenceError> {
    if open == 0.0 {
        return Err(InferenceError::ZeroOpen);
    }
    Ok((close - open) / open)
}

/// Map a unit sample onto `[0.1, 0.9)`
pub fn multiplier(unit: f64) -> f64 {
    MULTIPLIER_MIN + unit * MULTIPLIER_SPAN
}

/// change_rate * m + change_rate
pub fn adjust_rate(change_rate: f64, multiplier: f64) -> f64 {
    change_rate * multiplier + change_rate
}

/// Parse the candle, draw one multiplier and project the next price
pub fn forecast(candle: &Candle, sampler: &dyn UnitSampler) -> Result<ForecastResult, InferenceError> {
    let open = parse_decimal(&candle.open)?;
    let close = parse_decimal(&candle.close)?;

    let change_rate = change_rate(open, close)?;
    let multiplier = multiplier(sampler.sample());
    let adjusted_rate = adjust_rate(change_rate, multiplier);

    Ok(ForecastResult {
        change_rate,
        multiplier,
        adjusted_rate,
        price: close + close * adjusted_rate,
    })
}
