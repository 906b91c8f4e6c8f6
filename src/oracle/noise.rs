//! Randomness used by the forecast perturbation and price jitter
//!
//! Pricing code never touches an RNG directly; it asks a [`UnitSampler`] for
//! a value in `[0, 1)` so tests can pin the sequence.

use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of uniform values in `[0, 1)`
pub trait UnitSampler: Send + Sync {
    fn sample(&self) -> f64;
}

/// Fresh entropy on every draw
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSampler;

impl UnitSampler for ThreadRngSampler {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Replays a fixed sequence, wrapping around at the end
#[derive(Debug)]
pub struct FixedSampler {
    values: Vec<f64>,
    next: AtomicUsize,
}

impl FixedSampler {
    /// Values outside `[0, 1)` are clamped into range.
    pub fn new(values: Vec<f64>) -> Self {
        let values = if values.is_empty() { vec![0.0] } else { values };
        Self {
            values: values
                .into_iter()
                .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
                .collect(),
            next: AtomicUsize::new(0),
        }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl UnitSampler for FixedSampler {
    fn sample(&self) -> f64 {
        let idx = self.next.fetch_add(1, Ordering::Relaxed);
        self.values[idx % self.values.len()]
    }
}

/// Half-width of the price jitter, in percent
pub const JITTER_PCT: f64 = 3.0;

/// Move `price` by a uniform amount in `[-3%, +3%)`
pub fn jitter_price(price: f64, sampler: &dyn UnitSampler) -> f64 {
    let percent = sampler.sample() * (2.0 * JITTER_PCT) - JITTER_PCT;
    price + price * (percent / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_sampler_wraps() {
        let sampler = FixedSampler::new(vec![0.25, 0.75]);
        assert_eq!(sampler.sample(), 0.25);
        assert_eq!(sampler.sample(), 0.75);
        assert_eq!(sampler.sample(), 0.25);
    }

    #[test]
    fn test_fixed_sampler_clamps() {
        let sampler = FixedSampler::new(vec![1.5, -0.2]);
        assert!(sampler.sample() < 1.0);
        assert_eq!(sampler.sample(), 0.0);
        assert_eq!(FixedSampler::new(Vec::new()).sample(), 0.0);
    }

    #[test]
    fn test_thread_rng_in_unit_interval() {
        let sampler = ThreadRngSampler;
        for _ in 0..1000 {
            let v = sampler.sample();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_jitter_bounds() {
        let low = jitter_price(100.0, &FixedSampler::constant(0.0));
        assert!((low - 97.0).abs() < 1e-9);

        let mid = jitter_price(100.0, &FixedSampler::constant(0.5));
        assert!((mid - 100.0).abs() < 1e-9);

        let high = jitter_price(100.0, &FixedSampler::constant(0.999_999));
        assert!(high < 103.0 && high > 102.99);
    }

    #[test]
    fn test_jitter_of_zero_is_zero() {
        assert_eq!(jitter_price(0.0, &ThreadRngSampler), 0.0);
    }
}
