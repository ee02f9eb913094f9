//! Synthetic temperature/humidity source standing in for a real sensor poll.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::sync::{Mutex, PoisonError};

/// Bounds of a generated temperature, in °C.
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 20.0..=30.0;
/// Bounds of a generated relative humidity, in %.
pub const HUMIDITY_RANGE: RangeInclusive<f64> = 40.0..=80.0;

/// One synthetic temperature/humidity pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub temperature: f64,
    pub humidity: f64,
}

/// Round to one decimal place.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Draw a sample from `rng`. Both values are uniform over their range and
/// rounded to one decimal, so they never leave the range.
pub fn sample_with<R: Rng + ?Sized>(rng: &mut R) -> Sample {
    Sample {
        temperature: round1(rng.gen_range(TEMPERATURE_RANGE)),
        humidity: round1(rng.gen_range(HUMIDITY_RANGE)),
    }
}

/// Thread-safe reading generator shared by request handlers.
///
/// Production uses an entropy-seeded RNG; tests build one with
/// [`ReadingGenerator::seeded`] for reproducible output.
#[derive(Debug)]
pub struct ReadingGenerator {
    rng: Mutex<StdRng>,
}

impl ReadingGenerator {
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Replace the RNG state, restarting the sequence from `seed`.
    pub fn reseed(&self, seed: u64) {
        *self.lock() = StdRng::seed_from_u64(seed);
    }

    pub fn sample(&self) -> Sample {
        sample_with(&mut *self.lock())
    }

    /// Uniform integer in `range`, drawn from the same RNG as the samples.
    pub fn pick(&self, range: RangeInclusive<i64>) -> i64 {
        self.lock().gen_range(range)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StdRng> {
        // A panic while holding the lock cannot leave an RNG in a bad state.
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ReadingGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_stay_in_range_with_one_decimal() {
        let generator = ReadingGenerator::seeded(7);
        for _ in 0..1000 {
            let s = generator.sample();
            assert!(TEMPERATURE_RANGE.contains(&s.temperature), "{s:?}");
            assert!(HUMIDITY_RANGE.contains(&s.humidity), "{s:?}");
            assert!((s.temperature * 10.0 - (s.temperature * 10.0).round()).abs() < 1e-9);
            assert!((s.humidity * 10.0 - (s.humidity * 10.0).round()).abs() < 1e-9);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = ReadingGenerator::seeded(42);
        let b = ReadingGenerator::seeded(42);
        for _ in 0..20 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn reseed_restarts_sequence() {
        let generator = ReadingGenerator::seeded(3);
        let first: Vec<Sample> = (0..5).map(|_| generator.sample()).collect();
        generator.reseed(3);
        let again: Vec<Sample> = (0..5).map(|_| generator.sample()).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn round1_rounds_half_away_from_zero() {
        assert_eq!(round1(25.04), 25.0);
        assert_eq!(round1(25.06), 25.1);
        assert_eq!(round1(0.0), 0.0);
    }
}
