//! Delay distributions for arrivals, service phases, and failures
//!
//! Every random distribution owns its own [`ChaCha8Rng`] seeded from an
//! explicit `u64`, so a fixed seed reproduces the exact same draw sequence.
//! There is no entropy-seeded constructor.
//!
//! All samples are delays in simulation time units and are never negative:
//! the normal family is truncated at zero.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::Distribution;
use serde::{Deserialize, Serialize};

use crate::SimError;

/// Trait for sampling delays from a distribution
///
/// This abstracts over the probability distributions a process draws its
/// timed suspensions from (exponential, normal, uniform, fixed, scripted).
pub trait TimeDistribution {
    /// Sample one delay.
    fn sample(&mut self) -> f64;

    /// Analytical mean of the distribution, if it has a simple closed form.
    fn mean(&self) -> Option<f64> {
        None
    }
}

fn require_finite(name: &str, value: f64) -> Result<(), SimError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::configuration(format!("{name} must be finite, got {value}")))
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), SimError> {
    require_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(SimError::configuration(format!("{name} must be positive, got {value}")))
    }
}

/// Always returns the same delay.
#[derive(Debug, Clone)]
pub struct Constant {
    value: f64,
}

impl Constant {
    pub fn new(value: f64) -> Result<Self, SimError> {
        require_finite("constant delay", value)?;
        if value < 0.0 {
            return Err(SimError::configuration(format!(
                "constant delay must be non-negative, got {value}"
            )));
        }
        Ok(Self { value })
    }
}

impl TimeDistribution for Constant {
    fn sample(&mut self) -> f64 {
        self.value
    }

    fn mean(&self) -> Option<f64> {
        Some(self.value)
    }
}

/// Replays a fixed list of delays, then keeps repeating the last one.
///
/// Used to drive hand-computed traces through the model.
#[derive(Debug, Clone)]
pub struct Scripted {
    pending: VecDeque<f64>,
    last: f64,
}

impl Scripted {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Result<Self, SimError> {
        let pending: VecDeque<f64> = values.into_iter().collect();
        for value in &pending {
            require_finite("scripted delay", *value)?;
            if *value < 0.0 {
                return Err(SimError::configuration(format!(
                    "scripted delay must be non-negative, got {value}"
                )));
            }
        }
        let last = *pending
            .back()
            .ok_or_else(|| SimError::configuration("scripted delays must not be empty"))?;
        Ok(Self { pending, last })
    }
}

impl TimeDistribution for Scripted {
    fn sample(&mut self) -> f64 {
        self.pending.pop_front().unwrap_or(self.last)
    }
}

/// Exponential delays with a given rate (events per time unit).
#[derive(Debug, Clone)]
pub struct Exponential {
    rate: f64,
    rng: ChaCha8Rng,
    exp_dist: rand_distr::Exp<f64>,
}

impl Exponential {
    pub fn new(rate: f64, seed: u64) -> Result<Self, SimError> {
        require_positive("exponential rate", rate)?;
        let exp_dist = rand_distr::Exp::new(rate)
            .map_err(|e| SimError::configuration(format!("exponential rate {rate}: {e}")))?;
        Ok(Self {
            rate,
            rng: ChaCha8Rng::seed_from_u64(seed),
            exp_dist,
        })
    }

    /// Get the rate parameter
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl TimeDistribution for Exponential {
    fn sample(&mut self) -> f64 {
        self.exp_dist.sample(&mut self.rng)
    }

    fn mean(&self) -> Option<f64> {
        Some(1.0 / self.rate)
    }
}

/// Normal delays truncated at zero.
#[derive(Debug, Clone)]
pub struct Normal {
    mean: f64,
    std_dev: f64,
    rng: ChaCha8Rng,
    normal_dist: rand_distr::Normal<f64>,
}

impl Normal {
    pub fn new(mean: f64, std_dev: f64, seed: u64) -> Result<Self, SimError> {
        require_positive("normal mean", mean)?;
        require_positive("normal standard deviation", std_dev)?;
        let normal_dist = rand_distr::Normal::new(mean, std_dev)
            .map_err(|e| SimError::configuration(format!("normal({mean}, {std_dev}): {e}")))?;
        Ok(Self {
            mean,
            std_dev,
            rng: ChaCha8Rng::seed_from_u64(seed),
            normal_dist,
        })
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }
}

impl TimeDistribution for Normal {
    fn sample(&mut self) -> f64 {
        self.normal_dist.sample(&mut self.rng).max(0.0)
    }

    fn mean(&self) -> Option<f64> {
        Some(self.mean)
    }
}

/// Uniform delays on `[low, high]`.
#[derive(Debug, Clone)]
pub struct Uniform {
    low: f64,
    high: f64,
    rng: ChaCha8Rng,
    uniform_dist: rand_distr::Uniform<f64>,
}

impl Uniform {
    pub fn new(low: f64, high: f64, seed: u64) -> Result<Self, SimError> {
        require_positive("uniform lower bound", low)?;
        require_positive("uniform upper bound", high)?;
        if low > high {
            return Err(SimError::configuration(format!(
                "uniform lower bound {low} exceeds upper bound {high}"
            )));
        }
        Ok(Self {
            low,
            high,
            rng: ChaCha8Rng::seed_from_u64(seed),
            uniform_dist: rand_distr::Uniform::new_inclusive(low, high),
        })
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.low, self.high)
    }
}

impl TimeDistribution for Uniform {
    fn sample(&mut self) -> f64 {
        self.uniform_dist.sample(&mut self.rng)
    }

    fn mean(&self) -> Option<f64> {
        Some((self.low + self.high) / 2.0)
    }
}

/// Serializable description of a delay distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum DistributionSpec {
    Exponential { rate: f64 },
    Normal { mean: f64, std_dev: f64 },
    Uniform { low: f64, high: f64 },
    Constant { value: f64 },
}

impl DistributionSpec {
    /// Checks the parameters without building anything.
    pub fn validate(&self) -> Result<(), SimError> {
        self.build(0).map(|_| ())
    }

    /// Builds the distribution on a stream seeded with `seed`.
    pub fn build(&self, seed: u64) -> Result<Box<dyn TimeDistribution>, SimError> {
        let dist: Box<dyn TimeDistribution> = match *self {
            DistributionSpec::Exponential { rate } => Box::new(Exponential::new(rate, seed)?),
            DistributionSpec::Normal { mean, std_dev } => {
                Box::new(Normal::new(mean, std_dev, seed)?)
            }
            DistributionSpec::Uniform { low, high } => Box::new(Uniform::new(low, high, seed)?),
            DistributionSpec::Constant { value } => Box::new(Constant::new(value)?),
        };
        Ok(dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant() {
        let mut dist = Constant::new(0.25).unwrap();
        assert_eq!(dist.sample(), 0.25);
        assert_eq!(dist.sample(), 0.25);
        assert_eq!(dist.mean(), Some(0.25));
        assert!(Constant::new(-1.0).is_err());
    }

    #[test]
    fn test_scripted_repeats_last_value() {
        let mut dist = Scripted::new([1.0, 2.0, 3.0]).unwrap();
        let drawn: Vec<f64> = (0..5).map(|_| dist.sample()).collect();
        assert_eq!(drawn, vec![1.0, 2.0, 3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_scripted_rejects_bad_input() {
        assert!(Scripted::new(Vec::<f64>::new()).is_err());
        assert!(Scripted::new([1.0, -0.5]).is_err());
        assert!(Scripted::new([f64::NAN]).is_err());
    }

    #[test]
    fn test_exponential_rejects_invalid_rate() {
        assert!(matches!(Exponential::new(0.0, 1), Err(SimError::Configuration(_))));
        assert!(Exponential::new(-2.0, 1).is_err());
        assert!(Exponential::new(f64::INFINITY, 1).is_err());
    }

    #[test]
    fn test_exponential_sampling() {
        let mut dist = Exponential::new(10.0, 7).unwrap();
        assert_eq!(dist.rate(), 10.0);
        assert_eq!(dist.mean(), Some(0.1));
        for _ in 0..100 {
            assert!(dist.sample() >= 0.0);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Exponential::new(4.0 / 3.0, 42).unwrap();
        let mut b = Exponential::new(4.0 / 3.0, 42).unwrap();
        let mut c = Exponential::new(4.0 / 3.0, 43).unwrap();
        let xs: Vec<f64> = (0..20).map(|_| a.sample()).collect();
        let ys: Vec<f64> = (0..20).map(|_| b.sample()).collect();
        let zs: Vec<f64> = (0..20).map(|_| c.sample()).collect();
        assert_eq!(xs, ys);
        assert_ne!(xs, zs);
    }

    #[test]
    fn test_normal_is_truncated_at_zero() {
        // Mean far below the spread: plenty of raw draws are negative.
        let mut dist = Normal::new(0.01, 5.0, 3).unwrap();
        for _ in 0..200 {
            assert!(dist.sample() >= 0.0);
        }
        assert!(Normal::new(1.0, 0.0, 3).is_err());
        assert!(Normal::new(-1.0, 1.0, 3).is_err());
    }

    #[test]
    fn test_normal_sample_mean() {
        let mut dist = Normal::new(20.0, 2.0, 11).unwrap();
        let n = 2_000;
        let mean = (0..n).map(|_| dist.sample()).sum::<f64>() / n as f64;
        assert!((mean - 20.0).abs() < 0.5, "sample mean {mean}");
    }

    #[test]
    fn test_uniform_range() {
        let mut dist = Uniform::new(0.2, 0.5, 5).unwrap();
        assert_eq!(dist.bounds(), (0.2, 0.5));
        assert_eq!(dist.mean(), Some(0.35));
        for _ in 0..200 {
            let x = dist.sample();
            assert!((0.2..=0.5).contains(&x), "{x} out of range");
        }
    }

    #[test]
    fn test_uniform_degenerate_range_is_allowed() {
        let mut dist = Uniform::new(0.3, 0.3, 5).unwrap();
        assert_eq!(dist.sample(), 0.3);
    }

    #[test]
    fn test_uniform_invalid_range() {
        let err = Uniform::new(0.5, 0.2, 5).unwrap_err();
        assert!(err.to_string().contains("exceeds upper bound"));
        assert!(Uniform::new(0.0, 0.2, 5).is_err());
    }

    #[test]
    fn test_spec_round_trip_through_json() {
        let spec = DistributionSpec::Normal {
            mean: 0.5,
            std_dev: 0.1,
        };
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"family\":\"normal\""));
        let back: DistributionSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn test_spec_build_validates() {
        assert!(DistributionSpec::Exponential { rate: 0.0 }.validate().is_err());
        assert!(DistributionSpec::Uniform { low: 0.2, high: 0.5 }.validate().is_ok());
        let mut dist = DistributionSpec::Constant { value: 1.5 }.build(0).unwrap();
        assert_eq!(dist.sample(), 1.5);
    }
}
