//! Line parameters.
//!
//! Every field has a default, so a JSON file only needs to name what it
//! changes. Validation rejects non-positive scales and rates, an inverted
//! preparation range, and a horizon that is negative or not finite.

use std::path::Path;

use prodline_core::{DistributionSpec, SimError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LineConfig {
    /// Mean time between job arrivals (exponential).
    pub mean_interarrival: f64,
    pub processing_mean: f64,
    pub processing_std_dev: f64,
    /// Lower bound of the uniform preparation time.
    pub prep_low: f64,
    /// Upper bound of the uniform preparation time.
    pub prep_high: f64,
    pub breakdown_mean: f64,
    pub breakdown_std_dev: f64,
    /// Rate of the exponential repair time.
    pub repair_rate: f64,
    pub seed: u64,
    pub horizon: f64,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            mean_interarrival: 1.0,
            processing_mean: 0.5,
            processing_std_dev: 0.1,
            prep_low: 0.2,
            prep_high: 0.5,
            breakdown_mean: 20.0,
            breakdown_std_dev: 2.0,
            repair_rate: 4.0 / 3.0,
            seed: 42,
            horizon: 500.0,
        }
    }
}

fn validate_positive(field: &str, value: f64) -> Result<(), SimError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::configuration(format!(
            "{field} must be a positive finite number, got {value}"
        )))
    }
}

/// A horizon must be finite and non-negative.
pub fn validate_horizon(horizon: f64) -> Result<(), SimError> {
    if horizon.is_finite() && horizon >= 0.0 {
        Ok(())
    } else {
        Err(SimError::configuration(format!(
            "horizon must be a non-negative finite number, got {horizon}"
        )))
    }
}

impl LineConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_horizon(mut self, horizon: f64) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn validate(&self) -> Result<(), SimError> {
        validate_positive("mean_interarrival", self.mean_interarrival)?;
        validate_positive("processing_mean", self.processing_mean)?;
        validate_positive("processing_std_dev", self.processing_std_dev)?;
        validate_positive("prep_low", self.prep_low)?;
        validate_positive("prep_high", self.prep_high)?;
        if self.prep_low > self.prep_high {
            return Err(SimError::configuration(format!(
                "prep_low ({}) exceeds prep_high ({})",
                self.prep_low, self.prep_high
            )));
        }
        validate_positive("breakdown_mean", self.breakdown_mean)?;
        validate_positive("breakdown_std_dev", self.breakdown_std_dev)?;
        validate_positive("repair_rate", self.repair_rate)?;
        validate_horizon(self.horizon)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SimError::configuration(format!("invalid line configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SimError::configuration(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    pub fn inter_arrival_spec(&self) -> DistributionSpec {
        DistributionSpec::Exponential {
            rate: 1.0 / self.mean_interarrival,
        }
    }

    pub fn processing_spec(&self) -> DistributionSpec {
        DistributionSpec::Normal {
            mean: self.processing_mean,
            std_dev: self.processing_std_dev,
        }
    }

    pub fn preparation_spec(&self) -> DistributionSpec {
        DistributionSpec::Uniform {
            low: self.prep_low,
            high: self.prep_high,
        }
    }

    pub fn breakdown_spec(&self) -> DistributionSpec {
        DistributionSpec::Normal {
            mean: self.breakdown_mean,
            std_dev: self.breakdown_std_dev,
        }
    }

    pub fn repair_spec(&self) -> DistributionSpec {
        DistributionSpec::Exponential {
            rate: self.repair_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = LineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.horizon, 500.0);
        assert_eq!(config.inter_arrival_spec(), DistributionSpec::Exponential { rate: 1.0 });
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = LineConfig::from_json_str(r#"{ "seed": 7, "prep_high": 0.6 }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.prep_high, 0.6);
        assert_eq!(config.prep_low, 0.2);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = LineConfig::from_json_str(r#"{ "sede": 7 }"#).unwrap_err();
        assert!(matches!(err, SimError::Configuration(_)));
    }

    #[test]
    fn invalid_values_name_the_field() {
        let config = LineConfig {
            repair_rate: 0.0,
            ..LineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("repair_rate"), "{err}");

        let inverted = LineConfig {
            prep_low: 0.6,
            ..LineConfig::default()
        };
        assert!(inverted.validate().unwrap_err().to_string().contains("prep_low"));

        assert!(LineConfig::default().with_horizon(-1.0).validate().is_err());
        assert!(LineConfig::default().with_horizon(f64::NAN).validate().is_err());
    }

    #[test]
    fn round_trips_through_json() {
        let config = LineConfig::default().with_seed(9).with_horizon(12.5);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(LineConfig::from_json_str(&json).unwrap(), config);
    }
}
