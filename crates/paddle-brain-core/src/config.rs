//! Training configuration. Defaults carry the reference tuning that converges
//! well inside the epoch cap on the shipped `[1024, 1]` topology.

use crate::nn::Activation;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Deterministic seed for weight initialization.
    pub seed: u64,
    /// Online SGD step size.
    pub learning_rate: f32,
    /// Hard cap on training epochs; reaching it reports non-convergence.
    pub max_epochs: usize,
    /// Epochs to run before the convergence sweep starts. The sweep costs a
    /// second full pass over the dataset and cannot succeed early in
    /// training, so it is deferred past this threshold. The default matches
    /// the sigmoid reference tuning; tanh typically converges within ~1k
    /// epochs, so set this to 0 when experimenting.
    pub warmup_epochs: usize,
    /// Nonlinearity applied after every layer.
    pub activation: Activation,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            learning_rate: 0.35,
            max_epochs: 200_000,
            warmup_epochs: 11_000,
            activation: Activation::Tanh,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositiveLearningRate(f32),
    ZeroMaxEpochs,
    WarmupExceedsCap { warmup_epochs: usize, max_epochs: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveLearningRate(lr) => {
                write!(f, "learning_rate must be finite and > 0, got {}", lr)
            }
            ConfigError::ZeroMaxEpochs => write!(f, "max_epochs must be > 0"),
            ConfigError::WarmupExceedsCap {
                warmup_epochs,
                max_epochs,
            } => write!(
                f,
                "warmup_epochs {} exceeds max_epochs {}: convergence would never be checked",
                warmup_epochs, max_epochs
            ),
        }
    }
}

impl Error for ConfigError {}

impl TrainConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ConfigError::NonPositiveLearningRate(self.learning_rate));
        }
        if self.max_epochs == 0 {
            return Err(ConfigError::ZeroMaxEpochs);
        }
        if self.warmup_epochs > self.max_epochs {
            return Err(ConfigError::WarmupExceedsCap {
                warmup_epochs: self.warmup_epochs,
                max_epochs: self.max_epochs,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(TrainConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_learning_rates() {
        for lr in [0.0, -0.1, f32::NAN, f32::INFINITY] {
            let cfg = TrainConfig {
                learning_rate: lr,
                ..TrainConfig::default()
            };
            assert!(cfg.validate().is_err(), "lr {lr} must be rejected");
        }
    }

    #[test]
    fn rejects_warmup_past_the_cap() {
        let cfg = TrainConfig {
            warmup_epochs: 101,
            max_epochs: 100,
            ..TrainConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::WarmupExceedsCap {
                warmup_epochs: 101,
                max_epochs: 100
            })
        );
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = TrainConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: TrainConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, cfg.seed);
        assert_eq!(back.learning_rate, cfg.learning_rate);
        assert_eq!(back.warmup_epochs, cfg.warmup_epochs);
        assert_eq!(back.activation, cfg.activation);
    }
}
