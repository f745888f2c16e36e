//! Convergence-checked online gradient descent over the full enumeration.
//!
//! No mini-batching, shuffling, or held-out validation: the dataset is the
//! exhaustive 1024-pattern enumeration, so the test set equals the training
//! set by construction.

use crate::config::{ConfigError, TrainConfig};
use crate::dataset::{Sample, GRID};
use crate::nn::{NetError, Network};
use std::{error::Error, fmt};

/// Outcome of a training run. `converged == false` at the epoch cap is
/// informational, not fatal: the caller decides whether an imperfect model is
/// usable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrainingRun {
    /// Completed epochs.
    pub epochs: usize,
    /// Whether every sample's rounded prediction matched its class.
    pub converged: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrainError {
    /// Training invoked with zero samples; the network is left untouched.
    EmptyDataset,
    Config(ConfigError),
    Net(NetError),
}

impl fmt::Display for TrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainError::EmptyDataset => write!(f, "training dataset is empty"),
            TrainError::Config(e) => write!(f, "{}", e),
            TrainError::Net(e) => write!(f, "{}", e),
        }
    }
}

impl Error for TrainError {}

impl From<ConfigError> for TrainError {
    fn from(e: ConfigError) -> Self {
        TrainError::Config(e)
    }
}

impl From<NetError> for TrainError {
    fn from(e: NetError) -> Self {
        TrainError::Net(e)
    }
}

/// Back-propagate every sample once per epoch, in the fixed enumeration
/// order, until the convergence predicate holds or `max_epochs` is reached.
///
/// The convergence sweep (`round(32 × forward) == class` for all samples)
/// costs a second full pass over the dataset and cannot succeed before a
/// data-dependent warm-up period, so it only starts once `epoch` exceeds
/// `warmup_epochs`. Convergence stops training immediately, with no wasted
/// extra epoch.
pub fn train(
    network: &mut Network,
    samples: &[Sample],
    config: &TrainConfig,
) -> Result<TrainingRun, TrainError> {
    config.validate()?;
    if samples.is_empty() {
        return Err(TrainError::EmptyDataset);
    }

    let mut epoch = 0;
    while epoch < config.max_epochs {
        epoch += 1;
        for s in samples {
            network.backpropagate(&s.input, &s.target, config.learning_rate)?;
        }
        if epoch > config.warmup_epochs && all_samples_fit(network, samples)? {
            return Ok(TrainingRun {
                epochs: epoch,
                converged: true,
            });
        }
    }

    Ok(TrainingRun {
        epochs: epoch,
        converged: false,
    })
}

/// Verification sweep: every sample's output, scaled back to a column index,
/// must round to its class.
fn all_samples_fit(network: &Network, samples: &[Sample]) -> Result<bool, TrainError> {
    for s in samples {
        let out = network.forward(&s.input)?;
        if (out[0] * GRID as f32).round() as i64 != s.class as i64 {
            return Ok(false);
        }
    }
    Ok(true)
}
