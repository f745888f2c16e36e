//! Model persistence: topology descriptor first, then flat parameters, as one
//! JSON document. A load request validates the whole document against the
//! live network before swapping anything in, so a stale or foreign model
//! degrades to retraining rather than crashing or half-overwriting.

use crate::config::TrainConfig;
use crate::dataset::Sample;
use crate::nn::{Activation, Network};
use crate::trainer::{self, TrainError, TrainingRun};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{error::Error, fmt, fs, io};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedModel {
    pub schema_version: u32,
    pub layer_sizes: Vec<usize>,
    pub activation: Activation,
    /// Row-major matrices, one per layer boundary.
    pub weights: Vec<Vec<f32>>,
    pub biases: Vec<Vec<f32>>,
}

impl SavedModel {
    pub fn from_network(network: &Network) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            layer_sizes: network.layer_sizes().to_vec(),
            activation: network.activation(),
            weights: network.weights().to_vec(),
            biases: network.biases().to_vec(),
        }
    }
}

/// Serialize the network's topology and parameters to `path`.
pub fn save(network: &Network, path: &Path) -> io::Result<()> {
    let doc = SavedModel::from_network(network);
    let json = serde_json::to_string(&doc).map_err(io::Error::other)?;
    fs::write(path, json)
}

/// Overwrite `network`'s parameters from the model stored at `path`.
///
/// Returns `false` — leaving the network untouched — when the file is
/// missing, unreadable, truncated, carries an unknown schema version, or
/// disagrees with the network's configured topology or activation. Never
/// panics and never surfaces a hard error; the caller's fallback is always
/// "train from scratch".
pub fn load(network: &mut Network, path: &Path) -> bool {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(_) => return false,
    };
    let doc: SavedModel = match serde_json::from_slice(&bytes) {
        Ok(d) => d,
        Err(_) => return false,
    };
    if doc.schema_version != SCHEMA_VERSION {
        return false;
    }
    if doc.layer_sizes != network.layer_sizes() || doc.activation != network.activation() {
        return false;
    }
    // set_params re-validates every shape; a malformed document is rejected
    // without mutating the network.
    network.set_params(doc.weights, doc.biases).is_ok()
}

/// Where the usable model came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelSource {
    /// A valid persisted model was loaded; training was skipped entirely.
    Loaded,
    /// No usable stored model; trained from scratch.
    Trained(TrainingRun),
}

#[derive(Debug)]
pub enum StoreError {
    Train(TrainError),
    Io(io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Train(e) => write!(f, "{}", e),
            StoreError::Io(e) => write!(f, "failed to persist model: {}", e),
        }
    }
}

impl Error for StoreError {}

impl From<TrainError> for StoreError {
    fn from(e: TrainError) -> Self {
        StoreError::Train(e)
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

/// The training fast path: reuse a valid persisted model if one exists,
/// otherwise train and persist the result. Only a converged model is written
/// back; an unconverged one stays in memory so the next run retries.
pub fn load_or_train(
    network: &mut Network,
    path: &Path,
    samples: &[Sample],
    config: &TrainConfig,
) -> Result<ModelSource, StoreError> {
    if load(network, path) {
        return Ok(ModelSource::Loaded);
    }
    let run = trainer::train(network, samples, config)?;
    if run.converged {
        save(network, path)?;
    }
    Ok(ModelSource::Trained(run))
}
