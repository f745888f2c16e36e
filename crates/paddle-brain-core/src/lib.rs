//! Supervised paddle brain: a small feed-forward network trained offline by
//! online gradient descent against the exhaustive 32×32 one-hot enumeration,
//! persisted to disk, and reused read-only by the paddle control loop.
//!
//! Training and inference never overlap: [`trainer::train`] borrows the
//! [`Network`] mutably and runs to completion (or its epoch cap) before any
//! caller is handed a shared reference for `forward`.

pub mod config;
pub mod dataset;
pub mod nn;
pub mod paddle;
pub mod store;
pub mod trainer;

pub use config::{ConfigError, TrainConfig};
pub use dataset::{full_grid, one_hot, Sample, GRID, INPUT_LEN};
pub use nn::{Activation, NetError, Network};
pub use paddle::PaddleController;
pub use store::{load, load_or_train, save, ModelSource, SavedModel, StoreError};
pub use trainer::{train, TrainError, TrainingRun};
