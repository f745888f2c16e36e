//! Feed-forward network mapping a one-hot grid pattern to a single normalized
//! coordinate. Dense layers over `Vec<f32>`, one weight matrix and bias vector
//! per layer boundary, trained sample-by-sample via `backpropagate`.
//!
//! Topology is runtime data (it must match whatever a stored model carries),
//! so parameters live in `Vec`s keyed by `layer_sizes` rather than fixed-size
//! arrays.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Bounded differentiable nonlinearity applied after every layer.
///
/// Tanh is the shipped default; sigmoid converges too, just over a longer
/// warm-up (its gradient is at most 1/4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Tanh,
    Sigmoid,
}

impl Activation {
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Tanh => x.tanh(),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
        }
    }

    /// Derivative expressed in terms of the activation output `y`, so the
    /// cached forward activations are all back-propagation needs.
    pub fn derivative(self, y: f32) -> f32 {
        match self {
            Activation::Tanh => 1.0 - y * y,
            Activation::Sigmoid => y * (1.0 - y),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetError {
    /// `layer_sizes` had fewer than two entries or a zero-width layer.
    InvalidTopology { reason: &'static str },
    /// Input or target vector length disagrees with the configured topology.
    DimensionMismatch { expected: usize, actual: usize },
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetError::InvalidTopology { reason } => {
                write!(f, "invalid layer topology: {}", reason)
            }
            NetError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "vector length {} does not match configured width {}",
                    actual, expected
                )
            }
        }
    }
}

impl Error for NetError {}

#[derive(Clone, Debug)]
pub struct Network {
    /// Ordered layer widths, fixed at construction.
    layer_sizes: Vec<usize>,
    /// One matrix per layer boundary, row-major `sizes[l] × sizes[l+1]`.
    weights: Vec<Vec<f32>>,
    /// One vector per layer boundary, length `sizes[l+1]`.
    biases: Vec<Vec<f32>>,
    activation: Activation,
}

impl Network {
    /// Build an untrained network: weights uniform in [-0.5, 0.5], biases zero.
    pub fn new<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        activation: Activation,
        rng: &mut R,
    ) -> Result<Self, NetError> {
        if layer_sizes.len() < 2 {
            return Err(NetError::InvalidTopology {
                reason: "need at least an input and an output layer",
            });
        }
        if layer_sizes.contains(&0) {
            return Err(NetError::InvalidTopology {
                reason: "zero-width layer",
            });
        }

        let mut weights = Vec::with_capacity(layer_sizes.len() - 1);
        let mut biases = Vec::with_capacity(layer_sizes.len() - 1);
        for pair in layer_sizes.windows(2) {
            let (rows, cols) = (pair[0], pair[1]);
            weights.push(
                (0..rows * cols)
                    .map(|_| rng.random_range(-0.5f32..=0.5))
                    .collect(),
            );
            biases.push(vec![0.0; cols]);
        }

        Ok(Self {
            layer_sizes: layer_sizes.to_vec(),
            weights,
            biases,
            activation,
        })
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn input_width(&self) -> usize {
        self.layer_sizes[0]
    }

    pub fn output_width(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    pub fn weights(&self) -> &[Vec<f32>] {
        &self.weights
    }

    pub fn biases(&self) -> &[Vec<f32>] {
        &self.biases
    }

    /// Replace every weight and bias wholesale. All shapes are validated
    /// against `layer_sizes` before anything is swapped in, so a rejected
    /// replacement leaves the network untouched.
    pub fn set_params(
        &mut self,
        weights: Vec<Vec<f32>>,
        biases: Vec<Vec<f32>>,
    ) -> Result<(), NetError> {
        let boundaries = self.layer_sizes.len() - 1;
        if weights.len() != boundaries {
            return Err(NetError::DimensionMismatch {
                expected: boundaries,
                actual: weights.len(),
            });
        }
        if biases.len() != boundaries {
            return Err(NetError::DimensionMismatch {
                expected: boundaries,
                actual: biases.len(),
            });
        }
        for (l, pair) in self.layer_sizes.windows(2).enumerate() {
            let (rows, cols) = (pair[0], pair[1]);
            if weights[l].len() != rows * cols {
                return Err(NetError::DimensionMismatch {
                    expected: rows * cols,
                    actual: weights[l].len(),
                });
            }
            if biases[l].len() != cols {
                return Err(NetError::DimensionMismatch {
                    expected: cols,
                    actual: biases[l].len(),
                });
            }
        }
        self.weights = weights;
        self.biases = biases;
        Ok(())
    }

    /// Evaluate one layer boundary: accumulate `input · W + b`, then activate.
    fn layer_output(&self, l: usize, input: &[f32]) -> Vec<f32> {
        let cols = self.layer_sizes[l + 1];
        let mut out = self.biases[l].clone();
        for (i, &x) in input.iter().enumerate() {
            let row = &self.weights[l][i * cols..(i + 1) * cols];
            for (o, &w) in out.iter_mut().zip(row) {
                *o += x * w;
            }
        }
        for o in &mut out {
            *o = self.activation.apply(*o);
        }
        out
    }

    /// Forward pass. Deterministic for a fixed network and input.
    pub fn forward(&self, input: &[f32]) -> Result<Vec<f32>, NetError> {
        if input.len() != self.input_width() {
            return Err(NetError::DimensionMismatch {
                expected: self.input_width(),
                actual: input.len(),
            });
        }
        let mut current = self.layer_output(0, input);
        for l in 1..self.weights.len() {
            current = self.layer_output(l, &current);
        }
        Ok(current)
    }

    /// One online gradient-descent step on a single labeled sample: forward
    /// pass caching per-layer activations, output error `target − output`,
    /// error walked backward through the activation derivative, every weight
    /// nudged by `learning_rate × delta × layer_input`. No momentum, no
    /// batching. Not safe to interleave with `forward` on the same instance.
    pub fn backpropagate(
        &mut self,
        input: &[f32],
        target: &[f32],
        learning_rate: f32,
    ) -> Result<(), NetError> {
        if input.len() != self.input_width() {
            return Err(NetError::DimensionMismatch {
                expected: self.input_width(),
                actual: input.len(),
            });
        }
        if target.len() != self.output_width() {
            return Err(NetError::DimensionMismatch {
                expected: self.output_width(),
                actual: target.len(),
            });
        }

        // activations[0] is the input, activations[l + 1] layer l's output.
        let mut activations: Vec<Vec<f32>> = Vec::with_capacity(self.layer_sizes.len());
        activations.push(input.to_vec());
        for l in 0..self.weights.len() {
            let next = self.layer_output(l, &activations[l]);
            activations.push(next);
        }

        let output = &activations[self.weights.len()];
        let mut delta: Vec<f32> = output
            .iter()
            .zip(target)
            .map(|(&y, &t)| (t - y) * self.activation.derivative(y))
            .collect();

        for l in (0..self.weights.len()).rev() {
            let layer_input = &activations[l];
            let cols = self.layer_sizes[l + 1];

            // Upstream error uses the pre-update weights.
            let prev_delta: Option<Vec<f32>> = (l > 0).then(|| {
                layer_input
                    .iter()
                    .enumerate()
                    .map(|(i, &y)| {
                        let row = &self.weights[l][i * cols..(i + 1) * cols];
                        let err: f32 = row.iter().zip(&delta).map(|(&w, &d)| w * d).sum();
                        err * self.activation.derivative(y)
                    })
                    .collect()
            });

            for (i, &x) in layer_input.iter().enumerate() {
                let row = &mut self.weights[l][i * cols..(i + 1) * cols];
                for (w, &d) in row.iter_mut().zip(&delta) {
                    *w += learning_rate * d * x;
                }
            }
            for (b, &d) in self.biases[l].iter_mut().zip(&delta) {
                *b += learning_rate * d;
            }

            if let Some(prev) = prev_delta {
                delta = prev;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn net(sizes: &[usize], seed: u64) -> Network {
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        Network::new(sizes, Activation::Tanh, &mut rng).expect("valid topology")
    }

    #[test]
    fn construction_allocates_consistent_shapes() {
        for sizes in [vec![1024, 1], vec![8, 16, 4], vec![2, 3, 5, 1]] {
            let nn = net(&sizes, 7);
            assert_eq!(nn.weights().len(), sizes.len() - 1);
            assert_eq!(nn.biases().len(), sizes.len() - 1);
            for (l, pair) in sizes.windows(2).enumerate() {
                assert_eq!(nn.weights()[l].len(), pair[0] * pair[1], "weights[{l}]");
                assert_eq!(nn.biases()[l].len(), pair[1], "biases[{l}]");
            }
        }
    }

    #[test]
    fn rejects_degenerate_topologies() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        assert!(Network::new(&[1024], Activation::Tanh, &mut rng).is_err());
        assert!(Network::new(&[], Activation::Tanh, &mut rng).is_err());
        assert!(Network::new(&[1024, 0, 1], Activation::Tanh, &mut rng).is_err());
    }

    #[test]
    fn forward_rejects_malformed_input_lengths() {
        let nn = net(&[1024, 1], 1);
        for len in [0usize, 1, 1023, 1025] {
            let got = nn.forward(&vec![0.0; len]);
            assert_eq!(
                got,
                Err(NetError::DimensionMismatch {
                    expected: 1024,
                    actual: len
                }),
                "input length {len} must be rejected"
            );
        }
    }

    #[test]
    fn backpropagate_rejects_malformed_lengths() {
        let mut nn = net(&[1024, 1], 1);
        for len in [0usize, 1, 1023, 1025] {
            let got = nn.backpropagate(&vec![0.0; len], &[0.0], 0.1);
            assert_eq!(
                got,
                Err(NetError::DimensionMismatch {
                    expected: 1024,
                    actual: len
                }),
                "input length {len} must be rejected"
            );
        }
        let err = nn.backpropagate(&vec![0.0; 1024], &[0.0; 2], 0.1);
        assert_eq!(
            err,
            Err(NetError::DimensionMismatch {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn forward_is_deterministic() {
        let nn = net(&[16, 8, 1], 5);
        let input: Vec<f32> = (0..16).map(|i| i as f32 * 0.1).collect();
        let a = nn.forward(&input).unwrap();
        let b = nn.forward(&input).unwrap();
        assert_eq!(a, b, "repeated forward calls must match bit-for-bit");
    }

    #[test]
    fn forward_output_bounded_by_tanh() {
        let nn = net(&[8, 16, 4], 3);
        let out = nn.forward(&[1.0; 8]).unwrap();
        for &o in &out {
            assert!((-1.0..=1.0).contains(&o), "output {o} outside tanh range");
        }
    }

    #[test]
    fn zero_params_produce_activation_of_zero() {
        let mut nn = net(&[4, 1], 9);
        nn.set_params(vec![vec![0.0; 4]], vec![vec![0.0]]).unwrap();
        let out = nn.forward(&[1.0, 0.0, 1.0, 0.5]).unwrap();
        assert!(out[0].abs() < 1e-7, "tanh(0) expected, got {}", out[0]);
    }

    #[test]
    fn one_backprop_step_does_not_increase_error() {
        let mut nn = net(&[4, 3, 1], 11);
        let input = [0.0, 1.0, 0.0, 0.0];
        let target = [0.75];

        let before = nn.forward(&input).unwrap()[0];
        nn.backpropagate(&input, &target, 0.01).unwrap();
        let after = nn.forward(&input).unwrap()[0];

        let sq = |y: f32| (target[0] - y) * (target[0] - y);
        assert!(
            sq(after) <= sq(before),
            "squared error grew: {} -> {}",
            sq(before),
            sq(after)
        );
    }

    #[test]
    fn set_params_rejects_bad_shapes_and_keeps_old_values() {
        let mut nn = net(&[4, 2], 13);
        let input = [0.25, 0.5, 0.75, 1.0];
        let before = nn.forward(&input).unwrap();

        let err = nn.set_params(vec![vec![0.0; 7]], vec![vec![0.0; 2]]);
        assert!(err.is_err());
        assert_eq!(nn.forward(&input).unwrap(), before, "reject must not mutate");
    }

    #[test]
    fn sigmoid_zero_params_output_half() {
        let mut rng = ChaCha12Rng::seed_from_u64(21);
        let mut nn = Network::new(&[4, 1], Activation::Sigmoid, &mut rng).unwrap();
        nn.set_params(vec![vec![0.0; 4]], vec![vec![0.0]]).unwrap();
        let out = nn.forward(&[1.0; 4]).unwrap();
        assert!((out[0] - 0.5).abs() < 1e-7);
    }
}
