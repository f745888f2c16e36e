//! Exhaustive training enumeration over the 32×32 capture grid.
//!
//! One sample per grid cell: the input is a one-hot vector over all 1024
//! cells (row-major), the label is the cell's column normalized to [0, 1).
//! The full enumeration doubles as the test set; the problem is deliberately
//! memorizable and makes no generalization claim.

/// Capture grid is square, 32 cells per side.
pub const GRID: usize = 32;
/// Network input width: one slot per grid cell.
pub const INPUT_LEN: usize = GRID * GRID;

#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// One-hot over the 1024 grid cells, row-major.
    pub input: Vec<f32>,
    /// Normalized column: `class as f32 / 32.0`. Length 1.
    pub target: Vec<f32>,
    /// Column index of the active cell, `0..32`.
    pub class: usize,
}

/// One-hot pattern for a single active cell.
pub fn one_hot(row: usize, col: usize) -> Vec<f32> {
    assert!(row < GRID && col < GRID, "cell ({row}, {col}) outside grid");
    let mut v = vec![0.0; INPUT_LEN];
    v[row * GRID + col] = 1.0;
    v
}

/// All 1024 samples in fixed row-major order: cell index `k = row * 32 + col`,
/// class `k % 32`.
pub fn full_grid() -> Vec<Sample> {
    let mut samples = Vec::with_capacity(INPUT_LEN);
    for row in 0..GRID {
        for col in 0..GRID {
            samples.push(Sample {
                input: one_hot(row, col),
                target: vec![col as f32 / GRID as f32],
                class: col,
            });
        }
    }
    samples
}
