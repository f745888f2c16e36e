//! Output interpretation for the paddle control loop. The network reports
//! where the tracked ball is horizontally; the controller turns that into a
//! legal paddle column, moving at most `max_step` columns per tick. Capture,
//! rendering, and physics stay with the outer collaborator.

use crate::dataset::GRID;

#[derive(Clone, Copy, Debug)]
pub struct PaddleController {
    /// Maximum columns the paddle may move in one tick.
    pub max_step: usize,
}

impl Default for PaddleController {
    fn default() -> Self {
        Self { max_step: 2 }
    }
}

impl PaddleController {
    /// Map the network's normalized output to a legal column in `0..32`.
    pub fn target_column(&self, output: f32) -> usize {
        let scaled = (output * GRID as f32).round();
        if scaled.is_nan() || scaled <= 0.0 {
            return 0;
        }
        (scaled as usize).min(GRID - 1)
    }

    /// Advance `current` toward `target` by at most `max_step` columns.
    pub fn step_toward(&self, current: usize, target: usize) -> usize {
        if target > current {
            (current + self.max_step).min(target)
        } else {
            current.saturating_sub(self.max_step).max(target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_column_clamps_to_the_grid() {
        let c = PaddleController::default();
        assert_eq!(c.target_column(-0.5), 0);
        assert_eq!(c.target_column(0.0), 0);
        assert_eq!(c.target_column(0.5), 16);
        assert_eq!(c.target_column(31.0 / 32.0), 31);
        assert_eq!(c.target_column(1.2), 31);
        assert_eq!(c.target_column(f32::NAN), 0);
    }

    #[test]
    fn step_toward_limits_per_tick_displacement() {
        let c = PaddleController { max_step: 2 };
        assert_eq!(c.step_toward(10, 20), 12);
        assert_eq!(c.step_toward(10, 3), 8);
        assert_eq!(c.step_toward(10, 11), 11);
        assert_eq!(c.step_toward(10, 10), 10);
        assert_eq!(c.step_toward(1, 0), 0);
        assert_eq!(c.step_toward(0, 5), 2);
    }

    #[test]
    fn paddle_reaches_any_target_within_the_grid() {
        let c = PaddleController { max_step: 3 };
        let mut pos = 0;
        for _ in 0..GRID {
            pos = c.step_toward(pos, 31);
        }
        assert_eq!(pos, 31);
    }
}
