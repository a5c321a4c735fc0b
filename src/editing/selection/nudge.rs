//! Keyboard nudging
//!
//! Nudges are discrete, so they go straight into the scene instead of
//! through the live node.

use kurbo::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl NudgeDirection {
    /// Canvas displacement for one nudge (y grows downward)
    pub fn vector(self, step: f64) -> Vec2 {
        match self {
            NudgeDirection::Left => Vec2::new(-step, 0.0),
            NudgeDirection::Right => Vec2::new(step, 0.0),
            NudgeDirection::Up => Vec2::new(0.0, -step),
            NudgeDirection::Down => Vec2::new(0.0, step),
        }
    }
}
