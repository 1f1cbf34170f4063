//! Directional feedback for the presentation layer.

use contracts::{Direction, Movement, MovementState};
use serde::{Deserialize, Serialize};

/// Side effect the presentation layer should fire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    #[default]
    None,
    /// Short vibration: the user just started moving the right way
    Haptic,
}

/// Feedback for one movement state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub target: Direction,
    pub movement: Movement,
    pub is_moving_correctly: bool,
    pub cue: Cue,
}

impl Feedback {
    /// Text shown under the arrow
    pub fn label(&self) -> &'static str {
        self.movement.label()
    }
}

/// Compares movement against a target, remembering the last verdict
#[derive(Debug, Clone)]
pub struct FeedbackEvaluator {
    target: Direction,
    was_correct: bool,
}

impl FeedbackEvaluator {
    pub fn new(target: Direction) -> Self {
        Self {
            target,
            was_correct: false,
        }
    }

    pub fn target(&self) -> Direction {
        self.target
    }

    pub fn evaluate(&mut self, state: &MovementState) -> Feedback {
        let movement = state.movement();
        let is_moving_correctly = movement == self.target.movement();
        let cue = if is_moving_correctly && !self.was_correct {
            Cue::Haptic
        } else {
            Cue::None
        };
        self.was_correct = is_moving_correctly;

        Feedback {
            target: self.target,
            movement,
            is_moving_correctly,
            cue,
        }
    }
}
