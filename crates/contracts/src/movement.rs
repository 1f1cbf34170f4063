//! MovementState - Motion Classifier output
//!
//! The three flags of `MovementState` encode one three-way classification.
//! They are always derived together from a [`Movement`], never set one by one.

use serde::{Deserialize, Serialize};

use crate::Sample;

/// Three-way movement classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    #[default]
    Stationary,
    Left,
    Right,
}

impl Movement {
    /// Direction of travel, if moving
    pub fn direction(self) -> Option<Direction> {
        match self {
            Movement::Stationary => None,
            Movement::Left => Some(Direction::Left),
            Movement::Right => Some(Direction::Right),
        }
    }

    /// Short user-facing label
    pub fn label(self) -> &'static str {
        match self {
            Movement::Stationary => "Move to see direction",
            Movement::Left => "Turn Left",
            Movement::Right => "Turn Right",
        }
    }

    /// Metric/log friendly name
    pub fn as_str(self) -> &'static str {
        match self {
            Movement::Stationary => "stationary",
            Movement::Left => "left",
            Movement::Right => "right",
        }
    }
}

/// Target direction a session asks the user to move in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Left, Direction::Right];

    /// The movement that satisfies this direction
    pub fn movement(self) -> Movement {
        match self {
            Direction::Left => Movement::Left,
            Direction::Right => Movement::Right,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(format!("unknown direction '{other}'")),
        }
    }
}

/// Movement state published to the session controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementState {
    pub is_moving_left: bool,
    pub is_moving_right: bool,
    pub is_stationary: bool,

    /// The sample that produced this state (zeroed before tracking)
    pub last_sample: Sample,
}

impl MovementState {
    /// State shown while inactive or calibrating
    pub fn initial() -> Self {
        Self::classified(Movement::Stationary, Sample::default())
    }

    /// Build a full state from a classification
    pub fn classified(movement: Movement, last_sample: Sample) -> Self {
        Self {
            is_moving_left: movement == Movement::Left,
            is_moving_right: movement == Movement::Right,
            is_stationary: movement == Movement::Stationary,
            last_sample,
        }
    }

    /// Collapse the flags back into one classification
    pub fn movement(&self) -> Movement {
        if self.is_moving_left {
            Movement::Left
        } else if self.is_moving_right {
            Movement::Right
        } else {
            Movement::Stationary
        }
    }
}

impl Default for MovementState {
    fn default() -> Self {
        Self::initial()
    }
}
