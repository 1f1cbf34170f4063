//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend only on this crate, never on each other in reverse.
//!
//! ## Time Model
//! - `Sample::timestamp` is the sensor's own millisecond clock
//! - Session timing goes through the [`Clock`] trait so tests can drive it

mod clock;
mod config;
mod error;
mod movement;
mod sample;
mod sensor_source;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::*;
pub use error::*;
pub use movement::{Direction, Movement, MovementState};
pub use sample::Sample;
pub use sensor_source::{SampleCallback, SensorSource, Subscription};
