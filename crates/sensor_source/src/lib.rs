//! # Sensor Source
//!
//! Accelerometer sources implementing the `SensorSource` contract.
//!
//! - [`ManualSensor`]: samples pushed by hand, delivered synchronously (tests)
//! - [`MockSensor`]: scripted tilt profile with seeded noise on a background thread
//! - [`ReplaySensor`]: JSONL recordings replayed at their recorded pace

pub mod error;
pub mod manual_sensor;
pub mod mock_sensor;
pub mod profile;
pub mod recording;
pub mod replay_sensor;
mod worker;

pub use contracts::{SampleCallback, SensorSource, Subscription};
pub use error::{Result, SensorSourceError};
pub use manual_sensor::ManualSensor;
pub use mock_sensor::{MockSensor, MockSensorConfig};
pub use profile::{MotionProfile, Segment, Tilt};
pub use recording::{read_recording, write_recording};
pub use replay_sensor::{ReplayConfig, ReplaySensor};
