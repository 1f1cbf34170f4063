//! Scripted tilt profiles for the mock sensor.
//!
//! Raw device x follows the physical model of `SignConvention::PositiveIsLeft`:
//! tilting toward the user's left raises x, tilting right lowers it.

use std::fmt;
use std::str::FromStr;

use crate::error::SensorSourceError;

/// Device attitude during one segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tilt {
    Still,
    Left,
    Right,
}

/// A run of `samples` samples held at one tilt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub tilt: Tilt,
    pub samples: u32,
}

impl Segment {
    pub fn new(tilt: Tilt, samples: u32) -> Self {
        Self { tilt, samples }
    }
}

/// Cyclic sequence of tilt segments
#[derive(Debug, Clone, PartialEq)]
pub struct MotionProfile {
    segments: Vec<Segment>,
    /// Resting x offset (how the phone is naturally held)
    pub rest_x: f64,
    /// Added/subtracted while tilted
    pub amplitude: f64,
}

impl MotionProfile {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            rest_x: 0.03,
            amplitude: 0.3,
        }
    }

    /// Held still forever
    pub fn still() -> Self {
        Self::new(vec![Segment::new(Tilt::Still, 1)])
    }

    /// Calibrate, sweep left, pause, sweep right
    pub fn sweep() -> Self {
        Self::new(vec![
            Segment::new(Tilt::Still, 30),
            Segment::new(Tilt::Left, 20),
            Segment::new(Tilt::Still, 10),
            Segment::new(Tilt::Right, 20),
            Segment::new(Tilt::Still, 10),
        ])
    }

    pub fn with_rest_x(mut self, rest_x: f64) -> Self {
        self.rest_x = rest_x;
        self
    }

    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Samples in one full cycle
    pub fn cycle_len(&self) -> u64 {
        self.segments.iter().map(|s| s.samples as u64).sum()
    }

    /// Tilt at sample `index` (wraps around)
    pub fn tilt_at(&self, index: u64) -> Tilt {
        let cycle = self.cycle_len();
        if cycle == 0 {
            return Tilt::Still;
        }
        let mut offset = index % cycle;
        for segment in &self.segments {
            if offset < segment.samples as u64 {
                return segment.tilt;
            }
            offset -= segment.samples as u64;
        }
        Tilt::Still
    }

    /// Noise-free raw x at sample `index`
    pub fn x_at(&self, index: u64) -> f64 {
        match self.tilt_at(index) {
            Tilt::Still => self.rest_x,
            Tilt::Left => self.rest_x + self.amplitude,
            Tilt::Right => self.rest_x - self.amplitude,
        }
    }
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self::sweep()
    }
}

/// Parses `still`, `sweep`, or a list like `still:20,left:10,right:10`
impl FromStr for MotionProfile {
    type Err = SensorSourceError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        match spec.trim() {
            "still" => return Ok(Self::still()),
            "sweep" => return Ok(Self::sweep()),
            _ => {}
        }

        let mut segments = Vec::new();
        for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (tilt, count) = part
                .split_once(':')
                .ok_or_else(|| SensorSourceError::invalid_profile(spec, "expected tilt:count"))?;
            let tilt = match tilt.trim().to_lowercase().as_str() {
                "still" => Tilt::Still,
                "left" => Tilt::Left,
                "right" => Tilt::Right,
                other => {
                    return Err(SensorSourceError::invalid_profile(
                        spec,
                        format!("unknown tilt '{other}'"),
                    ))
                }
            };
            let samples: u32 = count.trim().parse().map_err(|_| {
                SensorSourceError::invalid_profile(spec, format!("bad count '{count}'"))
            })?;
            segments.push(Segment::new(tilt, samples));
        }

        if segments.iter().all(|s| s.samples == 0) {
            return Err(SensorSourceError::invalid_profile(spec, "profile is empty"));
        }
        Ok(Self::new(segments))
    }
}

impl fmt::Display for MotionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .segments
            .iter()
            .map(|s| {
                let tilt = match s.tilt {
                    Tilt::Still => "still",
                    Tilt::Left => "left",
                    Tilt::Right => "right",
                };
                format!("{tilt}:{}", s.samples)
            })
            .collect();
        write!(f, "{}", parts.join(","))
    }
}
