use serde::{Deserialize, Serialize};

/// Inclusive hue/saturation/value bounds used by the color segmenter.
///
/// Bounds are not required to be ordered. A channel whose low bound exceeds
/// its high bound matches no pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRange {
    pub hue_low: u8,
    pub hue_high: u8,
    pub sat_low: u8,
    pub sat_high: u8,
    pub val_low: u8,
    pub val_high: u8,
}

impl ColorRange {
    pub fn new(hue: (u8, u8), sat: (u8, u8), val: (u8, u8)) -> Self {
        Self {
            hue_low: hue.0,
            hue_high: hue.1,
            sat_low: sat.0,
            sat_high: sat.1,
            val_low: val.0,
            val_high: val.1,
        }
    }

    /// Returns true when the HSV triple lies inside all three inclusive bounds.
    pub fn contains(&self, hue: u8, sat: u8, val: u8) -> bool {
        (self.hue_low..=self.hue_high).contains(&hue)
            && (self.sat_low..=self.sat_high).contains(&sat)
            && (self.val_low..=self.val_high).contains(&val)
    }
}

impl Default for ColorRange {
    fn default() -> Self {
        Self::new((70, 96), (56, 255), (142, 255))
    }
}

/// Minimum-area policy applied by the hull analyzer.
///
/// The effective threshold for a frame is `max(floor, fraction * largest)`,
/// where `largest` is the biggest hull area seen in that frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaPolicy {
    pub floor: f64,
    pub fraction: f64,
}

impl AreaPolicy {
    pub fn fixed(floor: f64) -> Self {
        Self {
            floor,
            fraction: 0.0,
        }
    }

    pub fn threshold(&self, largest_area: f64) -> f64 {
        self.floor.max(self.fraction * largest_area)
    }
}

impl Default for AreaPolicy {
    fn default() -> Self {
        Self {
            floor: 200.0,
            fraction: 1.0 / 3.0,
        }
    }
}

/// Pinhole camera constants. Constant for a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraModel {
    pub principal_point_x: f64,
    pub focal_length_px: f64,
}

impl Default for CameraModel {
    fn default() -> Self {
        Self {
            principal_point_x: 400.0,
            focal_length_px: 476.7,
        }
    }
}

/// Common error type for stage execution.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("frame source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("publish failed: {0}")]
    Publish(String),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type StageResult<T> = Result<T, StageError>;

/// One step of the per-frame targeting pipeline.
///
/// Stages hold only their configuration; every call to `execute` is independent.
pub trait ProcessingStage {
    type Input: ?Sized;
    type Output;

    fn name(&self) -> &'static str;
    fn execute(&self, input: &Self::Input) -> StageResult<Self::Output>;
}
