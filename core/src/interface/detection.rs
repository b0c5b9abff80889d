use serde::{Deserialize, Serialize};

/// A hull that survived the area filter this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub centroid: (f64, f64),
    pub area: f64,
    /// Index into the frame's hull list (same order as the contour trace).
    pub hull_index: usize,
}

/// Angular bearing to the selected target, produced at most once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BearingResult {
    pub angle_radians: f64,
    pub pixel_x: i32,
    pub pixel_y: i32,
    pub area: u32,
}

impl BearingResult {
    /// Wire text for the bearing: the angle with four decimal places.
    pub fn message(&self) -> String {
        format!("{:.4}", self.angle_radians)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_uses_four_decimals() {
        let result = BearingResult {
            angle_radians: (50.0f64 / 476.7).atan(),
            pixel_x: 450,
            pixel_y: 300,
            area: 900,
        };
        assert_eq!(result.message(), "0.1045");
    }
}
