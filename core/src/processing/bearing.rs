use crate::interface::{BearingResult, Candidate};
use crate::prelude::{CameraModel, ProcessingStage, StageResult};

/// Horizontal bearing from the optical axis through a pinhole model.
///
/// The angle is positive when the centroid lies at larger pixel x than the
/// principal point (to the right in the image) and negative to the left.
pub struct BearingEstimator {
    camera: CameraModel,
}

impl BearingEstimator {
    pub fn new(camera: CameraModel) -> Self {
        Self { camera }
    }

    pub fn angle_for(&self, pixel_x: f64) -> f64 {
        ((pixel_x - self.camera.principal_point_x) / self.camera.focal_length_px).atan()
    }
}

impl ProcessingStage for BearingEstimator {
    type Input = Candidate;
    type Output = BearingResult;

    fn name(&self) -> &'static str {
        "bearing-estimator"
    }

    fn execute(&self, candidate: &Candidate) -> StageResult<BearingResult> {
        let (cx, cy) = candidate.centroid;
        Ok(BearingResult {
            angle_radians: self.angle_for(cx),
            pixel_x: cx.round() as i32,
            pixel_y: cy.round() as i32,
            area: candidate.area.round() as u32,
        })
    }
}
