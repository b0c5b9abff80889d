use crate::interface::Candidate;
use crate::math::{pixel_hull, polygon_moments, Point};
use crate::prelude::{AreaPolicy, ProcessingStage, StageResult};
use crate::processing::contour::Contour;

/// Convex hull of one contour with its area moments. `points` lie on pixel
/// corners; `centroid` is in pixel-centre coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Hull {
    pub points: Vec<Point>,
    pub area: f64,
    pub centroid: (f64, f64),
    pub contour_index: usize,
}

/// Hulls for one frame plus the subset that passed the area filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HullReport {
    pub hulls: Vec<Hull>,
    pub candidates: Vec<Candidate>,
    /// Effective threshold used this frame; candidates have `area > min_area`.
    pub min_area: f64,
}

/// Builds convex hulls and keeps those whose area strictly exceeds the
/// frame's minimum-area threshold.
pub struct HullAnalyzer {
    policy: AreaPolicy,
}

impl HullAnalyzer {
    pub fn new(policy: AreaPolicy) -> Self {
        Self { policy }
    }

    /// Hull over the pixel squares of the contour, so the area counts whole
    /// pixels. The centroid is shifted back to pixel-centre coordinates.
    fn hull_of(contour_index: usize, contour: &Contour) -> Option<Hull> {
        let points = pixel_hull(&contour.points)?;
        let moments = polygon_moments(&points);
        let (cx, cy) = moments.centroid()?;
        Some(Hull {
            area: moments.area(),
            points,
            centroid: (cx - 0.5, cy - 0.5),
            contour_index,
        })
    }
}

impl ProcessingStage for HullAnalyzer {
    type Input = [Contour];
    type Output = HullReport;

    fn name(&self) -> &'static str {
        "hull-analyzer"
    }

    fn execute(&self, contours: &[Contour]) -> StageResult<HullReport> {
        let hulls: Vec<Hull> = contours
            .iter()
            .enumerate()
            .filter_map(|(index, contour)| Self::hull_of(index, contour))
            .collect();

        let largest = hulls.iter().map(|h| h.area).fold(0.0, f64::max);
        let min_area = self.policy.threshold(largest);

        let candidates = hulls
            .iter()
            .enumerate()
            .filter(|(_, hull)| hull.area > min_area)
            .map(|(hull_index, hull)| Candidate {
                centroid: hull.centroid,
                area: hull.area,
                hull_index,
            })
            .collect();

        Ok(HullReport {
            hulls,
            candidates,
            min_area,
        })
    }
}
