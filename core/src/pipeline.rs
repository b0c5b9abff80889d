//! The five targeting stages run back to back on one frame.

use crate::control::Thresholds;
use crate::interface::{BearingResult, Candidate, Frame, Mask};
use crate::prelude::{CameraModel, ProcessingStage, StageResult};
use crate::processing::{
    BearingEstimator, CandidateSelector, ColorSegmenter, Contour, ContourExtractor, HullAnalyzer,
    HullReport,
};

/// Every intermediate product of one frame, kept so a presentation layer can
/// draw it. Dropped when the caller is done with the frame.
#[derive(Debug, Clone)]
pub struct FrameAnalysis {
    pub mask: Mask,
    pub contours: Vec<Contour>,
    pub hulls: HullReport,
    pub selected: Option<Candidate>,
    pub bearing: Option<BearingResult>,
}

impl FrameAnalysis {
    pub fn has_target(&self) -> bool {
        self.bearing.is_some()
    }

    /// Candidates whose hull came from an outer border. The edge ring of a
    /// solid blob also yields a hole border of nearly the same area, so
    /// `hulls.candidates` usually holds two entries per blob.
    pub fn target_count(&self) -> usize {
        self.hulls
            .candidates
            .iter()
            .filter(|candidate| {
                self.hulls
                    .hulls
                    .get(candidate.hull_index)
                    .and_then(|hull| self.contours.get(hull.contour_index))
                    .is_some_and(|contour| !contour.is_hole)
            })
            .count()
    }
}

/// Stateless per-frame pipeline: frame -> mask -> contours -> hulls ->
/// candidate -> bearing.
pub struct TargetingPipeline {
    extractor: ContourExtractor,
    selector: CandidateSelector,
    estimator: BearingEstimator,
}

impl TargetingPipeline {
    pub fn new(camera: CameraModel) -> Self {
        Self {
            extractor: ContourExtractor::new(),
            selector: CandidateSelector::new(),
            estimator: BearingEstimator::new(camera),
        }
    }

    /// Runs all stages against one thresholds snapshot.
    pub fn process(&self, frame: &Frame, thresholds: &Thresholds) -> StageResult<FrameAnalysis> {
        let mask = ColorSegmenter::new(thresholds.color_range).execute(frame)?;
        let contours = self.extractor.execute(&mask)?;
        let hulls = HullAnalyzer::new(thresholds.area).execute(&contours)?;
        let selected = self.selector.execute(&hulls.candidates)?;
        let bearing = selected
            .as_ref()
            .map(|candidate| self.estimator.execute(candidate))
            .transpose()?;

        Ok(FrameAnalysis {
            mask,
            contours,
            hulls,
            selected,
            bearing,
        })
    }
}
