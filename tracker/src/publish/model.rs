use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use targetcore::interface::{BearingResult, Frame};
use targetcore::orchestrator::Publisher;
use targetcore::pipeline::FrameAnalysis;
use targetcore::prelude::StageResult;

/// Latest per-frame outcome exposed by the control surface.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TargetModel {
    pub frames: u64,
    pub contour_count: usize,
    /// Candidates traced from outer borders, one per detected blob.
    pub candidate_count: usize,
    pub min_area: f64,
    pub bearing: Option<BearingResult>,
    pub message: Option<String>,
}

/// Publisher that keeps a [`TargetModel`] current for readers on other threads.
#[derive(Clone, Default)]
pub struct ModelPublisher {
    state: Arc<RwLock<TargetModel>>,
}

impl ModelPublisher {
    pub fn new(state: Arc<RwLock<TargetModel>>) -> Self {
        Self { state }
    }

    pub fn snapshot(&self) -> TargetModel {
        match self.state.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Publisher for ModelPublisher {
    fn publish(&mut self, _result: &BearingResult) -> StageResult<()> {
        Ok(())
    }

    fn observe(&mut self, _frame: &Frame, analysis: &FrameAnalysis) -> StageResult<()> {
        let mut guard = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.frames += 1;
        guard.contour_count = analysis.contours.len();
        guard.candidate_count = analysis.target_count();
        guard.min_area = analysis.hulls.min_area;
        guard.bearing = analysis.bearing;
        guard.message = analysis.bearing.map(|b| b.message());
        Ok(())
    }
}
