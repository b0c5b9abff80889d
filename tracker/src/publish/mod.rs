pub mod bridge;
pub mod bus;
pub mod model;
pub mod overlay;

use targetcore::interface::{BearingResult, Frame};
use targetcore::orchestrator::Publisher;
use targetcore::pipeline::FrameAnalysis;
use targetcore::prelude::StageResult;

/// Forwards every call to each inner publisher. All of them run even if an
/// earlier one fails; the first error is returned.
#[derive(Default)]
pub struct Fanout {
    sinks: Vec<Box<dyn Publisher>>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Box<dyn Publisher>) {
        self.sinks.push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Publisher for Fanout {
    fn publish(&mut self, result: &BearingResult) -> StageResult<()> {
        let mut first_error = None;
        for sink in &mut self.sinks {
            if let Err(err) = sink.publish(result) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn observe(&mut self, frame: &Frame, analysis: &FrameAnalysis) -> StageResult<()> {
        let mut first_error = None;
        for sink in &mut self.sinks {
            if let Err(err) = sink.observe(frame, analysis) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
