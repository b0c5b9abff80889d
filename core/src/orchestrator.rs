//! Frame loop: pull a frame, run the pipeline, hand the bearing to the publisher.

use crate::control::SharedThresholds;
use crate::interface::{BearingResult, Frame};
use crate::pipeline::{FrameAnalysis, TargetingPipeline};
use crate::prelude::{CameraModel, StageError, StageResult};
use crate::telemetry::{LogManager, Metrics, MetricsRecorder};
use log::warn;
use std::sync::atomic::{AtomicBool, Ordering};

/// Anything that can produce frames one at a time.
pub trait FrameSource {
    /// Blocks until the next frame is ready. `Ok(None)` means end of stream.
    fn next_frame(&mut self) -> StageResult<Option<Frame>>;

    fn is_live(&self) -> bool;

    fn describe(&self) -> String;
}

/// Receiver of per-frame results.
pub trait Publisher {
    /// Called once for every frame that selected a target.
    fn publish(&mut self, result: &BearingResult) -> StageResult<()>;

    /// Called for every frame with all intermediate products.
    fn observe(&mut self, _frame: &Frame, _analysis: &FrameAnalysis) -> StageResult<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Idle,
    Processing,
}

/// Sequences the pipeline over a frame source until stopped.
pub struct Orchestrator {
    pipeline: TargetingPipeline,
    thresholds: SharedThresholds,
    state: OrchestratorState,
    frame_size: Option<(usize, usize)>,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl Orchestrator {
    pub fn new(camera: CameraModel, thresholds: SharedThresholds) -> Self {
        Self {
            pipeline: TargetingPipeline::new(camera),
            thresholds,
            state: OrchestratorState::Idle,
            frame_size: None,
            metrics: MetricsRecorder::new(),
            logger: LogManager::new(),
        }
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    pub fn thresholds(&self) -> &SharedThresholds {
        &self.thresholds
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics.snapshot()
    }

    /// Processes one frame and delivers its result. Publish failures are
    /// logged and counted; they never abort the frame.
    pub fn process_frame<P>(&mut self, frame: &Frame, publisher: &mut P) -> StageResult<FrameAnalysis>
    where
        P: Publisher + ?Sized,
    {
        let size = (frame.width(), frame.height());
        match self.frame_size {
            None => self.frame_size = Some(size),
            Some(expected) if expected != size => {
                return Err(StageError::InvalidFrame(format!(
                    "frame size changed from {}x{} to {}x{}",
                    expected.0, expected.1, size.0, size.1
                )));
            }
            Some(_) => {}
        }

        self.state = OrchestratorState::Processing;
        let snapshot = self.thresholds.snapshot();
        let outcome = self.pipeline.process(frame, &snapshot);
        let analysis = match outcome {
            Ok(analysis) => analysis,
            Err(err) => {
                self.state = OrchestratorState::Idle;
                return Err(err);
            }
        };

        let index = self.metrics.snapshot().processed;
        self.metrics.record_processed();
        self.logger.frame(index, &analysis);

        if let Some(bearing) = &analysis.bearing {
            match publisher.publish(bearing) {
                Ok(()) => self.metrics.record_published(),
                Err(err) => {
                    self.metrics.record_publish_error();
                    warn!("dropping bearing for frame {}: {}", index, err);
                }
            }
        }
        if let Err(err) = publisher.observe(frame, &analysis) {
            warn!("observer failed on frame {}: {}", index, err);
        }

        self.state = OrchestratorState::Idle;
        Ok(analysis)
    }

    /// Loops until `running` is cleared or `max_frames` frames are done.
    /// A dead or exhausted source ends the session with an error.
    pub fn run<S, P>(
        &mut self,
        source: &mut S,
        publisher: &mut P,
        running: &AtomicBool,
        max_frames: Option<u64>,
    ) -> StageResult<Metrics>
    where
        S: FrameSource + ?Sized,
        P: Publisher + ?Sized,
    {
        self.logger
            .record(&format!("tracking from {}", source.describe()));
        let mut handled: u64 = 0;

        while running.load(Ordering::SeqCst) {
            if max_frames.is_some_and(|limit| handled >= limit) {
                break;
            }
            if !source.is_live() {
                return Err(StageError::SourceUnavailable(format!(
                    "{} is no longer live",
                    source.describe()
                )));
            }

            let frame = source.next_frame()?.ok_or_else(|| {
                StageError::SourceUnavailable(format!("{} ran out of frames", source.describe()))
            })?;
            self.process_frame(&frame, publisher)?;
            handled += 1;
        }

        let metrics = self.metrics.snapshot();
        self.logger.record(&format!(
            "session done: {} frames, {} bearings published, {} publish errors",
            metrics.processed, metrics.published, metrics.publish_errors
        ));
        Ok(metrics)
    }
}
