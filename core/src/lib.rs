//! Core targeting pipeline for the color-target tracker.
//!
//! Each frame flows through segmentation, contour extraction, hull analysis,
//! candidate selection and bearing estimation. Nothing is retained between
//! frames except the externally owned thresholds in [`control`].

pub mod control;
pub mod interface;
pub mod math;
pub mod orchestrator;
pub mod pipeline;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use control::SharedThresholds;
pub use orchestrator::{Orchestrator, OrchestratorState};
pub use pipeline::{FrameAnalysis, TargetingPipeline};
pub use prelude::{ProcessingStage, StageError, StageResult};
