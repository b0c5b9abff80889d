use crate::publish::bridge::ControlBridge;
use crate::publish::overlay::OverlayWriter;
use crate::publish::bus::{StdoutPublisher, ZmqPublisher};
use crate::publish::Fanout;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use log::info;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use targetcore::control::SharedThresholds;
use targetcore::interface::BearingResult;
use targetcore::orchestrator::{FrameSource, Publisher};
use targetcore::prelude::StageError;
use targetcore::telemetry::Metrics;
use targetcore::Orchestrator;

/// What a single offline frame produced.
#[derive(Debug, Clone, PartialEq)]
pub struct OfflineSummary {
    pub source: String,
    pub width: usize,
    pub height: usize,
    pub contours: usize,
    pub candidates: usize,
    /// Candidates from outer borders only.
    pub targets: usize,
    pub min_area: f64,
    pub bearing: Option<BearingResult>,
}

impl fmt::Display for OfflineSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Offline run -> {} ({}x{}): contours {}, candidates {} ({} outer), min area {:.1}",
            self.source,
            self.width,
            self.height,
            self.contours,
            self.candidates,
            self.targets,
            self.min_area
        )?;
        match &self.bearing {
            Some(bearing) => write!(
                f,
                ", bearing {} rad at ({}, {}) area {}",
                bearing.message(),
                bearing.pixel_x,
                bearing.pixel_y,
                bearing.area
            ),
            None => write!(f, ", no target"),
        }
    }
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Builds the outbound sinks: the ZeroMQ publisher (stdout when no
    /// endpoint is configured), the overlay writer and the control surface model.
    pub fn publishers(&self, bridge: Option<&ControlBridge>) -> anyhow::Result<Fanout> {
        let mut fanout = Fanout::new();
        match &self.config.publish {
            Some(endpoint) => {
                let publisher =
                    ZmqPublisher::bind(endpoint).context("opening bearing publisher")?;
                info!("publishing bearings on {}", publisher.endpoint());
                fanout.push(Box::new(publisher));
            }
            None => fanout.push(Box::new(StdoutPublisher)),
        }
        if let Some(directory) = &self.config.overlay.directory {
            fanout.push(Box::new(OverlayWriter::new(
                directory.clone(),
                self.config.overlay.every,
            )?));
        }
        if let Some(bridge) = bridge {
            fanout.push(Box::new(bridge.publisher()));
        }
        info!("{} result sinks attached", fanout.sink_count());
        Ok(fanout)
    }

    /// Runs the frame loop until `running` is cleared, `max_frames` is
    /// reached or the source fails. A source that dies after shutdown was
    /// requested counts as a clean stop.
    pub fn execute(
        &self,
        source: &mut dyn FrameSource,
        publisher: &mut dyn Publisher,
        thresholds: SharedThresholds,
        running: &AtomicBool,
        max_frames: Option<u64>,
    ) -> anyhow::Result<Metrics> {
        let mut orchestrator = Orchestrator::new(self.config.camera, thresholds);
        match orchestrator.run(source, publisher, running, max_frames) {
            Ok(metrics) => Ok(metrics),
            Err(StageError::SourceUnavailable(reason)) if !running.load(Ordering::SeqCst) => {
                info!("source closed during shutdown: {}", reason);
                Ok(orchestrator.metrics())
            }
            Err(err) => Err(err).context("tracking session failed"),
        }
    }

    /// Processes exactly one frame and reports what the pipeline saw.
    pub fn offline(
        &self,
        source: &mut dyn FrameSource,
        publisher: &mut dyn Publisher,
        thresholds: SharedThresholds,
    ) -> anyhow::Result<OfflineSummary> {
        let frame = source
            .next_frame()
            .context("reading offline frame")?
            .ok_or_else(|| anyhow::anyhow!("{} produced no frame", source.describe()))?;
        let mut orchestrator = Orchestrator::new(self.config.camera, thresholds);
        let analysis = orchestrator
            .process_frame(&frame, publisher)
            .context("processing offline frame")?;

        Ok(OfflineSummary {
            source: source.describe(),
            width: frame.width(),
            height: frame.height(),
            contours: analysis.contours.len(),
            candidates: analysis.hulls.candidates.len(),
            targets: analysis.target_count(),
            min_area: analysis.hulls.min_area,
            bearing: analysis.bearing,
        })
    }
}
