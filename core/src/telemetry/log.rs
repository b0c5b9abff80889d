use crate::pipeline::FrameAnalysis;
use log::{debug, info};

/// Session and per-frame diagnostics.
///
/// Per-frame outcomes go to `debug`, so they only appear in verbose runs.
pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn frame(&self, index: u64, analysis: &FrameAnalysis) {
        match &analysis.bearing {
            Some(bearing) => debug!(
                "frame {}: target at ({}, {}) area {} bearing {}",
                index,
                bearing.pixel_x,
                bearing.pixel_y,
                bearing.area,
                bearing.message()
            ),
            None => debug!(
                "frame {}: no target ({} contours, {} hulls, min area {:.1})",
                index,
                analysis.contours.len(),
                analysis.hulls.hulls.len(),
                analysis.hulls.min_area
            ),
        }
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
