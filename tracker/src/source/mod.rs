pub mod capture;
pub mod still;
pub mod synthetic;

use crate::workflow::config::{SourceMode, WorkflowConfig};
use anyhow::Context;
use capture::FfmpegCapture;
use still::StillImage;
use synthetic::{GeneratorConfig, SyntheticSource};
use targetcore::orchestrator::FrameSource;

/// Opens the frame source selected for this session.
pub fn open_source(config: &WorkflowConfig, camera_index: u32) -> anyhow::Result<Box<dyn FrameSource>> {
    let (width, height) = (config.width, config.height);
    let source: Box<dyn FrameSource> = match config.source.mode {
        SourceMode::Usb => Box::new(
            FfmpegCapture::device(camera_index, width, height)
                .with_context(|| format!("opening camera {}", camera_index))?,
        ),
        SourceMode::Stream => Box::new(
            FfmpegCapture::stream(&config.source.stream_url, width, height)
                .with_context(|| format!("opening stream {}", config.source.stream_url))?,
        ),
        SourceMode::Static => Box::new(
            StillImage::open(&config.source.static_path, width, height).with_context(|| {
                format!("opening image {}", config.source.static_path.display())
            })?,
        ),
        SourceMode::Synthetic => Box::new(SyntheticSource::new(GeneratorConfig {
            width,
            height,
            seed: config.source.seed,
            ..Default::default()
        })),
    };
    Ok(source)
}
