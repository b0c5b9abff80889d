use anyhow::Context;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use targetcore::prelude::{AreaPolicy, CameraModel};

/// Where frames come from for the whole session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Local camera device selected by index
    #[default]
    Usb,
    /// Network video stream (MJPEG, RTSP, HTTP)
    Stream,
    /// One still image, delivered every frame
    Static,
    /// Generated test scene
    Synthetic,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub mode: SourceMode,
    pub static_path: PathBuf,
    pub stream_url: String,
    pub seed: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::Usb,
            static_path: PathBuf::from("static_image.jpg"),
            stream_url: "http://axis-camera.local/mjpg/video.mjpg".to_string(),
            seed: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub directory: Option<PathBuf>,
    pub every: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            directory: None,
            every: 30,
        }
    }
}

/// Session settings. Nothing here is written back at shutdown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub source: SourceConfig,
    pub width: usize,
    pub height: usize,
    pub camera: CameraModel,
    pub area: AreaPolicy,
    /// ZeroMQ endpoint the PUB socket binds, e.g. `tcp://*:5800`; bearings go
    /// to stdout when unset.
    pub publish: Option<String>,
    /// Address of the HTTP control surface.
    pub bind: String,
    pub overlay: OverlayConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            width: 800,
            height: 600,
            camera: CameraModel::default(),
            area: AreaPolicy::default(),
            publish: None,
            bind: "127.0.0.1:9000".to_string(),
            overlay: OverlayConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.width == 0 || self.height == 0 {
            anyhow::bail!("frame size {}x{} has zero area", self.width, self.height);
        }
        if !(self.camera.focal_length_px > 0.0) {
            anyhow::bail!(
                "focal length must be positive, got {}",
                self.camera.focal_length_px
            );
        }
        Ok(())
    }
}
