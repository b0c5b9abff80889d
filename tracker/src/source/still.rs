use anyhow::Context;
use image::imageops::FilterType;
use std::path::Path;
use targetcore::interface::Frame;
use targetcore::orchestrator::FrameSource;
use targetcore::prelude::StageResult;

/// A single decoded image handed out as every frame of the session.
pub struct StillImage {
    frame: Frame,
    label: String,
}

impl StillImage {
    /// Decodes `path`, resizing to the session size when they differ.
    pub fn open(path: &Path, width: usize, height: usize) -> anyhow::Result<Self> {
        let decoded = image::open(path)
            .with_context(|| format!("decoding {}", path.display()))?
            .to_rgb8();
        let (w, h) = (width as u32, height as u32);
        let sized = if decoded.dimensions() == (w, h) {
            decoded
        } else {
            image::imageops::resize(&decoded, w, h, FilterType::Triangle)
        };
        let frame = Frame::from_rgb(width, height, sized.into_raw())?;
        Ok(Self {
            frame,
            label: path.display().to_string(),
        })
    }

    pub fn from_frame(frame: Frame, label: &str) -> Self {
        Self {
            frame,
            label: label.to_string(),
        }
    }
}

impl FrameSource for StillImage {
    fn next_frame(&mut self) -> StageResult<Option<Frame>> {
        Ok(Some(self.frame.clone()))
    }

    fn is_live(&self) -> bool {
        true
    }

    fn describe(&self) -> String {
        format!("still image {}", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    #[test]
    fn still_image_is_resized_to_session_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("target.png");
        RgbImage::from_pixel(40, 30, Rgb([40, 220, 180]))
            .save(&path)
            .unwrap();

        let mut source = StillImage::open(&path, 80, 60).unwrap();
        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!((frame.width(), frame.height()), (80, 60));
        assert_eq!(frame.pixel(10, 10).to_vec(), vec![40, 220, 180]);
        assert!(source.next_frame().unwrap().is_some());
    }

    #[test]
    fn missing_image_fails_to_open() {
        let dir = tempdir().unwrap();
        assert!(StillImage::open(&dir.path().join("nope.png"), 8, 8).is_err());
    }
}
