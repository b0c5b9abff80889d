use anyhow::Context;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_polygon_mut, draw_line_segment_mut};
use imageproc::point::Point as ImPoint;
use log::debug;
use std::fs;
use std::path::PathBuf;
use targetcore::interface::{BearingResult, Frame};
use targetcore::math::Point;
use targetcore::orchestrator::Publisher;
use targetcore::pipeline::FrameAnalysis;
use targetcore::prelude::{StageError, StageResult};

const HULL: Rgb<u8> = Rgb([255, 210, 0]);
const SELECTED: Rgb<u8> = Rgb([255, 40, 40]);
const MASK_TINT: Rgb<u8> = Rgb([0, 90, 255]);

/// Draws hulls, the selected hull and its centroid on top of the frame.
pub fn render(frame: &Frame, analysis: &FrameAnalysis) -> StageResult<RgbImage> {
    let (w, h) = (frame.width() as u32, frame.height() as u32);
    let mut canvas = RgbImage::from_raw(w, h, frame.to_rgb_bytes())
        .ok_or_else(|| StageError::Internal("frame buffer does not fit image".into()))?;

    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        if analysis.mask.get(x as usize, y as usize) {
            pixel.0 = [
                pixel.0[0] / 2 + MASK_TINT.0[0] / 2,
                pixel.0[1] / 2 + MASK_TINT.0[1] / 2,
                pixel.0[2] / 2 + MASK_TINT.0[2] / 2,
            ];
        }
    }

    let selected_hull = analysis.selected.map(|c| c.hull_index);
    for (index, hull) in analysis.hulls.hulls.iter().enumerate() {
        if Some(index) != selected_hull {
            draw_hull(&mut canvas, &hull.points, HULL);
        }
    }
    // Hole borders of a thin ring share pixels with the outer border.
    if let Some(hull) = selected_hull.and_then(|index| analysis.hulls.hulls.get(index)) {
        draw_hull(&mut canvas, &hull.points, SELECTED);
    }

    if let Some(bearing) = &analysis.bearing {
        draw_cross(&mut canvas, bearing, 6.0);
    }
    Ok(canvas)
}

fn draw_hull(canvas: &mut RgbImage, points: &[Point], color: Rgb<u8>) {
    let outline: Vec<ImPoint<f32>> = points
        .iter()
        .map(|p| ImPoint::new(p.x as f32, p.y as f32))
        .collect();
    draw_hollow_polygon_mut(canvas, &outline, color);
}

fn draw_cross(canvas: &mut RgbImage, bearing: &BearingResult, arm: f32) {
    let (cx, cy) = (bearing.pixel_x as f32, bearing.pixel_y as f32);
    draw_line_segment_mut(canvas, (cx - arm, cy), (cx + arm, cy), SELECTED);
    draw_line_segment_mut(canvas, (cx, cy - arm), (cx, cy + arm), SELECTED);
}

/// Saves a rendered overlay every `every` frames as `overlay_NNNNNN.png`.
pub struct OverlayWriter {
    directory: PathBuf,
    every: u64,
    seen: u64,
}

impl OverlayWriter {
    pub fn new(directory: PathBuf, every: u64) -> anyhow::Result<Self> {
        fs::create_dir_all(&directory)
            .with_context(|| format!("creating overlay directory {}", directory.display()))?;
        Ok(Self {
            directory,
            every: every.max(1),
            seen: 0,
        })
    }
}

impl Publisher for OverlayWriter {
    fn publish(&mut self, _result: &BearingResult) -> StageResult<()> {
        Ok(())
    }

    fn observe(&mut self, frame: &Frame, analysis: &FrameAnalysis) -> StageResult<()> {
        let index = self.seen;
        self.seen += 1;
        if index % self.every != 0 {
            return Ok(());
        }
        let path = self.directory.join(format!("overlay_{:06}.png", index));
        render(frame, analysis)?
            .save(&path)
            .map_err(|err| StageError::Publish(format!("{}: {}", path.display(), err)))?;
        debug!("wrote overlay {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use targetcore::control::Thresholds;
    use targetcore::pipeline::TargetingPipeline;
    use targetcore::prelude::CameraModel;
    use tempfile::tempdir;

    fn analysed() -> (Frame, FrameAnalysis) {
        let mut frame = Frame::filled(200, 100, [0, 0, 0]).unwrap();
        frame.fill_rect(40, 20, 101, 81, [40, 220, 180]);
        let analysis = TargetingPipeline::new(CameraModel {
            principal_point_x: 100.0,
            focal_length_px: 120.0,
        })
        .process(&frame, &Thresholds::default())
        .unwrap();
        (frame, analysis)
    }

    #[test]
    fn render_marks_selected_hull_and_centroid() {
        let (frame, analysis) = analysed();
        let canvas = render(&frame, &analysis).unwrap();
        assert_eq!(canvas.dimensions(), (200, 100));
        assert_eq!(*canvas.get_pixel(40, 20), SELECTED);
        assert_eq!(*canvas.get_pixel(70, 50), SELECTED);
        assert_eq!(*canvas.get_pixel(5, 5), Rgb([0, 0, 0]));
    }

    #[test]
    fn writer_saves_every_nth_frame() {
        let dir = tempdir().unwrap();
        let (frame, analysis) = analysed();
        let mut writer = OverlayWriter::new(dir.path().join("overlays"), 2).unwrap();
        for _ in 0..3 {
            writer.observe(&frame, &analysis).unwrap();
        }
        assert!(dir.path().join("overlays/overlay_000000.png").exists());
        assert!(!dir.path().join("overlays/overlay_000001.png").exists());
        assert!(dir.path().join("overlays/overlay_000002.png").exists());
    }
}
