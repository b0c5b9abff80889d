use crate::interface::{Frame, Mask};
use crate::math::rgb_to_hsv;
use crate::prelude::{ColorRange, ProcessingStage, StageError, StageResult};

/// Thresholds a frame in HSV space against one [`ColorRange`] snapshot.
pub struct ColorSegmenter {
    range: ColorRange,
}

impl ColorSegmenter {
    pub fn new(range: ColorRange) -> Self {
        Self { range }
    }
}

impl ProcessingStage for ColorSegmenter {
    type Input = Frame;
    type Output = Mask;

    fn name(&self) -> &'static str {
        "color-segmenter"
    }

    fn execute(&self, frame: &Frame) -> StageResult<Mask> {
        if frame.is_empty() {
            return Err(StageError::InvalidFrame("frame has zero area".into()));
        }

        let mut mask = Mask::new(frame.width(), frame.height());
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                let px = frame.pixel(x, y);
                let (h, s, v) = rgb_to_hsv(px[0], px[1], px[2]);
                if self.range.contains(h, s, v) {
                    mask.set(x, y, true);
                }
            }
        }
        Ok(mask)
    }
}
