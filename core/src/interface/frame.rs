use crate::prelude::{StageError, StageResult};
use image::{GrayImage, Luma};
use ndarray::{Array2, Array3, ArrayView1};

/// An RGB image with fixed dimensions, stored row-major as `(height, width, 3)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pixels: Array3<u8>,
}

impl Frame {
    /// Wraps an interleaved RGB buffer of `width * height * 3` bytes.
    pub fn from_rgb(width: usize, height: usize, data: Vec<u8>) -> StageResult<Self> {
        if width == 0 || height == 0 {
            return Err(StageError::InvalidFrame(format!(
                "zero-area frame {}x{}",
                width, height
            )));
        }
        let pixels = Array3::from_shape_vec((height, width, 3), data).map_err(|err| {
            StageError::InvalidFrame(format!("buffer does not match {}x{}: {}", width, height, err))
        })?;
        Ok(Self { pixels })
    }

    /// Creates a frame filled with one color.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> StageResult<Self> {
        let data = rgb.iter().copied().cycle().take(width * height * 3).collect();
        Self::from_rgb(width, height, data)
    }

    pub fn width(&self) -> usize {
        self.pixels.dim().1
    }

    pub fn height(&self) -> usize {
        self.pixels.dim().0
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixel(&self, x: usize, y: usize) -> ArrayView1<'_, u8> {
        self.pixels.slice(ndarray::s![y, x, ..])
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        for (channel, value) in rgb.iter().enumerate() {
            self.pixels[[y, x, channel]] = *value;
        }
    }

    /// Paints the axis-aligned rectangle `[x0, x1) x [y0, y1)`, clipped to the frame.
    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, rgb: [u8; 3]) {
        for y in y0..y1.min(self.height()) {
            for x in x0..x1.min(self.width()) {
                self.set_pixel(x, y, rgb);
            }
        }
    }

    pub fn pixels(&self) -> &Array3<u8> {
        &self.pixels
    }

    /// Interleaved RGB bytes in row-major order.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().copied().collect()
    }
}

/// Binary image: 1 marks a foreground pixel, 0 background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    bits: Array2<u8>,
}

impl Mask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            bits: Array2::zeros((height, width)),
        }
    }

    /// Any non-zero pixel of `image` is foreground.
    pub fn from_gray(image: &GrayImage) -> Self {
        let (w, h) = (image.width() as usize, image.height() as usize);
        Self {
            bits: Array2::from_shape_fn((h, w), |(y, x)| {
                u8::from(image.get_pixel(x as u32, y as u32)[0] != 0)
            }),
        }
    }

    /// 8-bit image with foreground at 255, the layout `imageproc` expects.
    pub fn to_gray(&self) -> GrayImage {
        GrayImage::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            Luma([if self.get(x as usize, y as usize) { 255 } else { 0 }])
        })
    }

    pub fn width(&self) -> usize {
        self.bits.ncols()
    }

    pub fn height(&self) -> usize {
        self.bits.nrows()
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bits[[y, x]] != 0
    }

    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.bits[[y, x]] = u8::from(on);
    }

    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize) {
        for y in y0..y1.min(self.height()) {
            for x in x0..x1.min(self.width()) {
                self.set(x, y, true);
            }
        }
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&v| v != 0).count()
    }
}
