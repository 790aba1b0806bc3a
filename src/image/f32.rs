//! Owned single-channel f32 image in row-major layout (stride == width).
//!
//! Used as the working buffer for smoothing and gradient computation, where
//! intermediate values must not be quantized to 8 bits.
use super::traits::{ImageView, ImageViewMut};
use super::u8::GrayImage;

#[derive(Clone, Debug)]
pub struct ImageF32 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0.0; w * h],
        }
    }

    /// Promote an 8-bit image without rescaling (values stay in [0, 255]).
    pub fn from_gray(gray: &GrayImage) -> Self {
        Self {
            w: gray.w,
            h: gray.h,
            data: gray.data.iter().map(|&v| v as f32).collect(),
        }
    }

    /// Round and saturate back to 8 bits.
    pub fn to_gray(&self) -> GrayImage {
        GrayImage {
            w: self.w,
            h: self.h,
            data: self
                .data
                .iter()
                .map(|&v| v.round().clamp(0.0, 255.0) as u8)
                .collect(),
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }
}

impl ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}

impl ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.w;
        &mut self.data[start..start + self.w]
    }
}
