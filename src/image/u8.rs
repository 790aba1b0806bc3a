//! Owned 8-bit single-channel buffer (`GrayImage`).
//!
//! `GrayImage` doubles as the binary lane mask produced by the mask
//! extractor, where every value is either 0 or 255.
use super::traits::{ImageView, ImageViewMut};

/// Owned 8-bit grayscale buffer in row-major order (stride == width).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

/// Binary lane-candidate mask; values are exactly 0 or 255.
pub type BinaryMask = GrayImage;

impl GrayImage {
    /// Zero-initialized `w × h` buffer.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; w * h],
        }
    }

    /// Wrap raw bytes; `None` when the length does not match `w * h`.
    pub fn from_raw(w: usize, h: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == w * h).then_some(Self { w, h, data })
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Copy into an `image` crate buffer for the `imageproc` operators.
    pub fn to_luma(&self) -> image::GrayImage {
        image::GrayImage::from_fn(self.w as u32, self.h as u32, |x, y| {
            image::Luma([self.get(x as usize, y as usize)])
        })
    }

    /// Take ownership of an `image` crate buffer.
    pub fn from_luma(img: image::GrayImage) -> Self {
        let (w, h) = (img.width() as usize, img.height() as usize);
        Self {
            w,
            h,
            data: img.into_raw(),
        }
    }

    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

impl ImageView for GrayImage {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}

impl ImageViewMut for GrayImage {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.w;
        &mut self.data[start..start + self.w]
    }
}
