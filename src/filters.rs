//! Separable smoothing filters.
//!
//! `GaussianKernel` builds normalized 1D taps from a kernel size and sigma;
//! `blur_separable` convolves rows then columns with reflect-101 borders
//! (`… 2 1 | 0 1 2 … n-1 | n-2 …`), so edge pixels are not darkened.
use crate::image::{GrayImage, ImageF32, ImageView, ImageViewMut};

/// Trait implemented by separable 1D filters.
pub trait SeparableFilter {
    /// Return the 1D taps (in left-to-right order). The kernel is assumed to be
    /// symmetric around its centre, but the implementation does not rely on it.
    fn taps(&self) -> &[f32];
}

/// Sampled, normalized Gaussian.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel {
    taps: Vec<f32>,
}

impl GaussianKernel {
    /// `size` must be odd and positive. A non-positive `sigma` is derived from
    /// the size as `0.3 * ((size - 1) / 2 - 1) + 0.8`.
    pub fn new(size: usize, sigma: f32) -> Self {
        let size = size.max(1) | 1;
        let sigma = if sigma > 0.0 {
            sigma
        } else {
            0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
        };
        let center = (size / 2) as f32;
        let denom = 2.0 * sigma * sigma;
        let mut taps: Vec<f32> = (0..size)
            .map(|i| {
                let d = i as f32 - center;
                (-(d * d) / denom).exp()
            })
            .collect();
        let sum: f32 = taps.iter().sum();
        for t in &mut taps {
            *t /= sum;
        }
        Self { taps }
    }
}

impl SeparableFilter for GaussianKernel {
    #[inline]
    fn taps(&self) -> &[f32] {
        &self.taps
    }
}

#[inline]
fn reflect101(idx: isize, upper: usize) -> usize {
    if upper == 1 {
        return 0;
    }
    let n = upper as isize;
    let mut i = idx;
    // Loop handles kernels wider than the image.
    loop {
        if i < 0 {
            i = -i;
        } else if i >= n {
            i = 2 * (n - 1) - i;
        } else {
            return i as usize;
        }
    }
}

/// Convolve `src` with `filter` horizontally then vertically.
pub fn blur_separable<F: SeparableFilter>(src: &ImageF32, filter: &F) -> ImageF32 {
    let (w, h) = (src.w, src.h);
    let mut out = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        return out;
    }
    let taps = filter.taps();
    let radius = (taps.len() / 2) as isize;

    let mut horiz = ImageF32::new(w, h);
    for y in 0..h {
        let row = src.row(y);
        let dst = horiz.row_mut(y);
        for (x, px) in dst.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                let sx = reflect101(x as isize + k as isize - radius, w);
                acc += tap * row[sx];
            }
            *px = acc;
        }
    }

    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                let sy = reflect101(y as isize + k as isize - radius, h);
                acc += tap * horiz.get(x, sy);
            }
            out.set(x, y, acc);
        }
    }
    out
}

/// Gaussian blur of an 8-bit image, rounded back to 8 bits.
pub fn gaussian_blur(src: &GrayImage, size: usize, sigma: f32) -> GrayImage {
    let kernel = GaussianKernel::new(size, sigma);
    blur_separable(&ImageF32::from_gray(src), &kernel).to_gray()
}
