//! Owned interleaved 8-bit RGB frame.
//!
//! Pixels are stored as `[r, g, b]` triples in row-major order. This is the
//! input and output type of the lane pipeline.
use super::traits::{ImageView, ImageViewMut};

/// An RGB color triple.
pub type Rgb = [u8; 3];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorImage {
    pub w: usize,
    pub h: usize,
    pub data: Vec<Rgb>,
}

impl ColorImage {
    /// Black `w × h` frame.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, [0, 0, 0])
    }

    pub fn filled(w: usize, h: usize, color: Rgb) -> Self {
        Self {
            w,
            h,
            data: vec![color; w * h],
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.data[self.idx(x, y)]
    }
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, px: Rgb) {
        let i = self.idx(x, y);
        self.data[i] = px;
    }

    /// Copy into an `image` crate buffer for the `imageproc` operators.
    pub fn to_rgb(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.w as u32, self.h as u32, |x, y| {
            image::Rgb(self.get(x as usize, y as usize))
        })
    }

    /// Copy out of an `image` crate buffer.
    pub fn from_rgb(img: &image::RgbImage) -> Self {
        Self {
            w: img.width() as usize,
            h: img.height() as usize,
            data: img.pixels().map(|p| p.0).collect(),
        }
    }

    /// Structural check: buffer length agrees with the declared size.
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == self.w * self.h
    }
}

impl ImageView for ColorImage {
    type Pixel = Rgb;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[Rgb] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}

impl ImageViewMut for ColorImage {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [Rgb] {
        let start = y * self.w;
        &mut self.data[start..start + self.w]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_conversion_keeps_layout() {
        let mut img = ColorImage::new(3, 2);
        img.set(2, 1, [7, 8, 9]);
        let buf = img.to_rgb();
        assert_eq!(buf.get_pixel(2, 1).0, [7, 8, 9]);
        assert_eq!(ColorImage::from_rgb(&buf), img);
    }
}
