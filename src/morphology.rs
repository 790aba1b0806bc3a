//! Binary morphology with square structuring elements, backed by
//! `imageproc::morphology`.
//!
//! A `size × size` square is the L∞ ball of radius `size / 2`, so `size` must
//! be odd. Inputs are treated as binary (nonzero is foreground) and outputs
//! hold exactly 0 or 255. Pixels outside the image count as neither
//! foreground nor background, which keeps erosion from eating into shapes that
//! touch the border.
use crate::image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology;

#[inline]
fn radius(size: usize) -> u8 {
    (size / 2).min(u8::MAX as usize) as u8
}

/// Grow foreground by a `size × size` square.
pub fn dilate(src: &GrayImage, size: usize) -> GrayImage {
    if size <= 1 {
        return src.clone();
    }
    GrayImage::from_luma(morphology::dilate(&src.to_luma(), Norm::LInf, radius(size)))
}

/// Shrink foreground by a `size × size` square.
pub fn erode(src: &GrayImage, size: usize) -> GrayImage {
    if size <= 1 {
        return src.clone();
    }
    GrayImage::from_luma(morphology::erode(&src.to_luma(), Norm::LInf, radius(size)))
}

/// Dilation followed by erosion with the same element; seals gaps narrower
/// than the element.
pub fn close(src: &GrayImage, size: usize) -> GrayImage {
    if size <= 1 {
        return src.clone();
    }
    GrayImage::from_luma(morphology::close(&src.to_luma(), Norm::LInf, radius(size)))
}

/// `max_value` where `src > thresh`, else 0.
pub fn threshold_binary(src: &GrayImage, thresh: u8, max_value: u8) -> GrayImage {
    GrayImage {
        w: src.w,
        h: src.h,
        data: src
            .data
            .iter()
            .map(|&v| if v > thresh { max_value } else { 0 })
            .collect(),
    }
}
