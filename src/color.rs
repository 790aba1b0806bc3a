//! Color-space conversions and inclusive range thresholding.
//!
//! Conventions follow the common 8-bit layout used by camera tooling:
//! - gray: BT.601 luma `0.299 R + 0.587 G + 0.114 B`, fixed-point rounded;
//! - HSV: `H ∈ [0, 180)` (degrees halved), `S, V ∈ [0, 255]`.
use crate::image::{ColorImage, GrayImage, ImageView, ImageViewMut, Rgb};
use serde::{Deserialize, Serialize};

/// Per-pixel `[h, s, v]` triple.
pub type Hsv = [u8; 3];

const GRAY_SHIFT: u32 = 14;
const GRAY_R: u32 = 4899;
const GRAY_G: u32 = 9617;
const GRAY_B: u32 = 1868;

/// Inclusive lower/upper bounds on each HSV channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: Hsv,
    pub upper: Hsv,
}

impl HsvRange {
    pub const fn new(lower: Hsv, upper: Hsv) -> Self {
        Self { lower, upper }
    }

    /// High-saturation yellow/orange paint.
    pub const ORANGE: HsvRange = HsvRange::new([0, 110, 153], [19, 240, 255]);
    /// Low-saturation bright white paint.
    pub const WHITE: HsvRange = HsvRange::new([0, 0, 170], [170, 110, 255]);

    #[inline]
    pub fn contains(&self, px: Hsv) -> bool {
        (0..3).all(|c| px[c] >= self.lower[c] && px[c] <= self.upper[c])
    }

    /// True when every lower bound is at most its upper bound.
    pub fn is_ordered(&self) -> bool {
        (0..3).all(|c| self.lower[c] <= self.upper[c])
    }
}

#[inline]
pub fn rgb_to_gray(px: Rgb) -> u8 {
    let [r, g, b] = px.map(u32::from);
    ((r * GRAY_R + g * GRAY_G + b * GRAY_B + (1 << (GRAY_SHIFT - 1))) >> GRAY_SHIFT) as u8
}

#[inline]
pub fn rgb_to_hsv(px: Rgb) -> Hsv {
    let [r, g, b] = px.map(i32::from);
    let v = r.max(g).max(b);
    let vmin = r.min(g).min(b);
    let diff = v - vmin;

    let s = if v == 0 {
        0
    } else {
        (255.0 * diff as f32 / v as f32).round() as i32
    };

    let h = if diff == 0 {
        0.0
    } else {
        let d = diff as f32;
        let deg = if v == r {
            60.0 * (g - b) as f32 / d
        } else if v == g {
            120.0 + 60.0 * (b - r) as f32 / d
        } else {
            240.0 + 60.0 * (r - g) as f32 / d
        };
        let deg = if deg < 0.0 { deg + 360.0 } else { deg };
        deg * 0.5
    };
    let mut h = h.round() as i32;
    if h >= 180 {
        h -= 180;
    }
    [h as u8, s.clamp(0, 255) as u8, v as u8]
}

pub fn to_gray(frame: &ColorImage) -> GrayImage {
    let mut out = GrayImage::new(frame.w, frame.h);
    for y in 0..frame.h {
        let src = frame.row(y);
        for (dst, &px) in out.row_mut(y).iter_mut().zip(src) {
            *dst = rgb_to_gray(px);
        }
    }
    out
}

/// Convert to an HSV frame stored in a `ColorImage` (`[h, s, v]` per pixel).
pub fn to_hsv(frame: &ColorImage) -> ColorImage {
    ColorImage {
        w: frame.w,
        h: frame.h,
        data: frame.data.iter().map(|&px| rgb_to_hsv(px)).collect(),
    }
}

/// 255 where the pixel lies inside `range` (inclusive), 0 elsewhere.
pub fn in_range(hsv: &ColorImage, range: &HsvRange) -> GrayImage {
    GrayImage {
        w: hsv.w,
        h: hsv.h,
        data: hsv
            .data
            .iter()
            .map(|&px| if range.contains(px) { 255 } else { 0 })
            .collect(),
    }
}

/// Element-wise OR of two equally sized masks.
pub fn bitwise_or(a: &GrayImage, b: &GrayImage) -> GrayImage {
    debug_assert_eq!((a.w, a.h), (b.w, b.h));
    GrayImage {
        w: a.w,
        h: a.h,
        data: a.data.iter().zip(&b.data).map(|(&x, &y)| x | y).collect(),
    }
}

/// Element-wise AND of two equally sized buffers.
pub fn bitwise_and(a: &GrayImage, b: &GrayImage) -> GrayImage {
    debug_assert_eq!((a.w, a.h), (b.w, b.h));
    GrayImage {
        w: a.w,
        h: a.h,
        data: a.data.iter().zip(&b.data).map(|(&x, &y)| x & y).collect(),
    }
}
