//! Parameter types configuring every pipeline stage.
//!
//! All thresholds live here so tests can drive the stages with synthetic
//! inputs instead of real footage. Defaults reproduce the reference 1280×720
//! dash-camera setup; each field documents its valid range, enforced by
//! [`LaneParams::validate`].

use crate::color::HsvRange;
use crate::error::{invalid_param, PreconditionError};
use crate::homography::BorderMode;
use crate::image::Rgb;
use crate::types::{Canvas, LaneSide, RoiQuad, SlidingWindow};
use serde::{Deserialize, Serialize};

/// Detector-wide parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneParams {
    /// Expected source frame width (> 0).
    pub frame_width: u32,
    /// Expected source frame height (> 0).
    pub frame_height: u32,
    /// Road trapezoid in source-frame pixels; must be non-degenerate.
    pub roi: RoiQuad,
    /// Bird's-eye canvas size (both > 0).
    pub canvas: Canvas,
    /// Fill policy for warp samples outside the source frame.
    pub warp_border: BorderMode,
    pub mask: MaskParams,
    pub window: WindowParams,
    pub overlay: OverlayParams,
}

impl Default for LaneParams {
    fn default() -> Self {
        Self {
            frame_width: 1280,
            frame_height: 720,
            roi: RoiQuad::default(),
            canvas: Canvas::default(),
            warp_border: BorderMode::default(),
            mask: MaskParams::default(),
            window: WindowParams::default(),
            overlay: OverlayParams::default(),
        }
    }
}

impl LaneParams {
    /// Check every documented range. ROI degeneracy is reported separately
    /// as a geometry error when the homography is computed.
    pub fn validate(&self) -> Result<(), PreconditionError> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(invalid_param("frame_width/frame_height", "must be positive"));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(invalid_param("canvas", "width and height must be positive"));
        }
        self.mask.validate()?;
        self.window.validate(self.canvas)?;
        self.overlay.validate()
    }

    /// Seed window for one side, resting on the bottom edge of the canvas.
    pub fn seed_window(&self, side: LaneSide) -> SlidingWindow {
        self.window.seed(side, self.canvas)
    }
}

/// Color segmentation and edge cleanup knobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskParams {
    /// HSV bounds for yellow/orange paint.
    pub orange: HsvRange,
    /// HSV bounds for white paint.
    pub white: HsvRange,
    /// Gaussian kernel size, odd in `1..=31`.
    pub blur_kernel: usize,
    /// Gaussian sigma (> 0).
    pub blur_sigma: f32,
    /// Hysteresis low threshold on the L1 gradient magnitude, `>= 0`.
    pub canny_low: f32,
    /// Hysteresis high threshold, `>= canny_low`.
    pub canny_high: f32,
    /// Side of the square morphology element, odd in `1..=63`.
    pub morph_kernel: usize,
    /// Final binarization threshold; values strictly above become 255.
    pub binarize_threshold: u8,
}

impl Default for MaskParams {
    fn default() -> Self {
        Self {
            orange: HsvRange::ORANGE,
            white: HsvRange::WHITE,
            blur_kernel: 3,
            blur_sigma: 3.0,
            canny_low: 50.0,
            canny_high: 150.0,
            morph_kernel: 15,
            binarize_threshold: 150,
        }
    }
}

impl MaskParams {
    pub fn validate(&self) -> Result<(), PreconditionError> {
        if !self.orange.is_ordered() {
            return Err(invalid_param("mask.orange", "lower bound exceeds upper bound"));
        }
        if !self.white.is_ordered() {
            return Err(invalid_param("mask.white", "lower bound exceeds upper bound"));
        }
        if self.blur_kernel % 2 == 0 || !(1..=31).contains(&self.blur_kernel) {
            return Err(invalid_param(
                "mask.blur_kernel",
                format!("must be odd in 1..=31, got {}", self.blur_kernel),
            ));
        }
        if !(self.blur_sigma.is_finite() && self.blur_sigma > 0.0) {
            return Err(invalid_param("mask.blur_sigma", "must be finite and positive"));
        }
        if !(self.canny_low.is_finite() && self.canny_low >= 0.0) {
            return Err(invalid_param("mask.canny_low", "must be finite and non-negative"));
        }
        if !(self.canny_high.is_finite() && self.canny_high >= self.canny_low) {
            return Err(invalid_param("mask.canny_high", "must be finite and >= canny_low"));
        }
        if self.morph_kernel % 2 == 0 || !(1..=63).contains(&self.morph_kernel) {
            return Err(invalid_param(
                "mask.morph_kernel",
                format!("must be odd in 1..=63, got {}", self.morph_kernel),
            ));
        }
        Ok(())
    }
}

/// Sliding-window size and seed positions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowParams {
    /// Window width, `1..=canvas.width`.
    pub width: u32,
    /// Window height, `1..=canvas.height`.
    pub height: u32,
    /// Left seed x on the canvas.
    pub left_seed_x: i64,
    /// Right seed x; `None` places the window flush with the right edge.
    pub right_seed_x: Option<i64>,
}

impl Default for WindowParams {
    fn default() -> Self {
        Self {
            width: 120,
            height: 60,
            left_seed_x: 0,
            right_seed_x: None,
        }
    }
}

impl WindowParams {
    pub fn validate(&self, canvas: Canvas) -> Result<(), PreconditionError> {
        if self.width == 0 || self.height == 0 {
            return Err(PreconditionError::EmptyWindow {
                width: self.width,
                height: self.height,
            });
        }
        if self.width > canvas.width || self.height > canvas.height {
            return Err(invalid_param(
                "window",
                format!(
                    "{}x{} window does not fit the {}x{} canvas",
                    self.width, self.height, canvas.width, canvas.height
                ),
            ));
        }
        Ok(())
    }

    pub fn seed(&self, side: LaneSide, canvas: Canvas) -> SlidingWindow {
        let x = match side {
            LaneSide::Left => self.left_seed_x,
            LaneSide::Right => self
                .right_seed_x
                .unwrap_or(canvas.width as i64 - self.width as i64),
        };
        let y = canvas.height as i64 - self.height as i64;
        SlidingWindow::new(x, y, self.width, self.height)
    }
}

/// Rendering of the lane lines and the drivable-area fill.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayParams {
    /// Blend weight of the fill color, in `[0, 1]`.
    pub alpha: f32,
    pub line_color: Rgb,
    /// Stroke width in pixels, `>= 1`.
    pub line_thickness: u32,
    pub fill_color: Rgb,
}

impl Default for OverlayParams {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            line_color: [255, 0, 0],
            line_thickness: 3,
            fill_color: [100, 255, 0],
        }
    }
}

impl OverlayParams {
    pub fn validate(&self) -> Result<(), PreconditionError> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(invalid_param("overlay.alpha", "must be within [0, 1]"));
        }
        if self.line_thickness == 0 {
            return Err(invalid_param("overlay.line_thickness", "must be >= 1"));
        }
        Ok(())
    }
}
