#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod diagnostics;
pub mod error;
pub mod homography;
pub mod image;
pub mod params;
pub mod pipeline;
pub mod types;

// Stage modules, usable on their own with synthetic inputs.
pub mod color;
pub mod edges;
pub mod filters;
pub mod mask;
pub mod morphology;
pub mod overlay;
pub mod tracker;

// Demo tooling.
pub mod config;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{GeometryError, LaneError, PreconditionError};
pub use crate::params::{LaneParams, MaskParams, OverlayParams, WindowParams};
pub use crate::pipeline::{LaneDetection, LaneDetector, LaneTrace};
pub use crate::types::{Canvas, LanePolyline, LaneSide, Point2, RoiQuad, SlidingWindow};

pub use crate::diagnostics::{LaneReport, TimingBreakdown};
pub use crate::homography::{compute_forward, compute_inverse, warp, BorderMode, Homography};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use lane_detector::prelude::*;
///
/// # fn main() -> Result<(), LaneError> {
/// let frame = ColorImage::filled(1280, 720, [60, 60, 60]);
/// let detector = LaneDetector::new(LaneParams::default())?;
/// let lanes = detector.process(&frame)?;
/// println!("left={} right={}", lanes.left.len(), lanes.right.len());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ColorImage, GrayImage};
    pub use crate::{LaneDetection, LaneDetector, LaneError, LaneParams, LanePolyline};
}
