use crate::diagnostics::TimingBreakdown;
use crate::homography::Homography;
use crate::types::{LaneSide, Point2, SlidingWindow};
use serde::Serialize;

/// Serializable summary produced by
/// [`LaneDetector::process_with_diagnostics`](crate::LaneDetector).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneReport {
    pub input: InputDescriptor,
    pub forward: Homography,
    pub inverse: Homography,
    /// Nonzero pixels in the binary mask.
    pub mask_pixels: usize,
    pub left: TrackReport,
    pub right: TrackReport,
    pub timings: TimingBreakdown,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

/// One tracked lane in both coordinate systems.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackReport {
    pub side: LaneSide,
    pub seed: SlidingWindow,
    /// Window used for each bird's-eye point.
    pub windows: Vec<SlidingWindow>,
    /// Windows that fell back to their midpoint.
    pub empty_windows: usize,
    pub birds_eye: Vec<Point2>,
    /// `birds_eye` mapped into source-frame pixels; points at infinity are
    /// dropped.
    pub source: Vec<Point2>,
}

impl LaneReport {
    /// One-line summary for logs and demo output.
    pub fn summary(&self) -> String {
        format!(
            "{}x{} mask_px={} left={} ({} empty) right={} ({} empty) total={:.2}ms",
            self.input.width,
            self.input.height,
            self.mask_pixels,
            self.left.birds_eye.len(),
            self.left.empty_windows,
            self.right.birds_eye.len(),
            self.right.empty_windows,
            self.timings.total_ms
        )
    }
}
