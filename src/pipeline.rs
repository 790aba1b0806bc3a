//! Per-frame lane pipeline.
//!
//! `LaneDetector` owns an immutable [`LaneParams`] plus the forward and
//! inverse homographies derived from it once at construction. Processing takes
//! `&self`, keeps every intermediate buffer local to the call and therefore
//! can be shared across threads without locking.
//!
//! frame → warp → mask → track(left), track(right) → compose → annotated frame
use crate::diagnostics::{elapsed_ms, InputDescriptor, LaneReport, TimingBreakdown, TrackReport};
use crate::error::{LaneError, PreconditionError};
use crate::homography::{compute_forward, compute_inverse, warp, Homography};
use crate::image::{BinaryMask, ColorImage};
use crate::mask;
use crate::overlay::{back_project, compose};
use crate::params::LaneParams;
use crate::tracker::{track_with_trace, TrackTrace};
use crate::types::{LanePolyline, LaneSide};
use log::debug;
use std::time::Instant;

/// Result of one processed frame.
#[derive(Clone, Debug, PartialEq)]
pub struct LaneDetection {
    /// Left lane centroids on the bird's-eye canvas, bottom to top.
    pub left: LanePolyline,
    /// Right lane centroids on the bird's-eye canvas, bottom to top.
    pub right: LanePolyline,
    /// Source frame with lane lines and the drivable area drawn in.
    pub annotated: ColorImage,
}

/// Detection plus every intermediate image and a serializable report.
#[derive(Clone, Debug)]
pub struct LaneTrace {
    pub detection: LaneDetection,
    pub birds_eye: ColorImage,
    pub mask: BinaryMask,
    pub report: LaneReport,
}

/// Stateless lane detector bound to one camera configuration.
#[derive(Clone, Debug)]
pub struct LaneDetector {
    params: LaneParams,
    forward: Homography,
    inverse: Homography,
}

impl LaneDetector {
    /// Validate `params` and precompute both homographies.
    pub fn new(params: LaneParams) -> Result<Self, LaneError> {
        params.validate()?;
        let forward = compute_forward(&params.roi, params.canvas)?;
        let inverse = compute_inverse(&forward)?;
        debug!(
            "LaneDetector::new frame={}x{} canvas={}x{}",
            params.frame_width, params.frame_height, params.canvas.width, params.canvas.height
        );
        Ok(Self {
            params,
            forward,
            inverse,
        })
    }

    pub fn params(&self) -> &LaneParams {
        &self.params
    }

    /// Source frame → bird's-eye canvas.
    pub fn forward(&self) -> &Homography {
        &self.forward
    }

    /// Bird's-eye canvas → source frame.
    pub fn inverse(&self) -> &Homography {
        &self.inverse
    }

    /// Reject frames whose size or buffer disagree with the configuration.
    pub fn check_frame(&self, frame: &ColorImage) -> Result<(), PreconditionError> {
        if !frame.is_well_formed() {
            return Err(PreconditionError::BufferLength {
                expected: frame.w * frame.h,
                got: frame.data.len(),
            });
        }
        let expected = (
            self.params.frame_width as usize,
            self.params.frame_height as usize,
        );
        if (frame.w, frame.h) != expected {
            return Err(PreconditionError::FrameSize {
                expected,
                got: (frame.w, frame.h),
            });
        }
        Ok(())
    }

    /// Run the full pipeline on one frame.
    pub fn process(&self, frame: &ColorImage) -> Result<LaneDetection, LaneError> {
        self.process_with_diagnostics(frame).map(|t| t.detection)
    }

    /// Run the pipeline and keep the intermediate images and timings.
    pub fn process_with_diagnostics(&self, frame: &ColorImage) -> Result<LaneTrace, LaneError> {
        self.check_frame(frame)?;
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();

        let start = Instant::now();
        let birds_eye = warp(frame, &self.forward, self.params.canvas, self.params.warp_border)?;
        timings.record_since("warp", start);

        let start = Instant::now();
        let mask = mask::extract(&birds_eye, &self.params.mask);
        timings.record_since("mask", start);

        let start = Instant::now();
        let left = self.track_side(&mask, LaneSide::Left)?;
        let right = self.track_side(&mask, LaneSide::Right)?;
        timings.record_since("track", start);

        let start = Instant::now();
        let annotated = compose(
            &left.polyline,
            &right.polyline,
            &self.inverse,
            frame,
            &self.params.overlay,
        )?;
        timings.record_since("compose", start);
        timings.total_ms = elapsed_ms(total_start);

        debug!(
            "LaneDetector::process left={} right={} total_ms={:.3}",
            left.polyline.len(),
            right.polyline.len(),
            timings.total_ms
        );

        let report = LaneReport {
            input: InputDescriptor {
                width: frame.w,
                height: frame.h,
                canvas_width: self.params.canvas.width,
                canvas_height: self.params.canvas.height,
            },
            forward: self.forward,
            inverse: self.inverse,
            mask_pixels: mask.count_nonzero(),
            left: self.track_report(LaneSide::Left, &left),
            right: self.track_report(LaneSide::Right, &right),
            timings,
        };

        Ok(LaneTrace {
            detection: LaneDetection {
                left: left.polyline,
                right: right.polyline,
                annotated,
            },
            birds_eye,
            mask,
            report,
        })
    }

    /// Process independent frames, in parallel with the `parallel` feature.
    pub fn process_batch(&self, frames: &[ColorImage]) -> Vec<Result<LaneDetection, LaneError>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            frames.par_iter().map(|f| self.process(f)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            frames.iter().map(|f| self.process(f)).collect()
        }
    }

    fn track_side(&self, mask: &BinaryMask, side: LaneSide) -> Result<TrackTrace, PreconditionError> {
        track_with_trace(mask, self.params.seed_window(side))
    }

    fn track_report(&self, side: LaneSide, trace: &TrackTrace) -> TrackReport {
        TrackReport {
            side,
            seed: self.params.seed_window(side),
            windows: trace.windows.clone(),
            empty_windows: trace.empty_windows,
            birds_eye: trace.polyline.points.clone(),
            source: back_project(&trace.polyline, &self.inverse).points,
        }
    }
}
