//! Diagnostics returned alongside lane detections.
//!
//! `LaneReport` is the serializable part (geometry, per-track windows and
//! stage timings) written by the demo as JSON. Images produced by the
//! intermediate stages travel separately in
//! [`LaneTrace`](crate::pipeline::LaneTrace).

pub mod report;
pub mod timing;

pub use report::{InputDescriptor, LaneReport, TrackReport};
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
