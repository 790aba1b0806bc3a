//! Sliding-window lane tracking on a binary mask.
//!
//! A fixed-size window starts at a seed position near the bottom of the mask
//! and climbs one window-height per iteration. At each band the window emits
//! the mean x of the mask pixels it covers (or its own midpoint when the band
//! is empty) and then slides sideways by the same amount the centroid moved,
//! so it follows curved lanes and coasts straight through dashed gaps.
//!
//! Invariants after every iteration:
//! - `0 <= x` and `x + width <= mask_width`;
//! - `y` only decreases and is clamped at 0, which ends the walk;
//! - at most `ceil(mask_height / height) + 1` iterations, at least one point.
use crate::error::{invalid_param, PreconditionError};
use crate::image::ImageView;
use crate::types::{LanePolyline, Point2, SlidingWindow};
use log::debug;

/// Polyline plus the window used for every emitted point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackTrace {
    pub polyline: LanePolyline,
    /// `windows[i]` produced `polyline.points[i]`.
    pub windows: Vec<SlidingWindow>,
    /// Iterations whose window held no mask pixels.
    pub empty_windows: usize,
}

/// Track one lane from `initial` upwards; see [`track_with_trace`].
pub fn track<I>(mask: &I, initial: SlidingWindow) -> Result<LanePolyline, PreconditionError>
where
    I: ImageView<Pixel = u8>,
{
    track_with_trace(mask, initial).map(|t| t.polyline)
}

/// Track one lane and keep the per-iteration windows.
///
/// An initial window that pokes out of the mask is pulled back inside:
/// horizontally to `[0, mask_width - width]` and vertically to
/// `[0, mask_height - height]`. A seed already inside is used as given. After
/// each slide the window x is kept in `[0, mask_width - width)`. Windows wider
/// than the mask cannot satisfy the horizontal invariant and are rejected.
pub fn track_with_trace<I>(mask: &I, initial: SlidingWindow) -> Result<TrackTrace, PreconditionError>
where
    I: ImageView<Pixel = u8>,
{
    let (mw, mh) = (mask.width() as i64, mask.height() as i64);
    if mw == 0 || mh == 0 {
        return Err(PreconditionError::EmptyMask);
    }
    if initial.width == 0 || initial.height == 0 {
        return Err(PreconditionError::EmptyWindow {
            width: initial.width,
            height: initial.height,
        });
    }
    let (ww, wh) = (initial.width as i64, initial.height as i64);
    if ww > mw {
        return Err(invalid_param(
            "window.width",
            format!("{ww} px window is wider than the {mw} px mask"),
        ));
    }

    let max_x = (mw - ww - 1).max(0);
    let mut window = SlidingWindow {
        x: initial.x.clamp(0, mw - ww),
        y: initial.y.clamp(0, (mh - wh).max(0)),
        ..initial
    };

    let mut trace = TrackTrace::default();
    loop {
        let reference_x = window.center_x();
        let centroid_x = match window_centroid_x(mask, &window) {
            Some(cx) => cx,
            None => {
                trace.empty_windows += 1;
                reference_x
            }
        };
        trace
            .polyline
            .points
            .push(Point2::new(centroid_x, window.center_y()));
        trace.windows.push(window);

        window.y -= wh;
        let last = window.y < 0;
        if last {
            window.y = 0;
        }

        let shift = (centroid_x - reference_x).round() as i64;
        window.x = (window.x + shift).clamp(0, max_x);

        if last {
            break;
        }
    }

    debug!(
        "track: seed=({}, {}) points={} empty_windows={}",
        initial.x,
        initial.y,
        trace.polyline.len(),
        trace.empty_windows
    );
    Ok(trace)
}

/// Mean absolute x of the nonzero pixels covered by `window`, if any.
fn window_centroid_x<I>(mask: &I, window: &SlidingWindow) -> Option<f32>
where
    I: ImageView<Pixel = u8>,
{
    let (mw, mh) = (mask.width() as i64, mask.height() as i64);
    let x0 = window.x.clamp(0, mw);
    let x1 = (window.x + window.width as i64).clamp(0, mw);
    let y0 = window.y.clamp(0, mh);
    let y1 = (window.y + window.height as i64).clamp(0, mh);

    let mut sum = 0u64;
    let mut count = 0u64;
    for y in y0..y1 {
        let row = &mask.row(y as usize)[x0 as usize..x1 as usize];
        for (dx, _) in row.iter().enumerate().filter(|(_, v)| **v != 0) {
            sum += x0 as u64 + dx as u64;
            count += 1;
        }
    }
    (count > 0).then(|| (sum as f64 / count as f64) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::GrayImage;

    fn vertical_stripe(w: usize, h: usize, x0: usize, x1: usize) -> GrayImage {
        let mut mask = GrayImage::new(w, h);
        for y in 0..h {
            for x in x0..x1 {
                mask.set(x, y, 255);
            }
        }
        mask
    }

    #[test]
    fn empty_mask_falls_back_to_window_midpoint() {
        let mask = GrayImage::new(640, 480);
        let line = track(&mask, SlidingWindow::new(100, 420, 120, 60)).unwrap();
        assert_eq!(line.len(), 8);
        for (i, p) in line.points.iter().enumerate() {
            assert_eq!(p.x, 160.0);
            assert_eq!(p.y, 450.0 - 60.0 * i as f32);
        }
    }

    #[test]
    fn centroid_is_mean_of_covered_pixels() {
        let mask = vertical_stripe(200, 60, 50, 55);
        let line = track(&mask, SlidingWindow::new(0, 0, 120, 60)).unwrap();
        assert_eq!(line.len(), 1);
        assert_eq!(line.points[0], Point2::new(52.0, 30.0));
    }

    #[test]
    fn window_follows_diagonal_lane() {
        let (w, h) = (320usize, 200usize);
        let mut mask = GrayImage::new(w, h);
        // Lane drifts right by 1 px per row going up.
        for y in 0..h {
            let cx = 100 + (h - 1 - y);
            for x in cx - 2..=cx + 2 {
                mask.set(x, y, 255);
            }
        }
        let trace = track_with_trace(&mask, SlidingWindow::new(50, 180, 100, 20)).unwrap();
        assert_eq!(trace.empty_windows, 0);
        for p in &trace.polyline.points {
            let expected = 100.0 + (h as f32 - 1.0 - p.y);
            assert!((p.x - expected).abs() <= 1.0, "{p:?} vs {expected}");
        }
    }

    #[test]
    fn tall_window_runs_single_iteration() {
        let mask = GrayImage::new(100, 50);
        let line = track(&mask, SlidingWindow::new(10, 30, 20, 80)).unwrap();
        assert_eq!(line.len(), 1);
        assert_eq!(line.points[0], Point2::new(20.0, 40.0));
    }

    #[test]
    fn window_is_clamped_inside_mask_each_iteration() {
        // Stripe hugging the right edge pulls the window outwards.
        let mask = vertical_stripe(200, 120, 195, 200);
        let trace = track_with_trace(&mask, SlidingWindow::new(500, 1000, 40, 30)).unwrap();
        assert!(trace.windows.len() <= 120 / 30 + 1);
        for win in &trace.windows {
            assert!(win.x >= 0 && win.x + win.width as i64 <= 200, "{win:?}");
        }
        assert_eq!(trace.windows[0].x, 200 - 40);
        assert_eq!(trace.windows[0].y, 90);
        assert!(trace.windows[1..].iter().all(|win| win.x <= 200 - 40 - 1));
    }

    #[test]
    fn seed_flush_with_right_edge_keeps_its_midpoint() {
        let mask = GrayImage::new(640, 480);
        let trace = track_with_trace(&mask, SlidingWindow::new(520, 420, 120, 60)).unwrap();
        assert_eq!(trace.windows[0].x, 520);
        assert_eq!(trace.polyline.points[0], Point2::new(580.0, 450.0));
        for (p, win) in trace.polyline.points.iter().zip(&trace.windows) {
            assert_eq!(p.x, win.center_x());
        }
    }

    #[test]
    fn zero_sized_window_is_rejected() {
        let mask = GrayImage::new(10, 10);
        assert!(matches!(
            track(&mask, SlidingWindow::new(0, 0, 5, 0)),
            Err(PreconditionError::EmptyWindow { .. })
        ));
        assert!(track(&mask, SlidingWindow::new(0, 0, 11, 2)).is_err());
    }
}
