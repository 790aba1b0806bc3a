use serde::{Deserialize, Serialize};

/// A 2D point in pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f32; 2]> for Point2 {
    fn from(p: [f32; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}

/// Trapezoidal region of the source frame presumed to contain the road.
///
/// Corners are named so call sites cannot swap their order. They map to the
/// bird's-eye canvas corners of the same name.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoiQuad {
    pub top_left: Point2,
    pub top_right: Point2,
    pub bottom_left: Point2,
    pub bottom_right: Point2,
}

impl RoiQuad {
    pub const CORNER_NAMES: [&'static str; 4] =
        ["top_left", "top_right", "bottom_left", "bottom_right"];

    /// Corners in `top_left, top_right, bottom_left, bottom_right` order.
    pub fn corners(&self) -> [Point2; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
    }
}

impl Default for RoiQuad {
    /// Road trapezoid of the 1280×720 reference dash camera.
    fn default() -> Self {
        Self {
            top_left: Point2::new(350.0, 400.0),
            top_right: Point2::new(850.0, 400.0),
            bottom_left: Point2::new(260.0, 719.0),
            bottom_right: Point2::new(1050.0, 719.0),
        }
    }
}

/// Size of the rectified bird's-eye plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// Integer search rectangle advanced band-by-band up a mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidingWindow {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl SlidingWindow {
    pub const fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Horizontal midpoint.
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x as f32 + self.width as f32 * 0.5
    }

    /// Vertical midpoint.
    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y as f32 + self.height as f32 * 0.5
    }
}

/// Which lane boundary a track belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaneSide {
    Left,
    Right,
}

/// Centroids of one lane, ordered bottom-to-top.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LanePolyline {
    pub points: Vec<Point2>,
}

impl LanePolyline {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consecutive point pairs `(p[i], p[i + 1])`.
    pub fn segments(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

impl From<Vec<Point2>> for LanePolyline {
    fn from(points: Vec<Point2>) -> Self {
        Self { points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_midpoints_are_exact_for_even_sizes() {
        let w = SlidingWindow::new(10, 420, 120, 60);
        assert_eq!(w.center_x(), 70.0);
        assert_eq!(w.center_y(), 450.0);
    }

    #[test]
    fn polyline_segments_follow_point_order() {
        let line = LanePolyline::from(vec![
            Point2::new(0.0, 3.0),
            Point2::new(1.0, 2.0),
            Point2::new(2.0, 1.0),
        ]);
        let segs: Vec<_> = line.segments().collect();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[1].0, Point2::new(1.0, 2.0));
    }
}
