//! Projective mapping between the source-frame ROI and the bird's-eye canvas.
//!
//! - `compute_forward` solves the exact 4-point correspondence (8×8 linear
//!   system with `h33 = 1`); no least squares is involved.
//! - `compute_inverse` inverts a homography.
//! - `warp` resamples a color frame onto the canvas with imageproc's bilinear
//!   projective warp and a configurable border policy.
//!
//! Homographies are stored in f64 so a forward/inverse round trip stays well
//! below a thousandth of a pixel at HD resolutions.
use crate::error::GeometryError;
use crate::image::{ColorImage, Rgb};
use crate::types::{Canvas, Point2, RoiQuad};
use image::Rgb as Pixel;
use imageproc::geometric_transformations::{warp_into, warp_into_with, Interpolation, Projection};
use nalgebra::{Matrix3, SMatrix, SVector, Vector3};
use serde::{Deserialize, Serialize};

const EPS: f64 = 1e-12;
/// Relative area below which three corners count as collinear.
const COLLINEAR_TOL: f64 = 1e-9;

/// A 3×3 projective transform acting on homogeneous pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Homography(pub Matrix3<f64>);

impl Homography {
    pub fn identity() -> Self {
        Homography(Matrix3::identity())
    }

    #[inline]
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.0
    }

    /// Map a point with the full projective divide.
    ///
    /// Returns `None` for points sent to (or near) infinity.
    #[inline]
    pub fn apply(&self, p: Point2) -> Option<Point2> {
        let [x, y] = self.apply_f64(p.x as f64, p.y as f64)?;
        Some(Point2::new(x as f32, y as f32))
    }

    #[inline]
    pub(crate) fn apply_f64(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        let v = self.0 * Vector3::new(x, y, 1.0);
        let w = v[2];
        if !w.is_finite() || w.abs() <= EPS || !v[0].is_finite() || !v[1].is_finite() {
            return None;
        }
        Some([v[0] / w, v[1] / w])
    }

    /// Like `apply_f64`, but a point sent to infinity comes back as a far
    /// point along its homogeneous direction instead of `None`.
    pub(crate) fn apply_or_far(&self, x: f64, y: f64) -> [f64; 2] {
        if let Some(p) = self.apply_f64(x, y) {
            return p;
        }
        let v = self.0 * Vector3::new(x, y, 1.0);
        let far = |c: f64| if c.is_finite() { c * 1e12 } else { 0.0 };
        [far(v[0]), far(v[1])]
    }

    /// Map every point; `None` if any of them lands at infinity.
    pub fn apply_points(&self, pts: &[Point2]) -> Option<Vec<Point2>> {
        pts.iter().map(|&p| self.apply(p)).collect()
    }
}

/// How `warp` samples source coordinates outside the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderMode {
    /// Substitute a fixed color.
    Constant(Rgb),
    /// Repeat the nearest edge pixel.
    Replicate,
}

impl Default for BorderMode {
    fn default() -> Self {
        BorderMode::Constant([0, 0, 0])
    }
}

/// Homography sending the ROI corners to the canvas corners
/// (`top_left → (0,0)`, `top_right → (W,0)`, `bottom_left → (0,H)`,
/// `bottom_right → (W,H)`).
pub fn compute_forward(roi: &RoiQuad, canvas: Canvas) -> Result<Homography, GeometryError> {
    if canvas.width == 0 || canvas.height == 0 {
        return Err(GeometryError::Singular {
            what: "canvas (zero extent)",
        });
    }
    check_quad(roi)?;
    let (w, h) = (canvas.width as f64, canvas.height as f64);
    let dst = [[0.0, 0.0], [w, 0.0], [0.0, h], [w, h]];
    let src = roi.corners().map(|p| [p.x as f64, p.y as f64]);
    solve_four_point(&src, &dst)
}

/// Matrix inverse of `forward`.
pub fn compute_inverse(forward: &Homography) -> Result<Homography, GeometryError> {
    let inv = forward
        .0
        .try_inverse()
        .ok_or(GeometryError::Singular { what: "homography" })?;
    if inv.iter().any(|v| !v.is_finite()) {
        return Err(GeometryError::Singular { what: "homography" });
    }
    Ok(Homography(inv))
}

/// Resample `frame` onto a `canvas`-sized image.
///
/// Each destination pixel `(x, y)` is pulled from `forward⁻¹ · (x, y, 1)` in
/// the source frame with bilinear interpolation
/// (`imageproc::geometric_transformations`). The frame is padded by one pixel
/// according to `border` so samples on the last row and column still blend
/// with a neighbour. `Replicate` clamps every source coordinate to the frame,
/// including those sent to infinity.
pub fn warp(
    frame: &ColorImage,
    forward: &Homography,
    canvas: Canvas,
    border: BorderMode,
) -> Result<ColorImage, GeometryError> {
    let back = compute_inverse(forward)?;
    let (dw, dh) = (canvas.width, canvas.height);
    if frame.w == 0 || frame.h == 0 {
        let fill = match border {
            BorderMode::Constant(c) => c,
            BorderMode::Replicate => [0, 0, 0],
        };
        return Ok(ColorImage::filled(dw as usize, dh as usize, fill));
    }

    let padded = pad_frame(frame, border);
    let mut out = image::RgbImage::new(dw, dh);
    match border {
        BorderMode::Constant(c) => {
            let projection = to_projection(forward)? * Projection::translate(-1.0, -1.0);
            warp_into(&padded, &projection, Interpolation::Bilinear, Pixel(c), &mut out);
        }
        BorderMode::Replicate => {
            let (max_x, max_y) = ((frame.w - 1) as f64, (frame.h - 1) as f64);
            let mapping = move |x: f32, y: f32| {
                let [sx, sy] = back.apply_or_far(x as f64, y as f64);
                (
                    (sx.clamp(0.0, max_x) + 1.0) as f32,
                    (sy.clamp(0.0, max_y) + 1.0) as f32,
                )
            };
            let default = Pixel([0, 0, 0]);
            warp_into_with(&padded, mapping, Interpolation::Bilinear, default, &mut out);
        }
    }
    Ok(ColorImage::from_rgb(&out))
}

/// Row-major f32 projection of `h`; `None` from imageproc means singular.
fn to_projection(h: &Homography) -> Result<Projection, GeometryError> {
    let m = h.matrix();
    let mut flat = [0f32; 9];
    for (i, v) in flat.iter_mut().enumerate() {
        *v = m[(i / 3, i % 3)] as f32;
    }
    Projection::from_matrix(flat).ok_or(GeometryError::Singular { what: "homography" })
}

/// Copy of `frame` with a one-pixel border filled per `border`.
fn pad_frame(frame: &ColorImage, border: BorderMode) -> image::RgbImage {
    let (w, h) = (frame.w as i64, frame.h as i64);
    image::RgbImage::from_fn(frame.w as u32 + 2, frame.h as u32 + 2, |px, py| {
        let (x, y) = (px as i64 - 1, py as i64 - 1);
        let inside = x >= 0 && y >= 0 && x < w && y < h;
        Pixel(match border {
            _ if inside => frame.get(x as usize, y as usize),
            BorderMode::Constant(c) => c,
            BorderMode::Replicate => {
                frame.get(x.clamp(0, w - 1) as usize, y.clamp(0, h - 1) as usize)
            }
        })
    })
}

fn check_quad(roi: &RoiQuad) -> Result<(), GeometryError> {
    let pts = roi.corners().map(|p| [p.x as f64, p.y as f64]);
    if pts.iter().flatten().any(|v| !v.is_finite()) {
        return Err(GeometryError::NonFinite { what: "ROI corner" });
    }
    let names = RoiQuad::CORNER_NAMES;

    let span = pts
        .iter()
        .flat_map(|a| pts.iter().map(move |b| (a[0] - b[0]).abs().max((a[1] - b[1]).abs())))
        .fold(0.0f64, f64::max);
    for i in 0..4 {
        for j in i + 1..4 {
            let d = (pts[i][0] - pts[j][0]).abs().max((pts[i][1] - pts[j][1]).abs());
            if d <= span * COLLINEAR_TOL || d == 0.0 {
                return Err(GeometryError::DuplicateCorners {
                    first: names[i],
                    second: names[j],
                });
            }
        }
    }

    let area_tol = span * span * COLLINEAR_TOL;
    for (i, j, k) in [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)] {
        let (a, b, c) = (pts[i], pts[j], pts[k]);
        let cross = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
        if cross.abs() <= area_tol {
            return Err(GeometryError::CollinearCorners {
                corners: [names[i], names[j], names[k]],
            });
        }
    }
    Ok(())
}

/// Exact homography from four correspondences with `h33` fixed to 1.
fn solve_four_point(src: &[[f64; 2]; 4], dst: &[[f64; 2]; 4]) -> Result<Homography, GeometryError> {
    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();
    for i in 0..4 {
        let [x, y] = src[i];
        let [u, v] = dst[i];
        let r = 2 * i;
        // u = (h0 x + h1 y + h2) / (h6 x + h7 y + 1)
        a[(r, 0)] = x;
        a[(r, 1)] = y;
        a[(r, 2)] = 1.0;
        a[(r, 6)] = -u * x;
        a[(r, 7)] = -u * y;
        b[r] = u;
        // v = (h3 x + h4 y + h5) / (h6 x + h7 y + 1)
        a[(r + 1, 3)] = x;
        a[(r + 1, 4)] = y;
        a[(r + 1, 5)] = 1.0;
        a[(r + 1, 6)] = -v * x;
        a[(r + 1, 7)] = -v * y;
        b[r + 1] = v;
    }
    let h = a.lu().solve(&b).ok_or(GeometryError::Singular {
        what: "correspondence system",
    })?;
    if h.iter().any(|v| !v.is_finite()) {
        return Err(GeometryError::Singular {
            what: "correspondence system",
        });
    }
    Ok(Homography(Matrix3::new(
        h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point2, b: Point2, tol: f32) {
        assert!(
            (a.x - b.x).abs() <= tol && (a.y - b.y).abs() <= tol,
            "expected {b:?}, got {a:?}"
        );
    }

    #[test]
    fn forward_maps_roi_corners_to_canvas_corners() {
        let roi = RoiQuad::default();
        let canvas = Canvas::default();
        let fwd = compute_forward(&roi, canvas).expect("valid roi");
        let expected = [
            Point2::new(0.0, 0.0),
            Point2::new(640.0, 0.0),
            Point2::new(0.0, 480.0),
            Point2::new(640.0, 480.0),
        ];
        for (corner, want) in roi.corners().into_iter().zip(expected) {
            assert_close(fwd.apply(corner).expect("finite"), want, 1e-3);
        }
    }

    #[test]
    fn inverse_round_trips_corners() {
        let roi = RoiQuad::default();
        let fwd = compute_forward(&roi, Canvas::default()).expect("valid roi");
        let inv = compute_inverse(&fwd).expect("invertible");
        for corner in roi.corners() {
            let back = inv.apply(fwd.apply(corner).expect("finite")).expect("finite");
            assert_close(back, corner, 1e-3);
        }
    }

    #[test]
    fn collinear_corners_are_rejected() {
        let roi = RoiQuad {
            top_left: Point2::new(0.0, 0.0),
            top_right: Point2::new(10.0, 10.0),
            bottom_left: Point2::new(20.0, 20.0),
            bottom_right: Point2::new(30.0, 0.0),
        };
        let err = compute_forward(&roi, Canvas::default()).unwrap_err();
        assert!(matches!(err, GeometryError::CollinearCorners { .. }), "{err}");
    }

    #[test]
    fn duplicate_corners_are_rejected() {
        let mut roi = RoiQuad::default();
        roi.top_right = roi.top_left;
        let err = compute_forward(&roi, Canvas::default()).unwrap_err();
        assert!(matches!(err, GeometryError::DuplicateCorners { .. }), "{err}");
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let singular = Homography(Matrix3::new(1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 0.0, 1.0));
        assert!(compute_inverse(&singular).is_err());
    }

    #[test]
    fn apply_points_reports_points_at_infinity() {
        let h = Homography(Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0));
        assert!(h.apply_points(&[Point2::new(0.0, 5.0)]).is_none());
        let ok = h.apply_points(&[Point2::new(2.0, 4.0)]).expect("finite");
        assert_close(ok[0], Point2::new(1.0, 2.0), 1e-6);
    }

    #[test]
    fn identity_warp_copies_frame() {
        let mut frame = ColorImage::new(4, 3);
        frame.set(2, 1, [10, 20, 30]);
        frame.set(3, 2, [40, 50, 60]);
        let out = warp(
            &frame,
            &Homography::identity(),
            Canvas { width: 4, height: 3 },
            BorderMode::default(),
        )
        .expect("identity is invertible");
        assert_eq!(out, frame);
    }

    #[test]
    fn warp_fills_outside_with_border_color() {
        let frame = ColorImage::filled(4, 4, [200, 200, 200]);
        // Shift by +10 px: destination (x, y) samples source (x - 10, y).
        let shift = Homography(Matrix3::new(1.0, 0.0, 10.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0));
        let canvas = Canvas { width: 4, height: 4 };
        let constant = warp(&frame, &shift, canvas, BorderMode::Constant([1, 2, 3])).unwrap();
        assert_eq!(constant.get(0, 0), [1, 2, 3]);
        let replicate = warp(&frame, &shift, canvas, BorderMode::Replicate).unwrap();
        assert_eq!(replicate.get(0, 0), [200, 200, 200]);
    }

    #[test]
    fn replicate_uses_nearest_edge_pixel_far_outside() {
        let mut frame = ColorImage::new(4, 4);
        frame.set(3, 3, [255, 255, 255]);
        // Shift by -100 px: destination (x, y) samples source (x + 100, y + 100).
        let shift = Homography(Matrix3::new(1.0, 0.0, -100.0, 0.0, 1.0, -100.0, 0.0, 0.0, 1.0));
        let canvas = Canvas { width: 4, height: 4 };
        let out = warp(&frame, &shift, canvas, BorderMode::Replicate).unwrap();
        assert!(out.data.iter().all(|&p| p == [255, 255, 255]), "{:?}", out.data);

        // Rightwards only: rows keep their own edge pixel.
        let right = Homography(Matrix3::new(1.0, 0.0, -100.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0));
        let out = warp(&frame, &right, canvas, BorderMode::Replicate).unwrap();
        assert_eq!(out.get(0, 3), [255, 255, 255]);
        assert_eq!(out.get(0, 0), [0, 0, 0]);
    }

    #[test]
    fn far_point_keeps_homogeneous_direction() {
        // w = x - 2 vanishes on the column x = 2.
        let h = Homography(Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, -2.0));
        let [fx, fy] = h.apply_or_far(2.0, -3.0);
        assert!(fx > 1e9 && fy < -1e9);
        assert_eq!(h.apply_or_far(4.0, 2.0), [2.0, 1.0]);
    }

    #[test]
    fn bilinear_sampling_interpolates_half_pixel() {
        let mut frame = ColorImage::new(2, 1);
        frame.set(0, 0, [0, 0, 0]);
        frame.set(1, 0, [100, 200, 50]);
        // Destination (0, 0) samples source (0.5, 0).
        let half = Homography(Matrix3::new(1.0, 0.0, -0.5, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0));
        let canvas = Canvas { width: 1, height: 1 };
        for border in [BorderMode::Replicate, BorderMode::default()] {
            let out = warp(&frame, &half, canvas, border).unwrap();
            assert_eq!(out.get(0, 0), [50, 100, 25]);
        }
    }

    #[test]
    fn round_trip_holds_for_varied_rois() {
        let canvases = [
            Canvas::default(),
            Canvas { width: 300, height: 900 },
            Canvas { width: 1024, height: 256 },
        ];
        let rois = [
            // Skewed trapezoid leaning right.
            RoiQuad {
                top_left: Point2::new(700.0, 420.0),
                top_right: Point2::new(860.0, 430.0),
                bottom_left: Point2::new(300.0, 700.0),
                bottom_right: Point2::new(1200.0, 690.0),
            },
            // General convex quad, no parallel sides.
            RoiQuad {
                top_left: Point2::new(120.0, 80.0),
                top_right: Point2::new(610.0, 140.0),
                bottom_left: Point2::new(60.0, 530.0),
                bottom_right: Point2::new(720.0, 410.0),
            },
            // Rotated rectangle.
            RoiQuad {
                top_left: Point2::new(400.0, 100.0),
                top_right: Point2::new(700.0, 400.0),
                bottom_left: Point2::new(100.0, 400.0),
                bottom_right: Point2::new(400.0, 700.0),
            },
            // Wider at the top than the bottom.
            RoiQuad {
                top_left: Point2::new(50.0, 300.0),
                top_right: Point2::new(1230.0, 310.0),
                bottom_left: Point2::new(560.0, 710.0),
                bottom_right: Point2::new(720.0, 705.0),
            },
        ];

        let mut state = 0x2545_f491_4f6c_dd1du64;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 11) as f64 / (1u64 << 53) as f64
        };

        for roi in &rois {
            for &canvas in &canvases {
                let fwd = compute_forward(roi, canvas).expect("valid roi");
                let inv = compute_inverse(&fwd).expect("invertible");
                let c = roi.corners().map(|p| [p.x as f64, p.y as f64]);
                for _ in 0..200 {
                    // Bilinear blend of the corners stays inside a convex quad.
                    let (u, v) = (next(), next());
                    let top = [c[0][0] + u * (c[1][0] - c[0][0]), c[0][1] + u * (c[1][1] - c[0][1])];
                    let bot = [c[2][0] + u * (c[3][0] - c[2][0]), c[2][1] + u * (c[3][1] - c[2][1])];
                    let p = [top[0] + v * (bot[0] - top[0]), top[1] + v * (bot[1] - top[1])];

                    let [bx, by] = fwd.apply_f64(p[0], p[1]).expect("finite");
                    assert!(
                        (-1e-6..=canvas.width as f64 + 1e-6).contains(&bx)
                            && (-1e-6..=canvas.height as f64 + 1e-6).contains(&by),
                        "{p:?} left the canvas as ({bx}, {by})"
                    );
                    let [sx, sy] = inv.apply_f64(bx, by).expect("finite");
                    assert!(
                        (sx - p[0]).abs() < 1e-3 && (sy - p[1]).abs() < 1e-3,
                        "{p:?} came back as ({sx}, {sy})"
                    );
                }
            }
        }
    }
}
