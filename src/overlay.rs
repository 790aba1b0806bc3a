//! Rendering of tracked lanes back onto the source frame.
//!
//! Both polylines are mapped through the inverse homography, stroked as
//! connected segments and used to build the drivable-area polygon
//! (left bottom→top, then right top→bottom). The polygon is filled into a
//! coverage buffer and alpha-blended only where covered, so every other
//! pixel keeps its exact input value.
//!
//! Rasterization goes through `imageproc::drawing` on rounded vertices.
use crate::error::PreconditionError;
use crate::homography::Homography;
use crate::image::{ColorImage, Rgb};
use crate::params::OverlayParams;
use crate::types::{LanePolyline, Point2};
use image::{GrayImage as LumaImage, Luma, Rgb as Pixel, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;
use log::{debug, warn};

/// Map a bird's-eye polyline into source-frame coordinates.
///
/// Points sent to infinity by `inverse` are dropped with a warning; the
/// order of the remaining points is preserved.
pub fn back_project(line: &LanePolyline, inverse: &Homography) -> LanePolyline {
    let mut out = Vec::with_capacity(line.len());
    for &p in &line.points {
        match inverse.apply(p) {
            Some(q) if q.is_finite() => out.push(q),
            _ => warn!("overlay: dropping point ({}, {}) mapped to infinity", p.x, p.y),
        }
    }
    LanePolyline::from(out)
}

/// Closed drivable-area outline: `left` as given, then `right` reversed.
pub fn drivable_polygon(left: &LanePolyline, right: &LanePolyline) -> Vec<Point2> {
    left.points
        .iter()
        .copied()
        .chain(right.points.iter().rev().copied())
        .collect()
}

/// Annotated copy of `frame`; the input is left untouched.
pub fn compose(
    left: &LanePolyline,
    right: &LanePolyline,
    inverse: &Homography,
    frame: &ColorImage,
    params: &OverlayParams,
) -> Result<ColorImage, PreconditionError> {
    let mut out = frame.clone();
    compose_into(left, right, inverse, params, &mut out)?;
    Ok(out)
}

/// Annotate `dst` in place. `dst` is the output buffer and must already hold
/// the frame to draw on; nothing is retained after return.
pub fn compose_into(
    left: &LanePolyline,
    right: &LanePolyline,
    inverse: &Homography,
    params: &OverlayParams,
    dst: &mut ColorImage,
) -> Result<(), PreconditionError> {
    if !dst.is_well_formed() {
        return Err(PreconditionError::BufferLength {
            expected: dst.w * dst.h,
            got: dst.data.len(),
        });
    }
    let left = back_project(left, inverse);
    let right = back_project(right, inverse);

    let mut canvas = dst.to_rgb();
    let half = (params.line_thickness.max(1) - 1) as f32 * 0.5;
    for line in [&left, &right] {
        draw_polyline(&mut canvas, line, Pixel(params.line_color), half);
    }

    let polygon = drivable_polygon(&left, &right);
    if polygon.len() < 3 {
        debug!("overlay: polygon has {} vertices, skipping fill", polygon.len());
        *dst = ColorImage::from_rgb(&canvas);
        return Ok(());
    }
    let coverage = fill_coverage(&polygon, dst.w, dst.h);
    let covered = blend(&mut canvas, &coverage, params.fill_color, params.alpha);
    *dst = ColorImage::from_rgb(&canvas);
    debug!(
        "overlay: left={} right={} filled_px={}",
        left.len(),
        right.len(),
        covered
    );
    Ok(())
}

/// Nearest integer pixel, pulled into a band around the image so
/// rasterization stays bounded.
fn to_pixel(p: Point2, w: u32, h: u32) -> Point<i32> {
    let limit = (w.max(h) as f32 + 1.0) * 4.0;
    Point::new(
        p.x.round().clamp(-limit, limit) as i32,
        p.y.round().clamp(-limit, limit) as i32,
    )
}

fn draw_polyline(canvas: &mut RgbImage, line: &LanePolyline, color: Pixel<u8>, half: f32) {
    match line.points.as_slice() {
        [] => {}
        [p] => stamp(canvas, *p, color, half),
        _ => {
            for (a, b) in line.segments() {
                stroke_segment(canvas, a, b, color, half);
            }
        }
    }
}

/// Round brush of radius `half` at `p`.
fn stamp(canvas: &mut RgbImage, p: Point2, color: Pixel<u8>, half: f32) {
    let c = to_pixel(p, canvas.width(), canvas.height());
    draw_filled_circle_mut(canvas, (c.x, c.y), half.round() as i32, color);
}

/// Segment `a–b` as a `2 * half + 1` px wide band with round caps.
fn stroke_segment(canvas: &mut RgbImage, a: Point2, b: Point2, color: Pixel<u8>, half: f32) {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len = dx.hypot(dy);
    if half < 0.5 || len <= f32::EPSILON {
        let (w, h) = canvas.dimensions();
        let (pa, pb) = (to_pixel(a, w, h), to_pixel(b, w, h));
        draw_line_segment_mut(
            canvas,
            (pa.x as f32, pa.y as f32),
            (pb.x as f32, pb.y as f32),
            color,
        );
        if half >= 0.5 {
            stamp(canvas, a, color, half);
        }
        return;
    }

    stamp(canvas, a, color, half);
    stamp(canvas, b, color, half);
    let (nx, ny) = (-dy / len * half, dx / len * half);
    let corners = [
        Point2::new(a.x + nx, a.y + ny),
        Point2::new(b.x + nx, b.y + ny),
        Point2::new(b.x - nx, b.y - ny),
        Point2::new(a.x - nx, a.y - ny),
    ];
    let band = polygon_pixels(&corners, canvas.width(), canvas.height());
    if band.len() >= 3 {
        draw_polygon_mut(canvas, &band, color);
    }
}

/// Rounded polygon vertices without repeats, open (first != last) as
/// `draw_polygon_mut` requires.
fn polygon_pixels(polygon: &[Point2], w: u32, h: u32) -> Vec<Point<i32>> {
    let mut pts: Vec<Point<i32>> = Vec::with_capacity(polygon.len());
    for &p in polygon {
        let q = to_pixel(p, w, h);
        if pts.last() != Some(&q) {
            pts.push(q);
        }
    }
    while pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    pts
}

/// Filled polygon mask; 255 marks covered pixels, boundary included.
pub(crate) fn fill_coverage(polygon: &[Point2], w: usize, h: usize) -> LumaImage {
    let mut coverage = LumaImage::new(w as u32, h as u32);
    let pts = polygon_pixels(polygon, w as u32, h as u32);
    if pts.len() >= 3 && w > 0 && h > 0 {
        draw_polygon_mut(&mut coverage, &pts, Luma([255]));
    }
    coverage
}

/// `out = round((1 - alpha) * dst + alpha * fill)` on covered pixels.
fn blend(canvas: &mut RgbImage, coverage: &LumaImage, fill: Rgb, alpha: f32) -> usize {
    let keep = 1.0 - alpha;
    let mut covered = 0;
    for (px, _) in canvas
        .pixels_mut()
        .zip(coverage.pixels())
        .filter(|(_, c)| c.0[0] != 0)
    {
        for (ch, &f) in px.0.iter_mut().zip(fill.iter()) {
            let v = keep * *ch as f32 + alpha * f as f32;
            *ch = v.round().clamp(0.0, 255.0) as u8;
        }
        covered += 1;
    }
    covered
}
