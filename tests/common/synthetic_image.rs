use lane_detector::image::{ColorImage, GrayImage, Rgb};
use lane_detector::{Homography, Point2};

pub const ASPHALT: Rgb = [70, 70, 75];
pub const WHITE_PAINT: Rgb = [240, 240, 240];
pub const ORANGE_PAINT: Rgb = [235, 150, 40];

/// Binary mask with full-height vertical stripes of `stripe_width` pixels
/// centred on each entry of `centers`.
pub fn stripe_mask(width: usize, height: usize, centers: &[usize], stripe_width: usize) -> GrayImage {
    assert!(width > 0 && height > 0, "mask dimensions must be positive");
    let half = stripe_width / 2;
    let mut mask = GrayImage::new(width, height);
    for &c in centers {
        let x0 = c.saturating_sub(half);
        let x1 = (x0 + stripe_width).min(width);
        for y in 0..height {
            for x in x0..x1 {
                mask.set(x, y, 255);
            }
        }
    }
    mask
}

/// Same as [`stripe_mask`] but each stripe only covers the rows for which
/// `visible(y)` holds, e.g. to model dashed markings.
pub fn dashed_stripe_mask(
    width: usize,
    height: usize,
    center: usize,
    stripe_width: usize,
    visible: impl Fn(usize) -> bool,
) -> GrayImage {
    let mut mask = stripe_mask(width, height, &[center], stripe_width);
    for y in (0..height).filter(|&y| !visible(y)) {
        for x in 0..width {
            mask.set(x, y, 0);
        }
    }
    mask
}

/// Binary mask with one lane whose centre follows `center_x(y)`.
pub fn curved_lane_mask(
    width: usize,
    height: usize,
    stripe_width: usize,
    center_x: impl Fn(f32) -> f32,
) -> GrayImage {
    let half = (stripe_width / 2) as i64;
    let mut mask = GrayImage::new(width, height);
    for y in 0..height {
        let c = center_x(y as f32).round() as i64;
        for x in (c - half)..=(c + half) {
            if x >= 0 && (x as usize) < width {
                mask.set(x as usize, y, 255);
            }
        }
    }
    mask
}

/// Source frame whose bird's-eye view shows straight lanes.
///
/// Every source pixel is mapped through `forward`; it is painted when it
/// lands inside the canvas within `half_width` of a lane centre.
pub fn road_frame(
    width: usize,
    height: usize,
    forward: &Homography,
    canvas: (f32, f32),
    lanes: &[(f32, Rgb)],
    half_width: f32,
) -> ColorImage {
    let mut frame = ColorImage::filled(width, height, ASPHALT);
    for y in 0..height {
        for x in 0..width {
            let Some(q) = forward.apply(Point2::new(x as f32, y as f32)) else {
                continue;
            };
            if q.y < 0.0 || q.y >= canvas.1 || q.x < 0.0 || q.x >= canvas.0 {
                continue;
            }
            if let Some((_, paint)) = lanes.iter().find(|(c, _)| (q.x - c).abs() <= half_width) {
                frame.set(x, y, *paint);
            }
        }
    }
    frame
}
