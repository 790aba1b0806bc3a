//! Dual-threshold (hysteresis) edge detection.
//!
//! 1. Sobel gradients with an L1 magnitude.
//! 2. Non-maximum suppression along the gradient direction quantized to
//!    0°, 45°, 90° and 135°. A pixel survives when its magnitude exceeds the
//!    low threshold, is strictly greater than the "backward" neighbour and at
//!    least the "forward" one, which keeps exactly one pixel on plateaus.
//! 3. Hysteresis: surviving pixels above the high threshold seed edges that
//!    grow through 8-connected survivors above the low threshold.
//!
//! The outermost 1-pixel frame never produces edges.
use super::grad::{sobel_gradients, GradientNorm};
use crate::image::{GrayImage, ImageF32, ImageView};

const TAN_22_5_DEG: f32 = 0.414_213_56;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Cell {
    Suppressed,
    Weak,
    Strong,
}

/// Binary edge map (0 / 255) of an 8-bit image.
pub fn canny(src: &GrayImage, low: f32, high: f32) -> GrayImage {
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    let w = src.w;
    let h = src.h;
    let mut out = GrayImage::new(w, h);
    if w < 3 || h < 3 {
        return out;
    }

    let grad = sobel_gradients(&ImageF32::from_gray(src), GradientNorm::L1);
    let mut cells = vec![Cell::Suppressed; w * h];
    let mut stack = Vec::new();

    for y in 1..h - 1 {
        let mag_prev = grad.mag.row(y - 1);
        let mag_row = grad.mag.row(y);
        let mag_next = grad.mag.row(y + 1);
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);

        for x in 1..w - 1 {
            let mag = mag_row[x];
            if mag <= low {
                continue;
            }

            let gx = gx_row[x];
            let gy = gy_row[x];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();
            let same_sign = (gx >= 0.0) == (gy >= 0.0);

            // (backward, forward) neighbours along the gradient.
            let (back, fwd) = if abs_gy <= abs_gx * TAN_22_5_DEG {
                (mag_row[x - 1], mag_row[x + 1])
            } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                (mag_prev[x], mag_next[x])
            } else if same_sign {
                (mag_prev[x - 1], mag_next[x + 1])
            } else {
                (mag_prev[x + 1], mag_next[x - 1])
            };

            if mag <= back || mag < fwd {
                continue;
            }

            let idx = y * w + x;
            if mag > high {
                cells[idx] = Cell::Strong;
                stack.push(idx);
            } else {
                cells[idx] = Cell::Weak;
            }
        }
    }

    while let Some(idx) = stack.pop() {
        out.data[idx] = 255;
        let (x, y) = (idx % w, idx / w);
        for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                let n = ny * w + nx;
                if cells[n] == Cell::Weak {
                    cells[n] = Cell::Strong;
                    stack.push(n);
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar_image(w: usize, h: usize, x0: usize, x1: usize, value: u8) -> GrayImage {
        let mut img = GrayImage::new(w, h);
        for y in 0..h {
            for x in x0..x1 {
                img.set(x, y, value);
            }
        }
        img
    }

    #[test]
    fn flat_image_has_no_edges() {
        let img = GrayImage::from_raw(16, 16, vec![90; 256]).unwrap();
        assert_eq!(canny(&img, 50.0, 150.0).count_nonzero(), 0);
    }

    #[test]
    fn bright_bar_produces_two_thin_edges() {
        let img = bar_image(20, 10, 8, 12, 200);
        let edges = canny(&img, 50.0, 150.0);
        let row = 5;
        let hits: Vec<usize> = (0..20).filter(|&x| edges.get(x, row) == 255).collect();
        assert_eq!(hits.len(), 2, "edge columns {hits:?}");
        assert!(hits[0] < 10 && hits[1] >= 10);
        assert!(edges.data.iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn weak_only_edges_are_dropped() {
        // Step of 15 gives an L1 magnitude of 60: above low, below high.
        let img = bar_image(20, 10, 10, 20, 15);
        assert_eq!(canny(&img, 50.0, 150.0).count_nonzero(), 0);
        assert!(canny(&img, 50.0, 55.0).count_nonzero() > 0);
    }
}
