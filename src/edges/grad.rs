//! 3×3 Sobel gradients with a selectable magnitude norm.
//!
//! - Convolves the `X`/`Y` kernel pair with replicated borders.
//! - Outputs per-pixel `gx`, `gy` and either `|gx| + |gy|` (L1, the cheap
//!   default used for hysteresis thresholds) or `sqrt(gx² + gy²)` (L2).
//!
//! Complexity: O(W·H) per pass; memory: three float buffers.
use crate::image::{ImageF32, ImageView, ImageViewMut};
use serde::{Deserialize, Serialize};

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Norm used to fold `gx`, `gy` into a magnitude.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientNorm {
    #[default]
    L1,
    L2,
}

/// Per-pixel gradient buffers.
#[derive(Clone, Debug)]
pub struct Grad {
    /// Horizontal derivative (convolution with kernel X)
    pub gx: ImageF32,
    /// Vertical derivative (convolution with kernel Y)
    pub gy: ImageF32,
    /// Magnitude per pixel under the selected norm
    pub mag: ImageF32,
}

/// Compute Sobel gradients on a single-channel float image.
pub fn sobel_gradients(l: &ImageF32, norm: GradientNorm) -> Grad {
    let w = l.w;
    let h = l.h;
    let mut gx = ImageF32::new(w, h);
    let mut gy = ImageF32::new(w, h);
    let mut mag = ImageF32::new(w, h);

    if w == 0 || h == 0 {
        return Grad { gx, gy, mag };
    }

    for y in 0..h {
        let y_idx = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        let rows = [l.row(y_idx[0]), l.row(y_idx[1]), l.row(y_idx[2])];
        let out_gx = gx.row_mut(y);
        let out_gy = gy.row_mut(y);
        let out_mag = mag.row_mut(y);
        for x in 0..w {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];

            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for (ky, yy_row) in rows.iter().enumerate() {
                let kx_row = &SOBEL_KERNEL_X[ky];
                let ky_row = &SOBEL_KERNEL_Y[ky];
                sum_x += yy_row[x_idx[0]] * kx_row[0]
                    + yy_row[x_idx[1]] * kx_row[1]
                    + yy_row[x_idx[2]] * kx_row[2];
                sum_y += yy_row[x_idx[0]] * ky_row[0]
                    + yy_row[x_idx[1]] * ky_row[1]
                    + yy_row[x_idx[2]] * ky_row[2];
            }

            out_gx[x] = sum_x;
            out_gy[x] = sum_y;
            out_mag[x] = match norm {
                GradientNorm::L1 => sum_x.abs() + sum_y.abs(),
                GradientNorm::L2 => (sum_x * sum_x + sum_y * sum_y).sqrt(),
            };
        }
    }

    Grad { gx, gy, mag }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_step_has_horizontal_gradient() {
        let mut img = ImageF32::new(6, 4);
        for y in 0..4 {
            for x in 3..6 {
                img.set(x, y, 10.0);
            }
        }
        let g = sobel_gradients(&img, GradientNorm::L1);
        // Kernel weights sum to 4 across the step.
        assert_eq!(g.gx.get(2, 1), 40.0);
        assert_eq!(g.gx.get(3, 1), 40.0);
        assert_eq!(g.gy.get(2, 1), 0.0);
        assert_eq!(g.mag.get(0, 1), 0.0);
    }

    #[test]
    fn l2_norm_is_euclidean() {
        let mut img = ImageF32::new(3, 3);
        img.set(2, 2, 1.0);
        let g = sobel_gradients(&img, GradientNorm::L2);
        let (gx, gy) = (g.gx.get(1, 1), g.gy.get(1, 1));
        assert!((g.mag.get(1, 1) - (gx * gx + gy * gy).sqrt()).abs() < 1e-6);
    }
}
