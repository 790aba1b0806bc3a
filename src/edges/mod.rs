//! Edge extraction on 8-bit images.
//!
//! - Sobel gradients with an L1 or L2 magnitude.
//! - Hysteresis (Canny-style) edge maps built on top of them.
//!
//! Borders are handled by replicating the outermost pixels.

pub mod canny;
pub mod grad;

/// Binary edge map with dual-threshold hysteresis.
pub use canny::canny;
/// Per-pixel gradients and magnitude.
pub use grad::{sobel_gradients, Grad, GradientNorm};
