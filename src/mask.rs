//! Lane-candidate mask extraction on the bird's-eye image.
//!
//! Stage order matters: color selection happens before smoothing so the blur
//! only softens paint boundaries, and the edge map is bridged by dilation
//! before erosion restores its width.
//!
//! 1. Color: union of the orange and white HSV ranges, ANDed with the gray
//!    channel so only bright paint of the right hue survives.
//! 2. Gaussian blur.
//! 3. Hysteresis edge detection.
//! 4. Dilate, erode, then close with the same square element.
//! 5. Binarize to exactly {0, 255}.
use crate::color::{bitwise_and, bitwise_or, in_range, to_gray, to_hsv};
use crate::edges::canny;
use crate::filters::gaussian_blur;
use crate::image::{BinaryMask, ColorImage, GrayImage};
use crate::morphology::{close, dilate, erode, threshold_binary};
use crate::params::MaskParams;
use log::debug;

/// Gray intensity kept only where the pixel's color matches lane paint.
pub fn paint_intensity(birds_eye: &ColorImage, params: &MaskParams) -> GrayImage {
    let gray = to_gray(birds_eye);
    let hsv = to_hsv(birds_eye);
    let orange = in_range(&hsv, &params.orange);
    let white = in_range(&hsv, &params.white);
    bitwise_and(&gray, &bitwise_or(&orange, &white))
}

/// Binary lane-candidate mask of the same size as `birds_eye`.
pub fn extract(birds_eye: &ColorImage, params: &MaskParams) -> BinaryMask {
    let paint = paint_intensity(birds_eye, params);
    let blurred = gaussian_blur(&paint, params.blur_kernel, params.blur_sigma);
    let edges = canny(&blurred, params.canny_low, params.canny_high);

    let k = params.morph_kernel;
    let bridged = erode(&dilate(&edges, k), k);
    let sealed = close(&bridged, k);
    let mask = threshold_binary(&sealed, params.binarize_threshold, 255);

    debug!(
        "mask: {}x{} paint_px={} edge_px={} mask_px={}",
        mask.w,
        mask.h,
        paint.count_nonzero(),
        edges.count_nonzero(),
        mask.count_nonzero()
    );
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    fn road_with_stripe(w: usize, h: usize, x0: usize, x1: usize, paint: [u8; 3]) -> ColorImage {
        let mut img = ColorImage::filled(w, h, [70, 70, 75]);
        for y in 0..h {
            for x in x0..x1 {
                img.set(x, y, paint);
            }
        }
        img
    }

    #[test]
    fn asphalt_only_gives_empty_mask() {
        let img = ColorImage::filled(64, 48, [70, 70, 75]);
        let mask = extract(&img, &MaskParams::default());
        assert_eq!(mask.count_nonzero(), 0);
    }

    #[test]
    fn white_stripe_is_detected_and_mask_is_binary() {
        let img = road_with_stripe(80, 60, 30, 36, [240, 240, 240]);
        let mask = extract(&img, &MaskParams::default());
        assert!(mask.data.iter().all(|&v| v == 0 || v == 255));
        let row: Vec<usize> = (0..80).filter(|&x| mask.get(x, 30) == 255).collect();
        assert!(!row.is_empty(), "stripe should survive in the mask");
        let mean = row.iter().sum::<usize>() as f32 / row.len() as f32;
        assert!((mean - 32.5).abs() < 3.0, "mask centred at {mean}");
    }

    #[test]
    fn orange_stripe_is_detected() {
        let img = road_with_stripe(80, 60, 40, 46, [235, 150, 40]);
        let mask = extract(&img, &MaskParams::default());
        assert!(mask.count_nonzero() > 0);
    }

    #[test]
    fn paint_intensity_drops_unpainted_pixels() {
        let img = road_with_stripe(10, 2, 4, 6, [240, 240, 240]);
        let paint = paint_intensity(&img, &MaskParams::default());
        assert_eq!(paint.get(0, 0), 0);
        assert_eq!(paint.get(4, 1), 240);
    }
}
