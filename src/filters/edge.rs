//! Edge detection: thresholded Sobel magnitude.
//!
//! The threshold pair works as a sensitivity window: magnitudes below `min`
//! are dropped, magnitudes above `max` saturate to the bit depth's peak, and
//! anything in between is kept as is. Called with `min == max` the output is
//! effectively a binary edge map.
//!
//! ## Borders
//!
//! Taps outside the plane are mirrored (see [`super::core::mirror`]), so
//! border samples get a real gradient rather than a forced zero.

use ndarray::{Array2, ArrayView2};

use super::core::map_neighborhood;
use crate::frame::peak;

// ============================================================================
// Sobel
// ============================================================================

/// Horizontal and vertical Sobel responses of a 3x3 neighbourhood.
#[inline]
pub fn sobel_gradients(n: &[u16; 9]) -> (i64, i64) {
    let a = |i: usize| n[i] as i64;
    let gx = (a(2) + 2 * a(5) + a(8)) - (a(0) + 2 * a(3) + a(6));
    let gy = (a(6) + 2 * a(7) + a(8)) - (a(0) + 2 * a(1) + a(2));
    (gx, gy)
}

/// Sobel edge mask with a low/high clamp window.
///
/// # Arguments
/// * `input` - Plane of samples at `bits` per sample
/// * `min` - Magnitudes below this become 0
/// * `max` - Magnitudes above this become the peak value
/// * `rshift` - Right shift applied to the magnitude before thresholding
/// * `bits` - Bit depth of `input`
///
/// # Returns
/// Edge-strength plane with the same shape as `input`
pub fn sobel_threshold(
    input: ArrayView2<u16>,
    min: u32,
    max: u32,
    rshift: u32,
    bits: u8,
) -> Array2<u16> {
    let peak = peak(bits);
    map_neighborhood(input, |n| {
        let (gx, gy) = sobel_gradients(n);
        let magnitude = ((gx * gx + gy * gy) as f64).sqrt() as u32;
        let g = magnitude.checked_shr(rshift).unwrap_or(0);

        let v = if g < min {
            0
        } else if g > max {
            peak
        } else {
            g.min(peak)
        };
        v as u16
    })
}
