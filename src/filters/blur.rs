//! Directional 3x3 blur.
//!
//! The kernel is the outer product of `[ratio_v, 1, ratio_v]` (vertical) and
//! `[ratio_h, 1, ratio_h]` (horizontal), normalised to unit sum. With both
//! ratios at 1.0 this is a plain 3x3 box mean; a ratio of 0.0 disables
//! blurring along that axis.

use ndarray::{Array2, ArrayView2};

use super::core::map_neighborhood;

/// Apply a directional 3x3 blur.
///
/// # Arguments
/// * `input` - Plane of samples
/// * `ratio_h` - Weight of the left/right taps relative to the centre
/// * `ratio_v` - Weight of the upper/lower taps relative to the centre
///
/// # Returns
/// Blurred plane, rounded to nearest once per pass
pub fn directional_blur(input: ArrayView2<u16>, ratio_h: f32, ratio_v: f32) -> Array2<u16> {
    let h = [ratio_h as f64, 1.0, ratio_h as f64];
    let v = [ratio_v as f64, 1.0, ratio_v as f64];
    let norm = (1.0 + 2.0 * ratio_h as f64) * (1.0 + 2.0 * ratio_v as f64);

    map_neighborhood(input, |n| {
        let mut sum = 0.0f64;
        for ky in 0..3 {
            for kx in 0..3 {
                sum += n[ky * 3 + kx] as f64 * v[ky] * h[kx];
            }
        }
        (sum / norm).round().clamp(0.0, u16::MAX as f64) as u16
    })
}
