//! Two-plane arithmetic: biased difference and masked merge.
//!
//! ## Biased difference
//!
//! [`make_diff`] stores `a - b` in an unsigned plane by adding mid-gray and
//! clamping, so the representable difference runs from `-mid` to
//! `peak - mid`. Callers that undo the bias inherit that saturation.
//!
//! ## Masked merge
//!
//! [`masked_merge`] blends proportionally: a mask sample of 0 keeps the base,
//! the peak value takes the overlay, and anything between mixes linearly.

use ndarray::{Array2, ArrayView2, Zip};

use crate::error::{HysteriaError, HysteriaResult};
use crate::frame::{mid, peak};

fn check_same_dim(expected: &ArrayView2<u16>, actual: &ArrayView2<u16>) -> HysteriaResult<()> {
    if expected.dim() != actual.dim() {
        return Err(HysteriaError::DimensionMismatch {
            expected: (expected.ncols(), expected.nrows()),
            actual: (actual.ncols(), actual.nrows()),
        });
    }
    Ok(())
}

// ============================================================================
// Difference
// ============================================================================

/// Mid-gray biased difference `clamp(a - b + mid, 0, peak)`.
pub fn make_diff(a: ArrayView2<u16>, b: ArrayView2<u16>, bits: u8) -> HysteriaResult<Array2<u16>> {
    check_same_dim(&a, &b)?;
    let mid = mid(bits) as i64;
    let peak = peak(bits) as i64;

    Ok(Zip::from(&a)
        .and(&b)
        .map_collect(|&a, &b| (a as i64 - b as i64 + mid).clamp(0, peak) as u16))
}

// ============================================================================
// Masked Merge
// ============================================================================

/// Blend one sample pair by mask weight `m` out of `peak`, rounding to nearest.
#[inline]
pub fn merge_sample(base: u16, overlay: u16, m: u16, peak: u32) -> u16 {
    let peak = peak as i64;
    let delta = (overlay as i64 - base as i64) * m as i64;
    let half = peak / 2;
    let step = if delta >= 0 {
        (delta + half) / peak
    } else {
        -((-delta + half) / peak)
    };
    (base as i64 + step).clamp(0, peak) as u16
}

/// Blend `overlay` over `base`, weighted by `mask`.
///
/// # Arguments
/// * `base` - Plane kept where the mask is 0
/// * `overlay` - Plane taken where the mask is at peak
/// * `mask` - Blend weights, same shape as `base`
/// * `bits` - Bit depth shared by all three planes
///
/// # Returns
/// Merged plane, or `DimensionMismatch` if the shapes differ
pub fn masked_merge(
    base: ArrayView2<u16>,
    overlay: ArrayView2<u16>,
    mask: ArrayView2<u16>,
    bits: u8,
) -> HysteriaResult<Array2<u16>> {
    check_same_dim(&base, &overlay)?;
    check_same_dim(&base, &mask)?;
    let peak = peak(bits);

    Ok(Zip::from(&base)
        .and(&overlay)
        .and(&mask)
        .map_collect(|&b, &o, &m| merge_sample(b, o, m, peak)))
}

/// Box-average a full-resolution mask down to a subsampled plane size.
///
/// `subsampling_w`/`subsampling_h` are log2 factors; blocks cut off by the
/// plane edge average only the samples they contain.
pub fn subsample_mask(mask: ArrayView2<u16>, subsampling_w: u8, subsampling_h: u8) -> Array2<u16> {
    if subsampling_w == 0 && subsampling_h == 0 {
        return mask.to_owned();
    }

    let (height, width) = mask.dim();
    let bw = 1usize << subsampling_w;
    let bh = 1usize << subsampling_h;
    let out_w = (width + bw - 1) / bw;
    let out_h = (height + bh - 1) / bh;

    Array2::from_shape_fn((out_h, out_w), |(cy, cx)| {
        let y0 = cy * bh;
        let x0 = cx * bw;
        let y1 = (y0 + bh).min(height);
        let x1 = (x0 + bw).min(width);

        let mut sum = 0u64;
        for y in y0..y1 {
            for x in x0..x1 {
                sum += mask[[y, x]] as u64;
            }
        }
        let count = ((y1 - y0) * (x1 - x0)) as u64;
        ((sum + count / 2) / count) as u16
    })
}
