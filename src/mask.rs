//! Edge mask construction.
//!
//! Two thresholded Sobel passes feed hysteresis linking; the linked mask is
//! then thickened and smoothed by inflate, two 1:1 directional blurs and a
//! deflate, in that order.

use ndarray::{Array2, ArrayView2};
use tracing::trace;

use crate::error::HysteriaResult;
use crate::filters::blur::directional_blur;
use crate::filters::edge::sobel_threshold;
use crate::filters::morphology::{deflate, inflate};
use crate::selection::hysteresis::hysteresis;

/// Blur ratio of the refinement passes.
const REFINE_BLUR_RATIO: f32 = 1.0;

/// Thresholded Sobel mask with `min == max == threshold`.
pub fn gradient_mask(luma: ArrayView2<u16>, threshold: u32, bits: u8) -> Array2<u16> {
    sobel_threshold(luma, threshold, threshold, 0, bits)
}

/// Thicken and smooth a linked edge mask.
pub fn refine_mask(mask: ArrayView2<u16>) -> Array2<u16> {
    let grown = inflate(mask);
    let blurred = directional_blur(grown.view(), REFINE_BLUR_RATIO, REFINE_BLUR_RATIO);
    let blurred = directional_blur(blurred.view(), REFINE_BLUR_RATIO, REFINE_BLUR_RATIO);
    deflate(blurred.view())
}

/// Build the refined edge mask of a luma plane.
///
/// # Arguments
/// * `luma` - Luma plane at `bits` per sample
/// * `lowthresh` - Threshold of the noisy mask
/// * `highthresh` - Threshold of the clean mask
/// * `bits` - Bit depth of `luma`
///
/// # Returns
/// Soft mask with the shape of `luma`
pub fn build_edge_mask(
    luma: ArrayView2<u16>,
    lowthresh: u32,
    highthresh: u32,
    bits: u8,
) -> HysteriaResult<Array2<u16>> {
    let (noisy, clean) = rayon::join(
        || gradient_mask(luma, lowthresh, bits),
        || gradient_mask(luma, highthresh, bits),
    );

    let linked = hysteresis(clean.view(), noisy.view())?;
    trace!(
        linked = linked.iter().filter(|&&v| v > 0).count(),
        "hysteresis joined edge masks"
    );

    Ok(refine_mask(linked.view()))
}
