//! Morphology filters: Inflate, Deflate.
//!
//! Both use the full 3x3 square structuring element with mirrored borders.
//! Inflate makes bright regions grow and dark regions shrink; Deflate does
//! the opposite.

use ndarray::{Array2, ArrayView2};

use super::core::map_neighborhood;

// ============================================================================
// Inflate
// ============================================================================

/// Replace each sample with the maximum of itself and its 8 neighbours.
pub fn inflate(input: ArrayView2<u16>) -> Array2<u16> {
    map_neighborhood(input, |n| n.iter().copied().max().unwrap_or(0))
}

// ============================================================================
// Deflate
// ============================================================================

/// Replace each sample with the minimum of itself and its 8 neighbours.
pub fn deflate(input: ArrayView2<u16>) -> Array2<u16> {
    map_neighborhood(input, |n| n.iter().copied().min().unwrap_or(0))
}
