//! Levels: linear range remapping with gamma.
//!
//! Works on any bit depth from 8 to 16 through a lookup table with one entry
//! per representable sample value.

use ndarray::{Array2, ArrayView2};

use crate::frame::peak;

/// Input and output ranges of a levels adjustment, in native sample values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelsRange {
    pub min_in: u32,
    pub max_in: u32,
    pub gamma: f32,
    pub min_out: u32,
    pub max_out: u32,
}

impl LevelsRange {
    /// Identity mapping over the full range of `bits`.
    pub fn full(bits: u8) -> Self {
        let peak = peak(bits);
        LevelsRange {
            min_in: 0,
            max_in: peak,
            gamma: 1.0,
            min_out: 0,
            max_out: peak,
        }
    }
}

/// Build the levels lookup table for `bits` per sample.
pub fn levels_lut(range: LevelsRange, bits: u8) -> Vec<u16> {
    let peak = peak(bits);
    let in_range = (range.max_in as f32 - range.min_in as f32).max(1.0);
    let out_range = range.max_out as f32 - range.min_out as f32;
    let inv_gamma = 1.0 / range.gamma.max(0.001);

    (0..=peak)
        .map(|v| {
            // Map input range to 0-1
            let normalized = ((v as f32 - range.min_in as f32) / in_range).clamp(0.0, 1.0);
            let corrected = normalized.powf(inv_gamma);
            let result = range.min_out as f32 + corrected * out_range + 0.5;
            result.clamp(0.0, peak as f32) as u16
        })
        .collect()
}

/// Apply a levels adjustment to a plane.
///
/// # Arguments
/// * `input` - Plane of samples at `bits` per sample
/// * `range` - Input/output ranges and gamma
/// * `bits` - Bit depth of `input`
///
/// # Returns
/// Remapped plane with the same shape
pub fn levels(input: ArrayView2<u16>, range: LevelsRange, bits: u8) -> Array2<u16> {
    let lut = levels_lut(range, bits);
    let top = lut.len() - 1;
    input.mapv(|v| lut[(v as usize).min(top)])
}
