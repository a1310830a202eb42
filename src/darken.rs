//! Darkening field and clamped application.
//!
//! A sample is darkened by how far it sits below the brightest sample of its
//! 3x3 neighbourhood. The difference goes through the mid-gray biased
//! [`make_diff`] and is un-biased afterwards, so it saturates at
//! `peak - mid` (127 at 8 bits) before `strength` is applied.

use ndarray::{Array2, ArrayView2, Zip};

use crate::error::{HysteriaError, HysteriaResult};
use crate::filters::blend::make_diff;
use crate::filters::morphology::inflate;
use crate::frame::{mid, peak};
use crate::params::HysteriaParams;

/// Policy knobs of [`clamped_apply`], in native sample values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DarkenLimits {
    pub luma_cap: u32,
    pub maxchg: u32,
    pub minchg: u32,
}

impl From<&HysteriaParams> for DarkenLimits {
    fn from(params: &HysteriaParams) -> Self {
        DarkenLimits {
            luma_cap: params.luma_cap,
            maxchg: params.maxchg,
            minchg: params.minchg,
        }
    }
}

/// Scaled darkening amount for every sample of `luma`.
///
/// `diffs = clamp(round((make_diff(max3x3(luma), luma) - mid) * strength), 0, peak)`
pub fn darkening_field(luma: ArrayView2<u16>, strength: f32, bits: u8) -> HysteriaResult<Array2<u16>> {
    let brightest = inflate(luma);
    let diff = make_diff(brightest.view(), luma, bits)?;

    let mid = mid(bits) as f64;
    let peak = peak(bits) as f64;
    let strength = strength as f64;
    Ok(diff.mapv(|d| ((d as f64 - mid) * strength).round().clamp(0.0, peak) as u16))
}

/// Darken one sample.
///
/// Precedence: the luma cap short-circuits everything, then `maxchg` caps
/// the amount, then amounts under `minchg` are dropped.
#[inline]
pub fn darken_sample(x: u32, y: u32, limits: DarkenLimits) -> u32 {
    let amount = if x > limits.luma_cap {
        0
    } else if y > limits.maxchg {
        limits.maxchg
    } else if y < limits.minchg {
        0
    } else {
        y
    };
    x.saturating_sub(amount)
}

/// Apply a darkening field to a plane.
///
/// # Arguments
/// * `original` - Plane to darken
/// * `diffs` - Output of [`darkening_field`], same shape
/// * `limits` - Luma cap and change limits
///
/// # Returns
/// Darkened plane, or `DimensionMismatch`
pub fn clamped_apply(
    original: ArrayView2<u16>,
    diffs: ArrayView2<u16>,
    limits: DarkenLimits,
) -> HysteriaResult<Array2<u16>> {
    if original.dim() != diffs.dim() {
        return Err(HysteriaError::DimensionMismatch {
            expected: (original.ncols(), original.nrows()),
            actual: (diffs.ncols(), diffs.nrows()),
        });
    }

    Ok(Zip::from(&original)
        .and(&diffs)
        .map_collect(|&x, &y| darken_sample(x as u32, y as u32, limits) as u16))
}

/// Darkening field followed by clamped application.
pub fn darken_plane(luma: ArrayView2<u16>, params: &HysteriaParams, bits: u8) -> HysteriaResult<Array2<u16>> {
    let diffs = darkening_field(luma, params.strength, bits)?;
    clamped_apply(luma, diffs.view(), DarkenLimits::from(params))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_LIMITS: DarkenLimits = DarkenLimits {
        luma_cap: 191,
        maxchg: 255,
        minchg: 0,
    };

    #[test]
    fn test_darken_sample_precedence() {
        let limits = DarkenLimits {
            luma_cap: 191,
            maxchg: 40,
            minchg: 10,
        };
        // Above the cap nothing happens, however large the diff
        assert_eq!(darken_sample(192, 200, limits), 192);
        // maxchg caps the amount
        assert_eq!(darken_sample(150, 60, limits), 110);
        // Below minchg is noise
        assert_eq!(darken_sample(150, 9, limits), 150);
        assert_eq!(darken_sample(150, 10, limits), 140);
        assert_eq!(darken_sample(191, 40, limits), 151);
    }

    #[test]
    fn test_darken_sample_saturates() {
        assert_eq!(darken_sample(30, 127, DEFAULT_LIMITS), 0);
    }

    #[test]
    fn test_field_is_zero_on_flat() {
        let luma = Array2::from_elem((4, 4), 77u16);
        let diffs = darkening_field(luma.view(), 3.0, 8).unwrap();
        assert!(diffs.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_field_saturates_at_mid_bias() {
        let luma = Array2::from_shape_vec((1, 2), vec![50u16, 200]).unwrap();
        let diffs = darkening_field(luma.view(), 1.0, 8).unwrap();
        // 150 + 128 clamps at 255, so only 127 survives the un-bias
        assert_eq!(diffs[[0, 0]], 127);
        assert_eq!(diffs[[0, 1]], 0);
    }

    #[test]
    fn test_field_scales_with_strength() {
        let luma = Array2::from_shape_vec((1, 2), vec![100u16, 120]).unwrap();
        assert_eq!(darkening_field(luma.view(), 1.0, 8).unwrap()[[0, 0]], 20);
        assert_eq!(darkening_field(luma.view(), 0.5, 8).unwrap()[[0, 0]], 10);
        assert_eq!(darkening_field(luma.view(), 1.25, 8).unwrap()[[0, 0]], 25);
        // (20 * 20 = 400) clamps at peak
        assert_eq!(darkening_field(luma.view(), 20.0, 8).unwrap()[[0, 0]], 255);
    }

    #[test]
    fn test_clamped_apply_plane() {
        let original = Array2::from_shape_vec((1, 3), vec![100u16, 200, 100]).unwrap();
        let diffs = Array2::from_shape_vec((1, 3), vec![30u16, 30, 0]).unwrap();
        let out = clamped_apply(original.view(), diffs.view(), DEFAULT_LIMITS).unwrap();
        assert_eq!(out.as_slice().unwrap(), &[70, 200, 100]);
    }

    #[test]
    fn test_clamped_apply_shape_mismatch() {
        let original = Array2::<u16>::zeros((2, 2));
        let diffs = Array2::<u16>::zeros((2, 1));
        assert!(clamped_apply(original.view(), diffs.view(), DEFAULT_LIMITS).is_err());
    }

    #[test]
    fn test_darken_plane_ten_bit() {
        let luma = Array2::from_shape_vec((1, 2), vec![100u16, 150]).unwrap();
        let params = HysteriaParams::default();
        let out = darken_plane(luma.view(), &params, 10).unwrap();
        assert_eq!(out[[0, 0]], 50);
        assert_eq!(out[[0, 1]], 150);
    }
}
