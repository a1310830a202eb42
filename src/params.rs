//! Filter configuration.
//!
//! Thresholds, the luma cap and the change limits are compared against
//! samples in the frame's own scale. Only the mask preview rescales its
//! levels to the bit depth.

use crate::error::{HysteriaError, HysteriaResult};
use crate::frame::FrameFormat;

/// Upper bound of `luma_cap`, `maxchg` and `minchg`.
pub const CHANGE_LIMIT_MAX: u32 = 255;

/// Parameters of the hysteria line darkener.
#[derive(Debug, Clone, PartialEq)]
pub struct HysteriaParams {
    /// Multiplier on the darkening amount
    pub strength: f32,
    /// Blend the darkened plane through the edge mask
    pub usemask: bool,
    /// Sobel threshold of the noisy mask
    pub lowthresh: u32,
    /// Sobel threshold of the clean mask
    pub highthresh: u32,
    /// Samples brighter than this are never darkened
    pub luma_cap: u32,
    /// Largest darkening applied to any sample
    pub maxchg: u32,
    /// Darkening below this amount is dropped
    pub minchg: u32,
    /// Planes the masked merge writes
    pub planes: Vec<usize>,
    /// Use the luma mask for every merged plane
    pub luma: bool,
    /// Return the edge mask preview instead of the filtered frame
    pub showmask: bool,
}

impl Default for HysteriaParams {
    fn default() -> Self {
        HysteriaParams {
            strength: 1.0,
            usemask: true,
            lowthresh: 6,
            highthresh: 20,
            luma_cap: 191,
            maxchg: 255,
            minchg: 0,
            planes: vec![0],
            luma: true,
            showmask: false,
        }
    }
}

/// Output path selected by the mode flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Levels-stretched edge mask with the original chroma
    MaskPreview,
    /// Darkened luma blended through the edge mask
    Masked,
    /// Darkened luma everywhere
    Unmasked,
}

impl HysteriaParams {
    /// Mask preview wins over both darkening modes.
    pub fn output_mode(&self) -> OutputMode {
        if self.showmask {
            OutputMode::MaskPreview
        } else if self.usemask {
            OutputMode::Masked
        } else {
            OutputMode::Unmasked
        }
    }

    /// Check every parameter against `format` before any processing.
    pub fn validate(&self, format: &FrameFormat, plane_count: usize) -> HysteriaResult<()> {
        if !self.strength.is_finite() || self.strength <= 0.0 {
            return Err(HysteriaError::out_of_range(
                "strength",
                self.strength,
                f32::MIN_POSITIVE,
                f32::MAX,
            ));
        }

        let peak = format.peak();
        for (name, value) in [("lowthresh", self.lowthresh), ("highthresh", self.highthresh)] {
            if value > peak {
                return Err(HysteriaError::out_of_range(name, value, 0u32, peak));
            }
        }

        for (name, value) in [
            ("luma_cap", self.luma_cap),
            ("maxchg", self.maxchg),
            ("minchg", self.minchg),
        ] {
            if value > CHANGE_LIMIT_MAX {
                return Err(HysteriaError::out_of_range(name, value, 0u32, CHANGE_LIMIT_MAX));
            }
        }

        for &plane in &self.planes {
            if plane >= plane_count {
                return Err(HysteriaError::out_of_range(
                    "planes",
                    plane as f64,
                    0.0,
                    (plane_count - 1) as f64,
                ));
            }
            // Without `luma` the single-plane mask has nothing for chroma
            if plane > 0 && !self.luma && self.output_mode() == OutputMode::Masked {
                return Err(HysteriaError::out_of_range("planes", plane as f64, 0.0, 0.0));
            }
        }

        Ok(())
    }
}
