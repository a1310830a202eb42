//! WebAssembly exports for the hysteria filter.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Buffer Layout
//!
//! Frames cross the boundary as one stride-free 4:2:0 buffer of `u16`
//! samples laid out Y ++ U ++ V (see [`crate::frame`]). 8-bit material is
//! passed the same way with `bits = 8`.

use wasm_bindgen::prelude::*;

use crate::frame::{Frame, FrameFormat};
use crate::params::HysteriaParams;
use crate::pipeline::hysteria;

// ============================================================================
// Hysteria - 4:2:0
// ============================================================================

/// Darken line art in a packed 4:2:0 frame.
///
/// # Arguments
/// * `data` - Packed Y ++ U ++ V samples
/// * `width` - Luma width in pixels
/// * `height` - Luma height in pixels
/// * `bits` - Bits per sample (8-16)
///
/// The remaining arguments mirror [`HysteriaParams`]; the merge always
/// targets the luma plane.
///
/// # Returns
/// Packed Y ++ U ++ V samples of the filtered frame
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn hysteria_wasm(
    data: &[u16],
    width: usize,
    height: usize,
    bits: u8,
    strength: f32,
    usemask: bool,
    lowthresh: u32,
    highthresh: u32,
    luma_cap: u32,
    maxchg: u32,
    minchg: u32,
    showmask: bool,
) -> Result<Vec<u16>, JsError> {
    let frame = Frame::from_packed(FrameFormat::yuv420(bits), width, height, data)?;

    let params = HysteriaParams {
        strength,
        usemask,
        lowthresh,
        highthresh,
        luma_cap,
        maxchg,
        minchg,
        showmask,
        ..HysteriaParams::default()
    };

    let result = hysteria(&frame, &params)?;
    Ok(result.to_packed())
}

/// Darken line art with default parameters.
#[wasm_bindgen]
pub fn hysteria_default_wasm(
    data: &[u16],
    width: usize,
    height: usize,
    bits: u8,
) -> Result<Vec<u16>, JsError> {
    let frame = Frame::from_packed(FrameFormat::yuv420(bits), width, height, data)?;
    let result = hysteria(&frame, &HysteriaParams::default())?;
    Ok(result.to_packed())
}
