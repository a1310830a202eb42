//! The hysteria line darkener.
//!
//! ```text
//! luma ─┬─ Sobel(low) ──┐
//!       ├─ Sobel(high) ─┴─ hysteresis ─ inflate ─ blur ─ blur ─ deflate ─ mask
//!       └─ max3x3 ─ diff ─ strength ─ clamp ─ darkened
//! mask + darkened + original ─ merge / preview ─ output
//! ```
//!
//! The mask branch and the darkening branch run in parallel. Every frame is
//! processed independently, so [`hysteria_batch`] fans frames out over the
//! Rayon pool.

use ndarray::Array2;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::darken::darken_plane;
use crate::error::HysteriaResult;
use crate::filters::blend::{masked_merge, subsample_mask};
use crate::filters::levels::{levels, LevelsRange};
use crate::frame::{scale_to_depth, Frame};
use crate::mask::build_edge_mask;
use crate::params::{HysteriaParams, OutputMode};

/// Black point of the mask preview on the 8-bit scale.
pub const PREVIEW_MIN_OUT: u32 = 80;

/// Levels range that stretches a mask for preview at `bits` per sample.
pub fn preview_levels(bits: u8) -> LevelsRange {
    LevelsRange {
        min_out: scale_to_depth(PREVIEW_MIN_OUT, bits),
        ..LevelsRange::full(bits)
    }
}

/// Darken the line art of one frame.
///
/// # Arguments
/// * `frame` - Gray or planar YUV frame, 8-16 bits per sample
/// * `params` - Filter configuration
///
/// # Returns
/// A frame with the input's dimensions, plane count and bit depth
pub fn hysteria(frame: &Frame, params: &HysteriaParams) -> HysteriaResult<Frame> {
    let format = frame.format();
    let bits = format.bits_per_sample;
    params.validate(&format, frame.plane_count())?;

    let mode = params.output_mode();
    debug!(
        width = frame.width(),
        height = frame.height(),
        bits,
        ?mode,
        "hysteria: processing frame"
    );

    let luma = frame.luma();
    let (mask, darkened) = rayon::join(
        || build_edge_mask(luma, params.lowthresh, params.highthresh, bits),
        || darken_plane(luma, params, bits),
    );
    let mask = mask?;
    let darkened = darkened?;

    match mode {
        OutputMode::MaskPreview => {
            trace!("returning mask preview");
            frame.shuffle_luma(levels(mask.view(), preview_levels(bits), bits))
        }
        OutputMode::Unmasked => frame.shuffle_luma(darkened),
        OutputMode::Masked => merge_planes(frame, &mask, &darkened, params),
    }
}

/// Masked merge over the planes listed in `params.planes`.
///
/// Only luma is ever darkened; listed chroma planes merge against
/// themselves through the box-averaged luma mask.
fn merge_planes(
    frame: &Frame,
    mask: &Array2<u16>,
    darkened: &Array2<u16>,
    params: &HysteriaParams,
) -> HysteriaResult<Frame> {
    let format = frame.format();
    let bits = format.bits_per_sample;
    let mut planes = frame.planes().to_vec();

    for (index, plane) in planes.iter_mut().enumerate() {
        if !params.planes.contains(&index) {
            continue;
        }

        let merged = if index == 0 {
            masked_merge(frame.luma(), darkened.view(), mask.view(), bits)?
        } else {
            let plane_mask = subsample_mask(mask.view(), format.subsampling_w, format.subsampling_h);
            masked_merge(plane.view(), plane.view(), plane_mask.view(), bits)?
        };
        *plane = merged;
    }

    Ok(Frame::from_parts_unchecked(format, planes))
}

/// Process many frames in parallel, preserving order.
///
/// Each frame succeeds or fails on its own.
pub fn hysteria_batch(frames: &[Frame], params: &HysteriaParams) -> Vec<HysteriaResult<Frame>> {
    frames
        .par_iter()
        .map(|frame| hysteria(frame, params))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HysteriaError;
    use crate::frame::FrameFormat;

    fn yuv_frame(luma: Array2<u16>, bits: u8) -> Frame {
        let (h, w) = luma.dim();
        let ch = (h + 1) / 2;
        let cw = (w + 1) / 2;
        let u = Array2::from_elem((ch, cw), 100u16);
        let v = Array2::from_elem((ch, cw), 150u16);
        Frame::new(FrameFormat::yuv420(bits), vec![luma, u, v]).unwrap()
    }

    fn step_luma(width: usize, height: usize, split: usize) -> Array2<u16> {
        Array2::from_shape_fn((height, width), |(_, x)| if x < split { 50 } else { 200 })
    }

    /// Deterministic textured plane with values in `lo..lo + span`.
    fn texture(width: usize, height: usize, lo: u16, span: u16) -> Array2<u16> {
        Array2::from_shape_fn((height, width), |(y, x)| {
            let h = (x as u32 * 73 + y as u32 * 151 + (x * y) as u32 * 17) % span as u32;
            lo + h as u16
        })
    }

    #[test]
    fn test_shape_and_format_preserved() {
        let frame = yuv_frame(texture(9, 7, 0, 256), 8);
        for usemask in [true, false] {
            for showmask in [true, false] {
                let params = HysteriaParams {
                    usemask,
                    showmask,
                    ..Default::default()
                };
                let out = hysteria(&frame, &params).unwrap();
                assert_eq!(out.format(), frame.format());
                assert_eq!(out.plane_count(), 3);
                for i in 0..3 {
                    assert_eq!(out.plane(i).unwrap().dim(), frame.plane(i).unwrap().dim());
                }
            }
        }
    }

    #[test]
    fn test_step_edge_darkens_dark_side() {
        let frame = yuv_frame(step_luma(4, 4, 2), 8);
        let out = hysteria(&frame, &HysteriaParams::default()).unwrap();
        let luma = out.luma();

        for y in 0..4 {
            assert_eq!(luma[[y, 0]], 50);
            // Left of the boundary: 50 - 127 saturates
            assert_eq!(luma[[y, 1]], 0);
            // Right of the boundary: 200 > luma_cap
            assert_eq!(luma[[y, 2]], 200);
            assert_eq!(luma[[y, 3]], 200);
        }
        assert_eq!(out.plane(1), frame.plane(1));
        assert_eq!(out.plane(2), frame.plane(2));
    }

    #[test]
    fn test_wide_step_only_touches_boundary() {
        let frame = yuv_frame(step_luma(12, 8, 6), 8);
        let out = hysteria(&frame, &HysteriaParams::default()).unwrap();
        let luma = out.luma();

        for y in 0..8 {
            for x in 0..12 {
                if x == 5 {
                    // Mask weight 170 of 255 towards 0
                    assert_eq!(luma[[y, x]], 17);
                } else {
                    assert_eq!(luma[[y, x]], frame.luma()[[y, x]]);
                }
            }
        }
    }

    #[test]
    fn test_flat_frame_unchanged() {
        let frame = yuv_frame(Array2::from_elem((6, 8), 120u16), 8);
        for usemask in [true, false] {
            let params = HysteriaParams {
                usemask,
                strength: 4.0,
                ..Default::default()
            };
            assert_eq!(hysteria(&frame, &params).unwrap(), frame);
        }
    }

    #[test]
    fn test_luma_cap_invariant() {
        let frame = yuv_frame(texture(16, 12, 0, 256), 8);
        for usemask in [true, false] {
            let params = HysteriaParams {
                usemask,
                strength: 3.0,
                luma_cap: 120,
                ..Default::default()
            };
            let out = hysteria(&frame, &params).unwrap();
            for (o, x) in out.luma().iter().zip(frame.luma().iter()) {
                if *x > 120 {
                    assert_eq!(o, x);
                }
            }
        }
    }

    #[test]
    fn test_max_change_bound() {
        let frame = yuv_frame(texture(16, 12, 0, 256), 8);
        for usemask in [true, false] {
            let params = HysteriaParams {
                usemask,
                strength: 2.0,
                maxchg: 12,
                ..Default::default()
            };
            let out = hysteria(&frame, &params).unwrap();
            for (o, x) in out.luma().iter().zip(frame.luma().iter()) {
                assert!(o <= x);
                assert!(x - o <= 12);
            }
        }
    }

    #[test]
    fn test_min_change_floor() {
        // Values stay in 100..180 so no darkening saturates at 0
        let frame = yuv_frame(texture(16, 12, 100, 80), 8);
        let params = HysteriaParams {
            usemask: false,
            minchg: 15,
            ..Default::default()
        };
        let out = hysteria(&frame, &params).unwrap();

        let mut changed = 0;
        for (o, x) in out.luma().iter().zip(frame.luma().iter()) {
            let delta = x - o;
            assert!(delta == 0 || delta >= 15, "change of {}", delta);
            if delta > 0 {
                changed += 1;
            }
        }
        assert!(changed > 0);
    }

    #[test]
    fn test_strength_monotonic() {
        let frame = yuv_frame(texture(16, 12, 0, 256), 8);
        let run = |strength: f32| {
            let params = HysteriaParams {
                strength,
                ..Default::default()
            };
            hysteria(&frame, &params).unwrap()
        };

        let weak = run(0.5);
        let strong = run(1.5);
        for ((w, s), x) in weak
            .luma()
            .iter()
            .zip(strong.luma().iter())
            .zip(frame.luma().iter())
        {
            assert!(x - s >= x - w);
        }
    }

    #[test]
    fn test_mask_preview_priority() {
        let frame = yuv_frame(step_luma(12, 8, 6), 8);
        let masked = hysteria(
            &frame,
            &HysteriaParams {
                showmask: true,
                ..Default::default()
            },
        )
        .unwrap();
        let unmasked = hysteria(
            &frame,
            &HysteriaParams {
                showmask: true,
                usemask: false,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(masked, unmasked);
        // Mask 0 maps to the preview black point, 170 to 80 + 170 * 175 / 255
        assert_eq!(masked.luma()[[0, 0]], 80);
        assert_eq!(masked.luma()[[0, 5]], 197);
        assert_eq!(masked.plane(1), frame.plane(1));
    }

    #[test]
    fn test_preview_levels_scale_with_depth() {
        assert_eq!(preview_levels(8).min_out, 80);
        assert_eq!(preview_levels(10).min_out, 320);
        assert_eq!(preview_levels(10).max_in, 1023);
        assert_eq!(preview_levels(16).max_out, 65535);
    }

    #[test]
    fn test_unmasked_darkens_everywhere() {
        let frame = yuv_frame(step_luma(12, 8, 6), 8);
        let params = HysteriaParams {
            usemask: false,
            ..Default::default()
        };
        let out = hysteria(&frame, &params).unwrap();
        assert_eq!(out.luma()[[3, 5]], 0);
        assert_eq!(out.luma()[[3, 4]], 50);
    }

    #[test]
    fn test_planes_without_luma_leave_frame() {
        let frame = yuv_frame(step_luma(12, 8, 6), 8);
        let params = HysteriaParams {
            planes: vec![1, 2],
            ..Default::default()
        };
        assert_eq!(hysteria(&frame, &params).unwrap(), frame);
    }

    #[test]
    fn test_gray_frame() {
        let frame = Frame::new(FrameFormat::gray(8), vec![step_luma(4, 4, 2)]).unwrap();
        let out = hysteria(&frame, &HysteriaParams::default()).unwrap();
        assert_eq!(out.plane_count(), 1);
        assert_eq!(out.luma()[[0, 1]], 0);
    }

    #[test]
    fn test_sixteen_bit_frame() {
        let luma = Array2::from_shape_fn((8, 12), |(_, x)| if x < 6 { 5000u16 } else { 60000 });
        let frame = yuv_frame(luma, 16);
        let params = HysteriaParams {
            luma_cap: 255,
            ..Default::default()
        };
        let out = hysteria(&frame, &params).unwrap();
        // 5000 exceeds the cap of 255 in native scale
        assert_eq!(out, frame);
    }

    #[test]
    fn test_rejects_bad_parameters_before_processing() {
        let frame = yuv_frame(step_luma(4, 4, 2), 8);
        let params = HysteriaParams {
            minchg: 300,
            ..Default::default()
        };
        assert!(matches!(
            hysteria(&frame, &params),
            Err(HysteriaError::ParameterOutOfRange { name: "minchg", .. })
        ));
    }

    #[test]
    fn test_batch_preserves_order() {
        let frames = vec![
            yuv_frame(step_luma(4, 4, 2), 8),
            yuv_frame(Array2::from_elem((4, 4), 60u16), 8),
            yuv_frame(step_luma(4, 4, 1), 8),
        ];
        let params = HysteriaParams::default();
        let results = hysteria_batch(&frames, &params);

        assert_eq!(results.len(), 3);
        for (frame, result) in frames.iter().zip(results) {
            assert_eq!(result.unwrap(), hysteria(frame, &params).unwrap());
        }
    }
}
