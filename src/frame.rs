//! Planar frames and bit-depth helpers.
//!
//! A [`Frame`] holds one luma plane and, for YUV formats, two chroma planes.
//! Samples are stored as `u16` whatever the bit depth, so 8-bit and 16-bit
//! material run through the same code paths.
//!
//! ## Packed layout
//!
//! [`Frame::from_packed`] and [`Frame::to_packed`] use a stride-free buffer:
//!
//! | Range | Plane |
//! |-------|-------|
//! | `[0 .. w*h]` | Y |
//! | `[w*h .. w*h + cw*ch]` | U |
//! | `[w*h + cw*ch .. end]` | V |

use ndarray::{Array2, ArrayView2};

use crate::error::{HysteriaError, HysteriaResult};

/// Smallest supported bit depth.
pub const MIN_BITS: u8 = 8;
/// Largest supported bit depth.
pub const MAX_BITS: u8 = 16;

// ============================================================================
// Bit depth helpers
// ============================================================================

/// Largest representable sample value at `bits` per sample.
#[inline]
pub fn peak(bits: u8) -> u32 {
    (1u32 << bits) - 1
}

/// Mid-gray: half of `2^bits`, the bias of signed difference planes.
#[inline]
pub fn mid(bits: u8) -> u32 {
    1u32 << (bits - 1)
}

/// Rescale an 8-bit value to `bits` per sample, truncating.
///
/// `scale_to_depth(80, 16)` is `80 * 65535 / 255 = 20560`.
pub fn scale_to_depth(value: u32, bits: u8) -> u32 {
    ((value as u64 * peak(bits) as u64) / 255) as u32
}

// ============================================================================
// Format
// ============================================================================

/// Colour family of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFamily {
    /// Luma only
    Gray,
    /// Luma plus two chroma planes
    Yuv,
}

impl ColorFamily {
    pub fn plane_count(self) -> usize {
        match self {
            ColorFamily::Gray => 1,
            ColorFamily::Yuv => 3,
        }
    }
}

/// Sample layout shared by every plane of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameFormat {
    pub color_family: ColorFamily,
    pub bits_per_sample: u8,
    /// log2 of the horizontal chroma subsampling factor
    pub subsampling_w: u8,
    /// log2 of the vertical chroma subsampling factor
    pub subsampling_h: u8,
}

impl FrameFormat {
    pub fn gray(bits_per_sample: u8) -> Self {
        FrameFormat {
            color_family: ColorFamily::Gray,
            bits_per_sample,
            subsampling_w: 0,
            subsampling_h: 0,
        }
    }

    /// 4:2:0 YUV.
    pub fn yuv420(bits_per_sample: u8) -> Self {
        FrameFormat {
            color_family: ColorFamily::Yuv,
            bits_per_sample,
            subsampling_w: 1,
            subsampling_h: 1,
        }
    }

    pub fn peak(&self) -> u32 {
        peak(self.bits_per_sample)
    }

    pub fn mid(&self) -> u32 {
        mid(self.bits_per_sample)
    }

    /// (width, height) of plane `index` for a luma plane of `width` x `height`.
    pub fn plane_dim(&self, index: usize, width: usize, height: usize) -> (usize, usize) {
        if index == 0 {
            (width, height)
        } else {
            (
                subsampled(width, self.subsampling_w),
                subsampled(height, self.subsampling_h),
            )
        }
    }

    fn validate(&self) -> HysteriaResult<()> {
        if !(MIN_BITS..=MAX_BITS).contains(&self.bits_per_sample) {
            return Err(HysteriaError::UnsupportedDepth(self.bits_per_sample));
        }
        match self.color_family {
            ColorFamily::Gray if self.subsampling_w != 0 || self.subsampling_h != 0 => {
                Err(HysteriaError::UnsupportedFormat(
                    "gray frames cannot be subsampled".to_string(),
                ))
            }
            ColorFamily::Yuv if self.subsampling_w > 2 || self.subsampling_h > 2 => {
                Err(HysteriaError::UnsupportedFormat(format!(
                    "chroma subsampling {}x{} is not a planar YUV layout",
                    1 << self.subsampling_w,
                    1 << self.subsampling_h
                )))
            }
            _ => Ok(()),
        }
    }
}

#[inline]
fn subsampled(len: usize, log2: u8) -> usize {
    (len + (1 << log2) - 1) >> log2
}

// ============================================================================
// Frame
// ============================================================================

/// A planar frame with uniform bit depth.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    format: FrameFormat,
    planes: Vec<Array2<u16>>,
}

impl Frame {
    /// Build a frame from owned planes, validating the layout.
    ///
    /// Planes are indexed `[row, column]`, so a plane's shape is
    /// `(height, width)`.
    pub fn new(format: FrameFormat, planes: Vec<Array2<u16>>) -> HysteriaResult<Self> {
        format.validate()?;

        let expected = format.color_family.plane_count();
        if planes.len() != expected {
            return Err(HysteriaError::UnsupportedFormat(format!(
                "{:?} frame needs {} planes, got {}",
                format.color_family,
                expected,
                planes.len()
            )));
        }

        let (height, width) = planes[0].dim();
        if width == 0 || height == 0 {
            return Err(HysteriaError::InvalidInput("luma plane is empty".to_string()));
        }

        for (index, plane) in planes.iter().enumerate().skip(1) {
            let (w, h) = format.plane_dim(index, width, height);
            if plane.dim() != (h, w) {
                return Err(HysteriaError::UnsupportedFormat(format!(
                    "plane {} is {}x{}, expected {}x{} for {}x{} luma",
                    index,
                    plane.ncols(),
                    plane.nrows(),
                    w,
                    h,
                    width,
                    height
                )));
            }
        }

        let peak = format.peak();
        for (index, plane) in planes.iter().enumerate() {
            if let Some(&v) = plane.iter().find(|&&v| v as u32 > peak) {
                return Err(HysteriaError::UnsupportedFormat(format!(
                    "plane {} holds sample {} above the {}-bit peak {}",
                    index, v, format.bits_per_sample, peak
                )));
            }
        }

        Ok(Frame { format, planes })
    }

    /// Build a frame from planes alone, inferring the colour family and
    /// chroma subsampling from the plane sizes.
    pub fn from_planes(bits_per_sample: u8, planes: Vec<Array2<u16>>) -> HysteriaResult<Self> {
        let format = match planes.len() {
            1 => FrameFormat::gray(bits_per_sample),
            3 => {
                let (height, width) = planes[0].dim();
                let (ch, cw) = planes[1].dim();
                let subsampling_w = infer_subsampling(width, cw).ok_or_else(|| {
                    HysteriaError::UnsupportedFormat(format!(
                        "chroma width {} does not subsample luma width {}",
                        cw, width
                    ))
                })?;
                let subsampling_h = infer_subsampling(height, ch).ok_or_else(|| {
                    HysteriaError::UnsupportedFormat(format!(
                        "chroma height {} does not subsample luma height {}",
                        ch, height
                    ))
                })?;
                FrameFormat {
                    color_family: ColorFamily::Yuv,
                    bits_per_sample,
                    subsampling_w,
                    subsampling_h,
                }
            }
            n => {
                return Err(HysteriaError::UnsupportedFormat(format!(
                    "expected 1 or 3 planes, got {}",
                    n
                )))
            }
        };
        Frame::new(format, planes)
    }

    /// Unpack a stride-free Y ++ U ++ V buffer.
    pub fn from_packed(
        format: FrameFormat,
        width: usize,
        height: usize,
        data: &[u16],
    ) -> HysteriaResult<Self> {
        format.validate()?;
        if width == 0 || height == 0 {
            return Err(HysteriaError::InvalidInput(format!(
                "frame dimensions {}x{} are empty",
                width, height
            )));
        }

        let dims: Vec<(usize, usize)> = (0..format.color_family.plane_count())
            .map(|i| format.plane_dim(i, width, height))
            .collect();
        let total: usize = dims.iter().map(|(w, h)| w * h).sum();
        if data.len() != total {
            return Err(HysteriaError::InvalidInput(format!(
                "packed buffer holds {} samples, {}x{} {:?} needs {}",
                data.len(),
                width,
                height,
                format.color_family,
                total
            )));
        }

        let mut planes = Vec::with_capacity(dims.len());
        let mut offset = 0;
        for (w, h) in dims {
            let samples = data[offset..offset + w * h].to_vec();
            offset += w * h;
            let plane = Array2::from_shape_vec((h, w), samples)
                .map_err(|e| HysteriaError::InvalidInput(e.to_string()))?;
            planes.push(plane);
        }

        Frame::new(format, planes)
    }

    /// Pack the planes into a stride-free Y ++ U ++ V buffer.
    pub fn to_packed(&self) -> Vec<u16> {
        let total: usize = self.planes.iter().map(|p| p.len()).sum();
        let mut out = Vec::with_capacity(total);
        for plane in &self.planes {
            out.extend(plane.iter().copied());
        }
        out
    }

    pub fn format(&self) -> FrameFormat {
        self.format
    }

    pub fn bits_per_sample(&self) -> u8 {
        self.format.bits_per_sample
    }

    pub fn width(&self) -> usize {
        self.planes[0].ncols()
    }

    pub fn height(&self) -> usize {
        self.planes[0].nrows()
    }

    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    pub fn luma(&self) -> ArrayView2<'_, u16> {
        self.planes[0].view()
    }

    pub fn plane(&self, index: usize) -> Option<ArrayView2<'_, u16>> {
        self.planes.get(index).map(|p| p.view())
    }

    pub fn planes(&self) -> &[Array2<u16>] {
        &self.planes
    }

    pub fn into_planes(self) -> Vec<Array2<u16>> {
        self.planes
    }

    /// Replace the luma plane, keeping chroma (a Y-from-A, UV-from-B shuffle).
    pub fn shuffle_luma(&self, luma: Array2<u16>) -> HysteriaResult<Frame> {
        if luma.dim() != self.planes[0].dim() {
            return Err(HysteriaError::DimensionMismatch {
                expected: (self.width(), self.height()),
                actual: (luma.ncols(), luma.nrows()),
            });
        }
        let mut planes = self.planes.clone();
        planes[0] = luma;
        Ok(Frame {
            format: self.format,
            planes,
        })
    }

    pub(crate) fn from_parts_unchecked(format: FrameFormat, planes: Vec<Array2<u16>>) -> Self {
        Frame { format, planes }
    }
}

fn infer_subsampling(luma: usize, chroma: usize) -> Option<u8> {
    (0u8..=2).find(|&s| subsampled(luma, s) == chroma)
}
