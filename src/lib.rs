//! Hysteria line darkening
//!
//! Darkens line art in planar YUV video frames. Edges are found with a
//! two-threshold (hysteresis) Sobel detector, turned into a soft mask, and
//! every pixel inside the mask is darkened by how far it sits below its
//! brightest neighbour.
//!
//! ## Frame Format
//! - **Gray**: one luma plane
//! - **YUV**: luma plus two chroma planes, any planar subsampling up to 4x4
//!
//! Samples are `u16` for every bit depth from 8 to 16. Chroma is never
//! darkened; it is passed through or reattached to the mask preview.
//!
//! ## Usage
//! ```
//! use hysteria::{hysteria, Frame, FrameFormat, HysteriaParams};
//! use ndarray::Array2;
//!
//! let luma = Array2::from_shape_fn((4, 4), |(_, x)| if x < 2 { 50u16 } else { 200 });
//! let frame = Frame::new(FrameFormat::gray(8), vec![luma]).unwrap();
//! let out = hysteria(&frame, &HysteriaParams::default()).unwrap();
//! assert_eq!(out.luma()[[0, 1]], 0);
//! ```

pub mod darken;
pub mod error;
pub mod filters;
pub mod frame;
pub mod mask;
pub mod params;
pub mod pipeline;
pub mod selection;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{HysteriaError, HysteriaResult};
pub use frame::{scale_to_depth, ColorFamily, Frame, FrameFormat};
pub use params::{HysteriaParams, OutputMode};
pub use pipeline::{hysteria, hysteria_batch};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::HysteriaError;
    use crate::frame::{Frame, MAX_BITS, MIN_BITS};
    use crate::params::HysteriaParams;

    type Planes<'py> = (
        Bound<'py, PyArray2<u16>>,
        Option<Bound<'py, PyArray2<u16>>>,
        Option<Bound<'py, PyArray2<u16>>>,
    );

    fn to_py_err(err: HysteriaError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    /// Darken line art in a planar frame.
    ///
    /// Planes are uint16 arrays of shape (height, width). Pass `u` and `v`
    /// together for YUV, or neither for gray.
    ///
    /// # Returns
    /// Tuple `(y, u, v)` with `u`/`v` set to None for gray input
    #[pyfunction]
    #[pyo3(signature = (
        y, u=None, v=None, bits=8, strength=1.0, usemask=true, lowthresh=6, highthresh=20,
        luma_cap=191, maxchg=255, minchg=0, planes=None, luma=true, showmask=false
    ))]
    #[allow(clippy::too_many_arguments)]
    pub fn hysteria<'py>(
        py: Python<'py>,
        y: PyReadonlyArray2<'py, u16>,
        u: Option<PyReadonlyArray2<'py, u16>>,
        v: Option<PyReadonlyArray2<'py, u16>>,
        bits: u8,
        strength: f32,
        usemask: bool,
        lowthresh: u32,
        highthresh: u32,
        luma_cap: u32,
        maxchg: u32,
        minchg: u32,
        planes: Option<Vec<usize>>,
        luma: bool,
        showmask: bool,
    ) -> PyResult<Planes<'py>> {
        let mut input = vec![y.as_array().to_owned()];
        match (u, v) {
            (Some(u), Some(v)) => {
                input.push(u.as_array().to_owned());
                input.push(v.as_array().to_owned());
            }
            (None, None) => {}
            _ => {
                return Err(to_py_err(HysteriaError::InvalidInput(
                    "pass both chroma planes or neither".to_string(),
                )))
            }
        }

        let frame = Frame::from_planes(bits, input).map_err(to_py_err)?;
        let params = HysteriaParams {
            strength,
            usemask,
            lowthresh,
            highthresh,
            luma_cap,
            maxchg,
            minchg,
            planes: planes.unwrap_or_else(|| vec![0]),
            luma,
            showmask,
        };

        let result = py
            .allow_threads(|| crate::pipeline::hysteria(&frame, &params))
            .map_err(to_py_err)?;

        let mut out = result.into_planes().into_iter().map(|p| p.into_pyarray(py));
        let y = out
            .next()
            .ok_or_else(|| to_py_err(HysteriaError::InvalidInput("missing luma".to_string())))?;
        Ok((y, out.next(), out.next()))
    }

    /// Rescale an 8-bit value to `bits` per sample.
    #[pyfunction]
    #[pyo3(signature = (value, bits=16))]
    pub fn scale(value: u32, bits: u8) -> PyResult<u32> {
        if !(MIN_BITS..=MAX_BITS).contains(&bits) {
            return Err(to_py_err(HysteriaError::UnsupportedDepth(bits)));
        }
        Ok(crate::frame::scale_to_depth(value, bits))
    }

    #[pymodule]
    #[pyo3(name = "hysteria")]
    pub fn hysteria_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(hysteria, m)?)?;
        m.add_function(wrap_pyfunction!(scale, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::hysteria_module;
