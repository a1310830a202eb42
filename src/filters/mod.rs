//! Plane filters used by the line darkener.
//!
//! ## Plane Format
//!
//! | Type | Shape | Description |
//! |------|-------|-------------|
//! | `ArrayView2<u16>` | (H, W) | One plane, 8-16 bits per sample |
//!
//! Every filter takes a view and returns an owned plane of the same shape.
//! Bit depth is passed explicitly where the result depends on it (peak,
//! mid-gray); depth-independent filters do not take it.
//!
//! ## Architecture
//!
//! - **3x3 neighbourhood** - Sobel, inflate, deflate and blur share the mirror
//!   border policy in [`core`]
//! - **Row-parallel** - neighbourhood filters split rows across Rayon
//! - **Binary operations** - return `HysteriaResult` and reject mismatched shapes
//!
//! ## Filter Categories
//!
//! - **Edge detection**: thresholded Sobel
//! - **Morphology**: inflate, deflate
//! - **Blur**: directional 3x3 blur
//! - **Tonal**: levels
//! - **Blend**: biased difference, masked merge, mask subsampling

pub mod core;
pub mod edge;
pub mod morphology;
pub mod blur;
pub mod levels;
pub mod blend;
