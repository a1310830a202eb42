//! Mask selection algorithms.
//!
//! - **Hysteresis**: flood fill that grows a strict edge mask through a
//!   permissive one

pub mod hysteresis;

pub use hysteresis::hysteresis;
