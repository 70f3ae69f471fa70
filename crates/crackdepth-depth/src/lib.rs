#![deny(missing_docs)]
//! Crack depth estimation from hue-thresholded image regions.
//!
//! A detected region is converted to a hue grid, the rows carrying crack
//! colored pixels are collected, an optional all-zero dividing line is located
//! and the row span is scaled to a physical depth.

/// Estimator configuration.
pub mod config;

/// Error types for the depth module.
pub mod error;

mod estimate;

pub use crate::config::{DepthConfig, DEFAULT_DEPTH_PER_PIXEL};
pub use crate::error::DepthError;
pub use crate::estimate::{
    depth_from_rows, dividing_lines, estimate_crack_depth, estimate_depth, hue_grid, roi_rows,
    DepthEstimate,
};
