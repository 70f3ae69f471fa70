#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// image cropping module.
pub mod crop;

/// utilities to draw on images.
pub mod draw;

/// module containing parallization utilities.
pub mod parallel;

/// per-row reductions over single channel images.
pub mod reduce;

/// utility functions for resizing images.
pub mod resize;

/// operations to threshold images.
pub mod threshold;
