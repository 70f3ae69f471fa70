#![deny(missing_docs)]
//! Image types shared by the crackdepth crates.

/// image representation for pixel processing.
pub mod image;

/// Error types for the image module.
pub mod error;

/// Element-wise operations on images.
pub mod ops;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
