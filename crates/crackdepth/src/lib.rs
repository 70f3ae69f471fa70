//! # crackdepth
//!
//! Crack depth estimation on top of an external object detector, plus the
//! label maintenance used to prepare its training annotations.
//!
//! The crate re-exports the workspace crates and hosts the [`pipeline`] that
//! ties them together.

#[doc(inline)]
pub use crackdepth_image as image;

#[doc(inline)]
pub use crackdepth_imgproc as imgproc;

#[doc(inline)]
pub use crackdepth_io as io;

#[doc(inline)]
pub use crackdepth_depth as depth;

#[doc(inline)]
pub use crackdepth_dnn as dnn;

#[doc(inline)]
pub use crackdepth_labels as labels;

/// Detection and depth estimation over a set of images.
pub mod pipeline;
