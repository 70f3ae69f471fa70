#![deny(missing_docs)]
//! Batch renaming of object labels in Pascal VOC annotation files.
//!
//! Only the first `name` child of each `object` element directly under the
//! document root is considered. Matching labels are spliced in place so the
//! rest of the document is kept byte for byte.

/// Error types for the labels module.
pub mod error;

mod rewrite;

pub use crate::error::LabelError;
pub use crate::rewrite::{
    rename_labels, rename_labels_in_dir, rename_labels_in_file, RenameConfig, RenameSummary,
    Rewrite,
};
