//! # Crackdepth DNN
//!
//! Detection oracles for the crack depth pipeline. The detector itself is
//! opaque: boxes arrive either from precomputed files or from an exported
//! end-to-end ONNX model that already applies non-max suppression.

use std::path::Path;

use crackdepth_image::Image;
use serde::{Deserialize, Serialize};

/// Error type for the dnn module.
pub mod error;

/// Detections read from JSON files produced by an external detector.
pub mod precomputed;

/// YOLOv7 end-to-end ONNX detector.
#[cfg(feature = "onnx")]
pub mod yolov7;

pub use crate::error::DnnError;

/// Axis-aligned box in pixel coordinates of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// The x-coordinate of the top-left corner.
    pub x1: f32,
    /// The y-coordinate of the top-left corner.
    pub y1: f32,
    /// The x-coordinate of the bottom-right corner.
    pub x2: f32,
    /// The y-coordinate of the bottom-right corner.
    pub y2: f32,
}

impl BoundingBox {
    /// Corners truncated to whole pixels, as `(x1, y1, x2, y2)`.
    pub fn pixel_corners(&self) -> (i64, i64, i64, i64) {
        (
            self.x1 as i64,
            self.y1 as i64,
            self.x2 as i64,
            self.y2 as i64,
        )
    }

    /// The box with its corners clamped to a `width` x `height` image.
    ///
    /// Non-finite coordinates end up on the image border.
    pub fn clamped(&self, width: usize, height: usize) -> Self {
        let clamp = |v: f32, max: usize| {
            if v.is_nan() {
                0.0
            } else {
                v.clamp(0.0, max as f32)
            }
        };
        Self {
            x1: clamp(self.x1, width),
            y1: clamp(self.y1, height),
            x2: clamp(self.x2, width),
            y2: clamp(self.y2, height),
        }
    }

    /// Center and size of the box on whole pixels, as `(cx, cy, w, h)`.
    pub fn center_size(&self) -> (f32, f32, f32, f32) {
        let (x1, y1, x2, y2) = self.pixel_corners();
        (
            (x1 + x2) as f32 / 2.0,
            (y1 + y2) as f32 / 2.0,
            (x2 - x1) as f32,
            (y2 - y1) as f32,
        )
    }
}

/// Represents a detected object in an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// The box enclosing the object.
    #[serde(flatten)]
    pub bbox: BoundingBox,
    /// The confidence score of the detection (typically between 0 and 1).
    pub score: f32,
    /// The class id of the detected object.
    pub class_id: u32,
}

/// A source of detections for an image.
pub trait Detector {
    /// Detect objects in `image`, which was read from `source`.
    fn detect(&mut self, source: &Path, image: &Image<u8, 3>) -> Result<Vec<Detection>, DnnError>;
}

/// Keep the detections above `conf_thres` and, when `classes` is given, of a listed class.
pub fn filter_detections(
    detections: Vec<Detection>,
    conf_thres: f32,
    classes: Option<&[u32]>,
) -> Vec<Detection> {
    detections
        .into_iter()
        .filter(|d| d.score > conf_thres)
        .filter(|d| classes.map_or(true, |classes| classes.contains(&d.class_id)))
        .collect()
}
