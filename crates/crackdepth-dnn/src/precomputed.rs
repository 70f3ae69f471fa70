use std::path::{Path, PathBuf};

use crackdepth_image::Image;

use crate::{Detection, Detector, DnnError};

/// Reads the detections of an image from `<dir>/<image stem>.json`.
///
/// Each file holds a JSON array of detections with the fields `x1`, `y1`,
/// `x2`, `y2`, `score` and `class_id`. A missing file means the external
/// detector found nothing in that image.
pub struct PrecomputedDetector {
    dir: PathBuf,
}

impl PrecomputedDetector {
    /// Creates a detector reading from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the detections file for a source image.
    pub fn detections_path(&self, source: &Path) -> PathBuf {
        let stem = source.file_stem().unwrap_or(source.as_os_str());
        self.dir.join(format!("{}.json", stem.to_string_lossy()))
    }
}

impl Detector for PrecomputedDetector {
    fn detect(&mut self, source: &Path, _image: &Image<u8, 3>) -> Result<Vec<Detection>, DnnError> {
        let path = self.detections_path(source);
        if !path.exists() {
            log::debug!("no detections file at {}", path.display());
            return Ok(Vec::new());
        }

        let contents =
            std::fs::read_to_string(&path).map_err(|e| DnnError::Io(path.clone(), e))?;
        let detections: Vec<Detection> =
            serde_json::from_str(&contents).map_err(|e| DnnError::Json(path.clone(), e))?;

        log::debug!("read {} detections from {}", detections.len(), path.display());

        Ok(detections)
    }
}
