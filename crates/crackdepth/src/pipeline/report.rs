use std::path::{Path, PathBuf};

use crackdepth_depth::DepthEstimate;
use crackdepth_dnn::Detection;
use serde::Serialize;

use super::PipelineError;

/// Outcome of the depth estimation of a single detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DepthOutcome {
    /// The depth was measured.
    Measured(DepthEstimate),
    /// No row of the crop falls inside the crack hue band.
    NoMeasurableFeature,
    /// Several all-zero hue rows were found.
    AmbiguousDividingLine {
        /// Rows, relative to the crop, that are all zero hue.
        rows: Vec<usize>,
    },
}

impl DepthOutcome {
    /// The measured depth in millimetres, if any.
    pub fn depth_mm(&self) -> Option<f64> {
        match self {
            Self::Measured(estimate) => Some(estimate.depth_mm),
            _ => None,
        }
    }
}

/// A detection together with its depth outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionReport {
    /// The detection, with its box clamped to the image.
    #[serde(flatten)]
    pub detection: Detection,
    /// Name of the detected class.
    pub class_name: String,
    /// Depth estimation outcome of the detection.
    pub depth: DepthOutcome,
}

/// The detections of one source image or video frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageReport {
    /// Path of the image, video, camera index or stream.
    pub source: PathBuf,
    /// Frame number, counted from 1, for video and live sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<usize>,
    /// Detections kept after filtering.
    pub detections: Vec<DetectionReport>,
}

/// Write the run report as pretty printed JSON.
pub fn write_report(path: &Path, reports: &[ImageReport]) -> Result<(), PipelineError> {
    let file =
        std::fs::File::create(path).map_err(|e| PipelineError::File(path.to_path_buf(), e))?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), reports)
        .map_err(|e| PipelineError::Json(path.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crackdepth_dnn::BoundingBox;

    #[test]
    fn serializes_outcomes() -> Result<(), serde_json::Error> {
        let detection = Detection {
            bbox: BoundingBox {
                x1: 1.0,
                y1: 2.0,
                x2: 3.0,
                y2: 4.0,
            },
            score: 0.5,
            class_id: 0,
        };
        let report = ImageReport {
            source: "a.png".into(),
            frame: None,
            detections: vec![
                DetectionReport {
                    detection,
                    class_name: "crack".into(),
                    depth: DepthOutcome::AmbiguousDividingLine { rows: vec![1, 4] },
                },
                DetectionReport {
                    detection,
                    class_name: "crack".into(),
                    depth: DepthOutcome::NoMeasurableFeature,
                },
            ],
        };

        let value = serde_json::to_value(&report)?;
        let first = &value["detections"][0];
        assert!(value.get("frame").is_none());
        assert_eq!(first["x1"], 1.0);
        assert_eq!(first["class_name"], "crack");
        assert_eq!(first["depth"]["status"], "ambiguous_dividing_line");
        assert_eq!(first["depth"]["rows"], serde_json::json!([1, 4]));
        assert_eq!(
            value["detections"][1]["depth"]["status"],
            "no_measurable_feature"
        );
        Ok(())
    }
}
