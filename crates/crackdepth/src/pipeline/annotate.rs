use std::io::Write;
use std::path::Path;

use crackdepth_dnn::Detection;
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::PipelineError;

/// Deterministic RGB color of a class.
pub fn class_color(class_id: u32) -> [u8; 3] {
    let mut rng = StdRng::seed_from_u64(class_id as u64);
    [rng.random(), rng.random(), rng.random()]
}

/// Format the label file line of a detection found in the image `stem`.
///
/// The box center and size are taken on the whole-pixel corners used to crop
/// the detection.
pub fn label_line(stem: &str, detection: &Detection) -> String {
    let (cx, cy, w, h) = detection.bbox.center_size();
    format!(
        "{stem} {:.2} {cx:.2} {cy:.2} {w:.2} {h:.2} {}",
        detection.score, detection.class_id
    )
}

/// Append a line to a label file, creating the file when needed.
pub fn append_label_line(path: &Path, line: &str) -> Result<(), PipelineError> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| PipelineError::File(path.to_path_buf(), e))?;

    writeln!(file, "{line}").map_err(|e| PipelineError::File(path.to_path_buf(), e))
}
