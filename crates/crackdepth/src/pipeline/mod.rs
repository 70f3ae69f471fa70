mod annotate;
mod error;
mod paths;
mod report;
mod source;

use std::path::{Path, PathBuf};
use std::time::Instant;

use crackdepth_depth::{estimate_crack_depth, DepthConfig, DepthError};
use crackdepth_dnn::{filter_detections, Detector};
use crackdepth_image::Image;
use crackdepth_imgproc::{crop::crop_region, draw::draw_rect};
use crackdepth_io::functional::{read_image_any_rgb8, write_image_rgb8};
use serde::{Deserialize, Serialize};

pub use annotate::{append_label_line, class_color, label_line};
pub use error::PipelineError;
pub use paths::increment_path;
pub use report::{write_report, DepthOutcome, DetectionReport, ImageReport};
pub use source::Source;

/// Name of the JSON report written to the run directory.
pub const REPORT_FILE: &str = "report.json";

/// Settings of a detection and depth estimation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Parent directory of the run directories.
    pub project: PathBuf,
    /// Name of the run directory, incremented when it already exists.
    pub name: String,
    /// Reuse the run directory instead of incrementing it.
    pub exist_ok: bool,
    /// Write a label file per image.
    pub save_txt: bool,
    /// Do not save the annotated images.
    pub nosave: bool,
    /// Minimum detection score, exclusive.
    pub conf_thres: f32,
    /// Only keep these class ids.
    pub classes: Option<Vec<u32>>,
    /// Class names indexed by class id.
    pub names: Vec<String>,
    /// Depth estimation settings.
    pub depth: DepthConfig,
    /// Thickness of the drawn boxes.
    pub line_thickness: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            project: PathBuf::from("runs/detect"),
            name: "exp".to_string(),
            exist_ok: false,
            save_txt: false,
            nosave: false,
            conf_thres: 0.25,
            classes: None,
            names: vec!["crack".to_string()],
            depth: DepthConfig::default(),
            line_thickness: 1,
        }
    }
}

impl PipelineConfig {
    /// Load a config from a JSON file. Missing fields take their default value.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| PipelineError::File(path.to_path_buf(), e))?;
        serde_json::from_str(&contents).map_err(|e| PipelineError::Json(path.to_path_buf(), e))
    }

    /// Name of a class, falling back to its id.
    pub fn class_name(&self, class_id: u32) -> String {
        self.names
            .get(class_id as usize)
            .cloned()
            .unwrap_or_else(|| class_id.to_string())
    }
}

/// Totals of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Directory holding the outputs of the run.
    pub run_dir: PathBuf,
    /// Per image results, in processing order.
    pub reports: Vec<ImageReport>,
}

impl RunSummary {
    /// Number of detections over all images.
    pub fn num_detections(&self) -> usize {
        self.reports.iter().map(|r| r.detections.len()).sum()
    }

    /// Number of detections with a measured depth.
    pub fn num_measured(&self) -> usize {
        self.reports
            .iter()
            .flat_map(|r| &r.detections)
            .filter(|d| d.depth.depth_mm().is_some())
            .count()
    }
}

/// Run detection and depth estimation over every image of `source`.
///
/// Images and frames are processed one at a time. A detection whose depth
/// cannot be measured is reported and skipped, any other failure stops the run.
pub fn run(
    source: &Source,
    detector: &mut dyn Detector,
    config: &PipelineConfig,
) -> Result<RunSummary, PipelineError> {
    config.depth.validate()?;

    let start = Instant::now();
    let inputs = source.inputs()?;

    let run_dir = increment_path(&config.project.join(&config.name), config.exist_ok);
    let labels_dir = run_dir.join("labels");
    let out_dir = if config.save_txt { &labels_dir } else { &run_dir };
    std::fs::create_dir_all(out_dir).map_err(|e| PipelineError::File(out_dir.clone(), e))?;

    log::info!("Results saved to {}", run_dir.display());

    let mut ctx = RunContext {
        detector,
        config,
        run_dir,
        labels_dir,
    };

    let mut reports = Vec::with_capacity(inputs.len());
    for input in &inputs {
        match input {
            Source::Image(path) => {
                let image = read_image_any_rgb8(path)?;
                reports.push(process_frame(path, None, &image, &mut ctx)?);
            }
            captured => reports.extend(process_capture(captured, &mut ctx)?),
        }
    }

    let run_dir = ctx.run_dir;
    write_report(&run_dir.join(REPORT_FILE), &reports)?;

    log::info!("Done. ({:.3}s)", start.elapsed().as_secs_f64());

    Ok(RunSummary { run_dir, reports })
}

struct RunContext<'a> {
    detector: &'a mut dyn Detector,
    config: &'a PipelineConfig,
    run_dir: PathBuf,
    labels_dir: PathBuf,
}

#[cfg(feature = "gstreamer")]
fn process_capture(
    source: &Source,
    ctx: &mut RunContext,
) -> Result<Vec<ImageReport>, PipelineError> {
    use crackdepth_io::stream::{
        uri_pipeline_description, v4l2_pipeline_description, video_pipeline_description,
        StreamCapture,
    };

    let (description, path) = match source {
        Source::Video(path) => (
            video_pipeline_description(&path.to_string_lossy()),
            path.clone(),
        ),
        Source::Camera(index) => (
            v4l2_pipeline_description(*index),
            PathBuf::from(index.to_string()),
        ),
        Source::Stream(uri) => (uri_pipeline_description(uri), PathBuf::from(uri)),
        other => {
            return Err(PipelineError::UnsupportedSource(format!(
                "{other} is not a video or a live source"
            )))
        }
    };

    log::info!("Capturing {source}");

    let mut capture = StreamCapture::new(&description)?;
    capture.start()?;

    let frames = std::iter::from_fn(|| capture.next_frame().transpose())
        .map(|frame| frame.map_err(PipelineError::from));
    let reports = process_frames(&path, frames, ctx)?;

    capture.close()?;
    Ok(reports)
}

#[cfg(not(feature = "gstreamer"))]
fn process_capture(
    source: &Source,
    _ctx: &mut RunContext,
) -> Result<Vec<ImageReport>, PipelineError> {
    Err(PipelineError::UnsupportedSource(format!(
        "{source} needs the gstreamer feature"
    )))
}

// Frames are numbered from 1 and never saved as images.
#[cfg_attr(not(feature = "gstreamer"), allow(dead_code))]
fn process_frames(
    path: &Path,
    frames: impl IntoIterator<Item = Result<Image<u8, 3>, PipelineError>>,
    ctx: &mut RunContext,
) -> Result<Vec<ImageReport>, PipelineError> {
    let mut reports = Vec::new();
    for (index, frame) in frames.into_iter().enumerate() {
        let frame_number = index + 1;
        log::debug!("{} frame {frame_number}", path.display());
        reports.push(process_frame(path, Some(frame_number), &frame?, ctx)?);
    }

    if reports.is_empty() {
        log::warn!("No frames read from {}", path.display());
    }

    Ok(reports)
}

fn process_frame(
    path: &Path,
    frame: Option<usize>,
    image: &Image<u8, 3>,
    ctx: &mut RunContext,
) -> Result<ImageReport, PipelineError> {
    let config = ctx.config;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let frame_stem = match frame {
        Some(n) => format!("{stem}_{n}"),
        None => stem.clone(),
    };

    // the detector sees frames as `<stem>_<frame>.<ext>`
    let detector_path = match (frame, path.extension()) {
        (Some(_), Some(ext)) => {
            path.with_file_name(format!("{frame_stem}.{}", ext.to_string_lossy()))
        }
        (Some(_), None) => path.with_file_name(&frame_stem),
        (None, _) => path.to_path_buf(),
    };

    let detections: Vec<_> = filter_detections(
        ctx.detector.detect(&detector_path, image)?,
        config.conf_thres,
        config.classes.as_deref(),
    )
    .into_iter()
    .map(|mut detection| {
        detection.bbox = detection.bbox.clamped(image.width(), image.height());
        detection
    })
    .collect();

    if detections.is_empty() {
        log::info!("No detections found for {}", detector_path.display());
    }

    // boxes are drawn on a copy so later crops see the raw pixels
    let mut canvas = image.clone();
    let mut reports = Vec::with_capacity(detections.len());

    for detection in detections {
        let class_name = config.class_name(detection.class_id);
        let (x1, y1, x2, y2) = detection.bbox.pixel_corners();

        let region = crop_region(image, x1, y1, x2, y2)?;
        let depth = match estimate_crack_depth(&region, &config.depth) {
            Ok(estimate) => {
                log::info!(
                    "{class_name} {:.2} Depth:{:.1}mm",
                    detection.score,
                    estimate.depth_mm
                );
                DepthOutcome::Measured(estimate)
            }
            Err(DepthError::NoMeasurableFeature) => {
                log::warn!(
                    "{class_name} {:.2} in {}: no measurable feature",
                    detection.score,
                    detector_path.display()
                );
                DepthOutcome::NoMeasurableFeature
            }
            Err(DepthError::AmbiguousDividingLine(rows)) => {
                log::error!(
                    "{class_name} {:.2} in {}: ambiguous dividing line at rows {rows:?}",
                    detection.score,
                    detector_path.display()
                );
                DepthOutcome::AmbiguousDividingLine { rows }
            }
            Err(e) => return Err(e.into()),
        };

        draw_rect(
            &mut canvas,
            (x1, y1),
            (x2, y2),
            class_color(detection.class_id),
            config.line_thickness,
        );

        if config.save_txt {
            append_label_line(
                &ctx.labels_dir.join(format!("{frame_stem}.txt")),
                &label_line(&stem, &detection),
            )?;
        }

        reports.push(DetectionReport {
            detection,
            class_name,
            depth,
        });
    }

    if !config.nosave && frame.is_none() {
        if let Some(file_name) = path.file_name() {
            write_image_rgb8(ctx.run_dir.join(file_name), &canvas)?;
        }
    }

    Ok(ImageReport {
        source: path.to_path_buf(),
        frame,
        detections: reports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_partial_json() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("pipeline.json");
        std::fs::write(
            &path,
            r#"{"name": "cracks", "classes": [0], "depth": {"depth_per_pixel": 0.5}}"#,
        )?;

        let config = PipelineConfig::from_json_file(&path)?;
        assert_eq!(config.name, "cracks");
        assert_eq!(config.classes, Some(vec![0]));
        assert_eq!(config.depth.depth_per_pixel, 0.5);
        assert_eq!(config.conf_thres, 0.25);
        assert_eq!(config.project, PathBuf::from("runs/detect"));
        Ok(())
    }

    #[test]
    fn class_name_falls_back_to_id() {
        let config = PipelineConfig::default();
        assert_eq!(config.class_name(0), "crack");
        assert_eq!(config.class_name(4), "4");
    }

    struct FixedDetector {
        seen: Vec<PathBuf>,
    }

    impl Detector for FixedDetector {
        fn detect(
            &mut self,
            source: &Path,
            _image: &Image<u8, 3>,
        ) -> Result<Vec<crackdepth_dnn::Detection>, crackdepth_dnn::DnnError> {
            self.seen.push(source.to_path_buf());
            Ok(vec![crackdepth_dnn::Detection {
                bbox: crackdepth_dnn::BoundingBox {
                    x1: -5.0,
                    y1: 0.0,
                    x2: 100.0,
                    y2: 2.0,
                },
                score: 0.5,
                class_id: 0,
            }])
        }
    }

    #[test]
    fn frames_get_numbered_label_files() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let run_dir = tmp_dir.path().join("exp");
        let labels_dir = run_dir.join("labels");
        std::fs::create_dir_all(&labels_dir)?;

        let config = PipelineConfig {
            save_txt: true,
            ..Default::default()
        };
        let mut detector = FixedDetector { seen: Vec::new() };
        let mut ctx = RunContext {
            detector: &mut detector,
            config: &config,
            run_dir: run_dir.clone(),
            labels_dir: labels_dir.clone(),
        };

        let size = crackdepth_image::ImageSize {
            width: 4,
            height: 4,
        };
        let frames = (0..2)
            .map(|_| Image::<u8, 3>::new(size, vec![0; 4 * 4 * 3]).map_err(PipelineError::from));

        let reports = process_frames(Path::new("videos/wall.mp4"), frames, &mut ctx)?;

        assert_eq!(
            detector.seen,
            vec![
                PathBuf::from("videos/wall_1.mp4"),
                PathBuf::from("videos/wall_2.mp4")
            ]
        );
        assert_eq!(
            reports.iter().map(|r| r.frame).collect::<Vec<_>>(),
            vec![Some(1), Some(2)]
        );
        assert!(reports
            .iter()
            .all(|r| r.source == Path::new("videos/wall.mp4")));

        // the box is clamped to the 4x4 frame
        assert_eq!(
            std::fs::read_to_string(labels_dir.join("wall_1.txt"))?,
            "wall 0.50 2.00 1.00 4.00 2.00 0\n"
        );
        assert!(labels_dir.join("wall_2.txt").exists());

        // frames are not saved as images
        let saved: Vec<_> = std::fs::read_dir(&run_dir)?
            .filter_map(Result::ok)
            .filter(|e| e.path().is_file())
            .collect();
        assert!(saved.is_empty());

        Ok(())
    }

    #[test]
    fn frame_read_errors_stop_the_source() {
        let config = PipelineConfig::default();
        let mut detector = FixedDetector { seen: Vec::new() };
        let mut ctx = RunContext {
            detector: &mut detector,
            config: &config,
            run_dir: PathBuf::from("unused"),
            labels_dir: PathBuf::from("unused/labels"),
        };

        let frames = std::iter::once(Err(PipelineError::UnsupportedSource("gone".into())));
        let result = process_frames(Path::new("0"), frames, &mut ctx);

        assert!(matches!(result, Err(PipelineError::UnsupportedSource(_))));
        assert!(detector.seen.is_empty());
    }
}
