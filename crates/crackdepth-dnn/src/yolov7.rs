//! # YOLOv7
//!
//! Runs a YOLOv7 model exported end-to-end to ONNX, i.e. with non-max
//! suppression baked into the graph. The model output is a `[N, 7]` tensor
//! whose rows are `[batch, x1, y1, x2, y2, class, score]` in letterboxed
//! input coordinates.

use std::path::{Path, PathBuf};

use crackdepth_image::{ops::cast_and_scale, Image};
use crackdepth_imgproc::resize::letterbox;
use ort::session::{builder::GraphOptimizationLevel, Session};

use crate::{BoundingBox, Detection, Detector, DnnError};

/// Gray level used to pad letterboxed inputs.
const PAD_VALUE: u8 = 114;

/// Builder for the YOLOv7 detector.
pub struct YoloV7DetectorBuilder {
    /// Path to the ONNX model file.
    pub model_path: PathBuf,
    /// Path to the ONNX runtime dylib. Falls back to `ORT_DYLIB_PATH`.
    pub ort_dylib_path: Option<PathBuf>,
    /// Side of the square model input, in pixels.
    pub img_size: usize,
    /// Maximum stride of the model.
    pub stride: usize,
    /// Number of threads to use for inference.
    pub num_threads: usize,
}

impl YoloV7DetectorBuilder {
    /// Creates a new `YoloV7DetectorBuilder` with default settings.
    ///
    /// # Arguments
    ///
    /// * `model_path` - Path to the ONNX model file.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            ort_dylib_path: None,
            img_size: 640,
            stride: 32,
            num_threads: 4,
        }
    }

    /// Sets the path to the ONNX runtime dylib.
    pub fn with_ort_dylib_path(mut self, ort_dylib_path: impl Into<PathBuf>) -> Self {
        self.ort_dylib_path = Some(ort_dylib_path.into());
        self
    }

    /// Sets the model input size. It is rounded up to a multiple of the stride.
    pub fn with_img_size(mut self, img_size: usize) -> Self {
        self.img_size = img_size;
        self
    }

    /// Sets the number of threads to use for inference.
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Builds and returns a `YoloV7Detector` instance.
    pub fn build(self) -> Result<YoloV7Detector, DnnError> {
        let dylib_path = match self.ort_dylib_path {
            Some(path) => path,
            None => std::env::var("ORT_DYLIB_PATH")
                .map(PathBuf::from)
                .map_err(|e| DnnError::OrtDylibError(e.to_string()))?,
        };

        ort::init_from(dylib_path.to_string_lossy()).commit()?;

        let img_size = checked_img_size(self.img_size, self.stride);
        if img_size != self.img_size {
            log::warn!(
                "img_size {} must be a multiple of the stride {}, using {}",
                self.img_size,
                self.stride,
                img_size
            );
        }

        YoloV7Detector::new(&self.model_path, img_size, self.num_threads)
    }
}

// Rounds the input size up to a multiple of the stride.
fn checked_img_size(img_size: usize, stride: usize) -> usize {
    let stride = stride.max(1);
    img_size.div_ceil(stride).max(1) * stride
}

/// YOLOv7 object detector.
pub struct YoloV7Detector {
    session: Session,
    img_size: usize,
}

impl YoloV7Detector {
    /// Creates a new `YoloV7Detector` instance.
    ///
    /// Pre-requisites:
    /// - the ONNX runtime must have been initialised, see [`YoloV7DetectorBuilder::build`].
    pub fn new(model_path: &Path, img_size: usize, num_threads: usize) -> Result<Self, DnnError> {
        log::info!("Loading model from {}", model_path.display());

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(num_threads)?
            .commit_from_file(model_path)?;

        Ok(Self { session, img_size })
    }

    /// Runs object detection on the given image.
    pub fn run(&self, image: &Image<u8, 3>) -> Result<Vec<Detection>, DnnError> {
        let (input, lb) = letterbox(image, self.img_size, 0, false, PAD_VALUE)?;

        // cast and scale the image to f32
        let mut input_f32 = Image::<f32, 3>::from_size_val(input.size(), 0.0)?;
        cast_and_scale(&input, &mut input_f32, 1.0 / 255.0)?;

        // convert HWC -> CHW
        let (h, w) = (input_f32.height(), input_f32.width());
        let mut chw = vec![0.0f32; 3 * h * w];
        for (i, pixel) in input_f32.as_slice().chunks_exact(3).enumerate() {
            for (c, &v) in pixel.iter().enumerate() {
                chw[c * h * w + i] = v;
            }
        }

        let ort_tensor = ort::value::Tensor::from_array(([1usize, 3, h, w], chw))?;

        let input_name = self.session.inputs[0].name.clone();
        let outputs = self
            .session
            .run(ort::inputs![input_name.as_str() => ort_tensor]?)?;

        let (out_shape, out_data) = outputs[0].try_extract_raw_tensor::<f32>()?;
        if out_shape.len() != 2 || out_shape[1] != 7 {
            return Err(DnnError::InvalidOutputShape(out_shape));
        }

        let detections = out_data
            .chunks_exact(7)
            .map(|row| {
                let (x1, y1) = lb.unmap(row[1], row[2]);
                let (x2, y2) = lb.unmap(row[3], row[4]);
                Detection {
                    bbox: BoundingBox { x1, y1, x2, y2 },
                    class_id: row[5] as u32,
                    score: row[6],
                }
            })
            .collect::<Vec<_>>();

        Ok(detections)
    }
}

impl Detector for YoloV7Detector {
    fn detect(&mut self, _source: &Path, image: &Image<u8, 3>) -> Result<Vec<Detection>, DnnError> {
        self.run(image)
    }
}
