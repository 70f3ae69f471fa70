/// An error type for the dnn module.
#[derive(thiserror::Error, Debug)]
pub enum DnnError {
    /// Error reading the detections or the model from disk.
    #[error("Failed to read {path}. {err}", path = .0.display(), err = .1)]
    Io(std::path::PathBuf, #[source] std::io::Error),

    /// Error parsing precomputed detections.
    #[error("Failed to parse detections in {path}. {err}", path = .0.display(), err = .1)]
    Json(std::path::PathBuf, #[source] serde_json::Error),

    /// Error from the underlying image operations.
    #[error("Image error. {0}")]
    ImageError(#[from] crackdepth_image::ImageError),

    /// Error from the ONNX runtime.
    #[cfg(feature = "onnx")]
    #[error("Onnx runtime error. {0}")]
    OrtError(#[from] ort::Error),

    /// Error locating the ONNX runtime library.
    #[error("Failed to locate the ORT dylib. {0}")]
    OrtDylibError(String),

    /// The model output does not have the expected layout.
    #[error("Unexpected model output shape {0:?}")]
    InvalidOutputShape(Vec<i64>),
}
