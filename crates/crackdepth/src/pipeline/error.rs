use std::path::PathBuf;

/// An error type for the pipeline module.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// The source is a format that cannot be read, or needs a disabled feature.
    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    /// Error reading or writing images.
    #[error(transparent)]
    Io(#[from] crackdepth_io::IoError),

    /// Error from the detector.
    #[error(transparent)]
    Dnn(#[from] crackdepth_dnn::DnnError),

    /// Error in the depth configuration.
    #[error(transparent)]
    Depth(#[from] crackdepth_depth::DepthError),

    /// Error from the underlying image operations.
    #[error(transparent)]
    Image(#[from] crackdepth_image::ImageError),

    /// Error reading frames from a video, camera or stream.
    #[cfg(feature = "gstreamer")]
    #[error(transparent)]
    Stream(#[from] crackdepth_io::stream::StreamCaptureError),

    /// Error accessing an output or list file.
    #[error("Failed to access {path}. {err}", path = .0.display(), err = .1)]
    File(PathBuf, #[source] std::io::Error),

    /// Error serializing or parsing JSON.
    #[error("JSON error in {path}. {err}", path = .0.display(), err = .1)]
    Json(PathBuf, #[source] serde_json::Error),
}
