/// Error types for the stream module.
pub mod error;

/// Pull based frame capture from a GStreamer pipeline.
pub mod capture;

/// GStreamer pipeline descriptions of the supported sources.
pub mod pipelines;

pub use crate::stream::capture::StreamCapture;
pub use crate::stream::error::StreamCaptureError;
pub use crate::stream::pipelines::{
    uri_pipeline_description, v4l2_pipeline_description, video_pipeline_description,
};
