use crackdepth_image::{Image, ImageSize};
use gstreamer::prelude::*;

use crate::stream::error::StreamCaptureError;

/// Frames pulled one at a time from a GStreamer pipeline.
///
/// The pipeline must end in an RGB `appsink` named `sink`, see the
/// [`pipelines`](crate::stream::pipelines) descriptions. Frames are pulled on
/// demand, so a file is decoded no faster than it is consumed.
pub struct StreamCapture {
    pipeline: gstreamer::Pipeline,
    appsink: gstreamer_app::AppSink,
    running: bool,
}

impl StreamCapture {
    /// Creates a new StreamCapture instance with the given pipeline description.
    ///
    /// # Arguments
    ///
    /// * `pipeline_desc` - A string describing the GStreamer pipeline.
    pub fn new(pipeline_desc: &str) -> Result<Self, StreamCaptureError> {
        // make sure that we do not initialize gstreamer several times
        if !gstreamer::INITIALIZED.load(std::sync::atomic::Ordering::Relaxed) {
            gstreamer::init()?;
        }

        let pipeline = gstreamer::parse::launch(pipeline_desc)?
            .dynamic_cast::<gstreamer::Pipeline>()
            .map_err(StreamCaptureError::DowncastPipelineError)?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or(StreamCaptureError::GetElementByNameError)?
            .dynamic_cast::<gstreamer_app::AppSink>()
            .map_err(StreamCaptureError::DowncastPipelineError)?;

        Ok(Self {
            pipeline,
            appsink,
            running: false,
        })
    }

    /// Sets the pipeline to playing.
    pub fn start(&mut self) -> Result<(), StreamCaptureError> {
        self.pipeline.set_state(gstreamer::State::Playing)?;
        self.running = true;
        Ok(())
    }

    /// Blocks until the next frame is decoded.
    ///
    /// # Returns
    ///
    /// The next RGB frame, or `None` once the end of the stream is reached.
    pub fn next_frame(&mut self) -> Result<Option<Image<u8, 3>>, StreamCaptureError> {
        if !self.running {
            return Err(StreamCaptureError::PipelineNotRunning);
        }

        let sample = match self.appsink.pull_sample() {
            Ok(sample) => sample,
            Err(_) if self.appsink.is_eos() => {
                log::debug!("gstreamer received EOS");
                return Ok(None);
            }
            Err(err) => return Err(self.bus_error().unwrap_or(err.into())),
        };

        Ok(Some(extract_image_frame(&sample)?))
    }

    /// Stops the pipeline.
    pub fn close(&mut self) -> Result<(), StreamCaptureError> {
        self.pipeline.set_state(gstreamer::State::Null)?;
        self.running = false;
        Ok(())
    }

    // The first error posted on the bus, which explains a failed pull.
    fn bus_error(&self) -> Option<StreamCaptureError> {
        let msg = self
            .pipeline
            .bus()?
            .pop_filtered(&[gstreamer::MessageType::Error])?;

        match msg.view() {
            gstreamer::MessageView::Error(err) => Some(StreamCaptureError::PipelineError(format!(
                "{} ({:?})",
                err.error(),
                err.debug()
            ))),
            _ => None,
        }
    }
}

impl Drop for StreamCapture {
    fn drop(&mut self) {
        if self.running {
            let _ = self.close();
        }
    }
}

// Copies a sample into an image, dropping the row padding GStreamer adds to
// packed RGB frames.
fn extract_image_frame(sample: &gstreamer::Sample) -> Result<Image<u8, 3>, StreamCaptureError> {
    let caps = sample
        .caps()
        .ok_or_else(|| StreamCaptureError::GetCapsError("sample has no caps".to_string()))?;

    let structure = caps
        .structure(0)
        .ok_or_else(|| StreamCaptureError::GetCapsError("caps have no structure".to_string()))?;

    let width = structure
        .get::<i32>("width")
        .map_err(|e| StreamCaptureError::GetCapsError(e.to_string()))? as usize;
    let height = structure
        .get::<i32>("height")
        .map_err(|e| StreamCaptureError::GetCapsError(e.to_string()))? as usize;

    let buffer = sample
        .buffer()
        .ok_or(StreamCaptureError::GetBufferError)?
        .map_readable()?;

    let data = unpad_rows(buffer.as_slice(), width * 3, height);

    Ok(Image::new(ImageSize { width, height }, data)?)
}

// Keeps the first `row_len` bytes of each of the `height` rows of `buffer`.
fn unpad_rows(buffer: &[u8], row_len: usize, height: usize) -> Vec<u8> {
    if height == 0 || buffer.len() == row_len * height {
        return buffer.to_vec();
    }

    let stride = buffer.len() / height;
    if stride < row_len {
        // let the size check of the image report the mismatch
        return buffer.to_vec();
    }

    buffer
        .chunks_exact(stride)
        .flat_map(|row| &row[..row_len])
        .copied()
        .collect()
}
