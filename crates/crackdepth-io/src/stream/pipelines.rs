use std::path::Path;

// decoded frames are converted to packed RGB and handed to an appsink named `sink`
const RGB_SINK: &str = "videoconvert ! video/x-raw,format=RGB ! appsink name=sink sync=false";

/// Returns a GStreamer pipeline description decoding a video file.
///
/// # Arguments
///
/// * `path` - The path to the video file.
pub fn video_pipeline_description(path: impl AsRef<Path>) -> String {
    format!(
        "filesrc location=\"{}\" ! decodebin ! {RGB_SINK}",
        path.as_ref().to_string_lossy()
    )
}

/// Returns a GStreamer pipeline description capturing a V4L2 camera.
///
/// # Arguments
///
/// * `index` - The camera index, `0` for `/dev/video0`.
pub fn v4l2_pipeline_description(index: u32) -> String {
    format!("v4l2src device=/dev/video{index} ! {RGB_SINK} max-buffers=1 drop=true")
}

/// Returns a GStreamer pipeline description decoding a network stream.
///
/// # Arguments
///
/// * `uri` - The stream uri, e.g. `rtsp://host:8554/live`.
pub fn uri_pipeline_description(uri: &str) -> String {
    format!("uridecodebin uri=\"{uri}\" ! {RGB_SINK} max-buffers=1 drop=true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_descriptions() {
        assert_eq!(
            video_pipeline_description("data/wall.mp4"),
            "filesrc location=\"data/wall.mp4\" ! decodebin ! videoconvert ! \
             video/x-raw,format=RGB ! appsink name=sink sync=false"
        );
        assert!(v4l2_pipeline_description(2).starts_with("v4l2src device=/dev/video2 ! "));
        assert!(uri_pipeline_description("rtsp://cam/live")
            .starts_with("uridecodebin uri=\"rtsp://cam/live\" ! "));
        assert!(uri_pipeline_description("rtsp://cam/live").ends_with("drop=true"));
    }
}
