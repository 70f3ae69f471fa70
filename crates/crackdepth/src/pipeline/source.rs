use std::path::{Path, PathBuf};

use crackdepth_io::functional::{has_image_extension, has_video_extension};

use super::PipelineError;

const STREAM_PREFIXES: &[&str] = &["rtsp://", "rtmp://", "http://", "https://"];

/// Where the pipeline reads its images from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A single image file.
    Image(PathBuf),
    /// A video file, processed frame by frame.
    Video(PathBuf),
    /// Every image and video directly inside a directory.
    Directory(PathBuf),
    /// A text file listing one source per line.
    List(PathBuf),
    /// A V4L2 camera, `0` for `/dev/video0`.
    Camera(u32),
    /// A network stream uri.
    Stream(String),
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Image(path) | Self::Video(path) | Self::Directory(path) | Self::List(path) => {
                write!(f, "{}", path.display())
            }
            Self::Camera(index) => write!(f, "camera {index}"),
            Self::Stream(uri) => write!(f, "{uri}"),
        }
    }
}

// Cameras and network streams, recognised from the raw argument.
fn parse_live(source: &str) -> Option<Result<Source, PipelineError>> {
    if !source.is_empty() && source.chars().all(|c| c.is_ascii_digit()) {
        return Some(
            source
                .parse()
                .map(Source::Camera)
                .map_err(|_| PipelineError::UnsupportedSource(format!("camera index {source}"))),
        );
    }

    let lower = source.to_ascii_lowercase();
    STREAM_PREFIXES
        .iter()
        .any(|p| lower.starts_with(p))
        .then(|| Ok(Source::Stream(source.to_string())))
}

impl Source {
    /// Classify a source argument.
    ///
    /// Digits name a camera, `rtsp://`, `rtmp://`, `http://` and `https://`
    /// uris a network stream. Anything else is a path.
    pub fn parse(source: &str) -> Result<Self, PipelineError> {
        if let Some(live) = parse_live(source) {
            return live;
        }

        let path = PathBuf::from(source);
        if source.to_ascii_lowercase().ends_with(".txt") {
            Ok(Self::List(path))
        } else if path.is_dir() {
            Ok(Self::Directory(path))
        } else if has_image_extension(&path) {
            Ok(Self::Image(path))
        } else if has_video_extension(&path) {
            Ok(Self::Video(path))
        } else {
            Err(PipelineError::UnsupportedSource(format!(
                "{source} is not an image, a video, a directory or a list"
            )))
        }
    }

    /// Whether frames of the source are read through a capture pipeline.
    pub fn is_captured(&self) -> bool {
        matches!(self, Self::Video(_) | Self::Camera(_) | Self::Stream(_))
    }

    /// Resolve the source into single images, videos, cameras and streams, in
    /// processing order.
    pub fn inputs(&self) -> Result<Vec<Source>, PipelineError> {
        match self {
            Self::Directory(dir) => inputs_in_dir(dir),
            Self::List(list) => {
                let contents = std::fs::read_to_string(list)
                    .map_err(|e| PipelineError::File(list.clone(), e))?;
                let base = list.parent().unwrap_or(Path::new(""));

                let mut inputs = Vec::new();
                for line in contents.lines().map(str::trim).filter(|l| !l.is_empty()) {
                    if let Some(live) = parse_live(line) {
                        inputs.push(live?);
                        continue;
                    }

                    let entry = if Path::new(line).is_absolute() {
                        line.to_string()
                    } else {
                        base.join(line).to_string_lossy().into_owned()
                    };
                    match Self::parse(&entry)? {
                        Self::List(nested) => {
                            return Err(PipelineError::UnsupportedSource(format!(
                                "nested list {}",
                                nested.display()
                            )))
                        }
                        source => inputs.extend(source.inputs()?),
                    }
                }
                Ok(inputs)
            }
            single => Ok(vec![single.clone()]),
        }
    }
}

fn inputs_in_dir(dir: &Path) -> Result<Vec<Source>, PipelineError> {
    let entries = std::fs::read_dir(dir).map_err(|e| PipelineError::File(dir.to_path_buf(), e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| PipelineError::File(dir.to_path_buf(), e))?
            .path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths
        .into_iter()
        .filter_map(|path| {
            if has_image_extension(&path) {
                Some(Source::Image(path))
            } else if has_video_extension(&path) {
                Some(Source::Video(path))
            } else {
                None
            }
        })
        .collect())
}
